//! # RenderWare TXD texture dictionaries
//!
//! Reads texture dictionary containers and expands their rasters to RGBA.
//!
//! - [`TextureDictionary`]: the container walk, producing one [`Raster`]
//!   (descriptor plus untouched payload) per texture
//! - [`codec`]: direct, paletted and S3TC (DXT1 to DXT5) pixel decoders
//! - [`Raster::decode_rgba`]: picks the codec for a raster and runs it
//!
//! ## Example
//!
//! ```no_run
//! use rw_txd::{DecodeOptions, TextureDictionary};
//!
//! # fn main() -> Result<(), rw_txd::TxdError> {
//! let dictionary = TextureDictionary::open("vehicle.txd")?;
//! let options = DecodeOptions::default();
//! for raster in &dictionary.rasters {
//!     let image = raster.decode_rgba(&options)?;
//!     println!("{}: {}x{}", raster.name(), image.width, image.height);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Decoding a payload directly
//!
//! ```
//! use rw_txd::codec::{self, PixelFormat};
//!
//! let block = [0x00, 0xF8, 0x1F, 0x00, 0, 0, 0, 0];
//! let rgba = codec::decode(PixelFormat::Bc1 { alpha_flag: 0 }, &block, 4, 4).unwrap();
//! assert_eq!(&rgba[..4], &[255, 0, 0, 255]);
//! ```

pub mod codec;
pub mod decode;
pub mod dictionary;
pub mod error;
pub mod raster;

pub use codec::{CodecError, DirectFormat, PixelFormat};
#[cfg(feature = "parallel")]
pub use decode::decode_all_par;
pub use decode::{DecodeOptions, DecodedImage};
pub use dictionary::{DictionaryHeader, TextureDictionary};
pub use error::{Result, TxdError};
pub use raster::{
    AddressingMode, D3dFormat, FilterMode, Raster, RasterDescriptor, RasterFormat,
    RasterFormatFlags, RasterLayout, RawRasterHeader, fourcc,
};
pub use rw_stream::{LibraryVersion, expand_version};
