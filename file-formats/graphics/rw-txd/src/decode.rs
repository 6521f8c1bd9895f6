//! Raster to RGBA conversion.

use crate::codec::{self, CodecError, DirectFormat, PixelFormat};
use crate::dictionary::TextureDictionary;
use crate::error::Result;
use crate::raster::{D3dFormat, Raster, RasterDescriptor, RasterFormatFlags, RasterLayout};
use custom_debug::Debug;
use rw_utils::debug;

/// Options for turning rasters into RGBA images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeOptions {
    /// OR'd into the alpha of every BC1 pixel
    pub bc1_alpha_flag: u8,
    /// Override for paletted rasters: `Some(true)` drops palette alpha,
    /// `Some(false)` keeps it. By default the descriptor's alpha flag decides.
    pub force_opaque_palette: Option<bool>,
}

/// An expanded 8-bit RGBA image
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub rgba: Vec<u8>,
}

impl PixelFormat {
    /// Pick the codec for a raster.
    ///
    /// Palette flags win over everything else. Otherwise the D3D format
    /// decides, and rasters with an unknown D3D format fall back to the
    /// layout nibble of the raster format word.
    pub fn for_raster(
        descriptor: &RasterDescriptor,
        options: &DecodeOptions,
    ) -> codec::Result<Self> {
        let flags = descriptor.raster_format.flags();
        let opaque = options
            .force_opaque_palette
            .unwrap_or(!descriptor.has_alpha);
        if flags.contains(RasterFormatFlags::PAL8) {
            return Ok(Self::Palette8 { opaque });
        }
        if flags.contains(RasterFormatFlags::PAL4) {
            return Ok(Self::Palette4 { opaque });
        }

        let format = match descriptor.d3d_format {
            D3dFormat::Dxt1 => Self::Bc1 {
                alpha_flag: options.bc1_alpha_flag,
            },
            D3dFormat::Dxt2 => Self::Bc2 {
                premultiplied: true,
            },
            D3dFormat::Dxt3 => Self::Bc2 {
                premultiplied: false,
            },
            D3dFormat::Dxt4 => Self::Bc3 {
                premultiplied: true,
            },
            D3dFormat::Dxt5 => Self::Bc3 {
                premultiplied: false,
            },
            D3dFormat::A8R8G8B8 => Self::Direct(DirectFormat::Bgra8888),
            D3dFormat::X8R8G8B8 => Self::Direct(DirectFormat::Bgrx8888),
            D3dFormat::R5G6B5 => Self::Direct(DirectFormat::Rgb565),
            D3dFormat::X1R5G5B5 => Self::Direct(DirectFormat::Rgb555),
            D3dFormat::A1R5G5B5 => Self::Direct(DirectFormat::Argb1555),
            D3dFormat::A4R4G4B4 => Self::Direct(DirectFormat::Argb4444),
            D3dFormat::L8 => Self::Direct(DirectFormat::Lum8),
            D3dFormat::A8L8 => Self::Direct(DirectFormat::Lum8Alpha8),
            D3dFormat::Unknown(_) => Self::for_layout(descriptor.raster_format.layout())?,
            other @ (D3dFormat::Uyvy
            | D3dFormat::R8G8B8G8
            | D3dFormat::Yuy2
            | D3dFormat::G8R8G8B8) => {
                return Err(CodecError::UnsupportedPixelFormat(format!("{other:?}")));
            }
        };
        Ok(format)
    }

    fn for_layout(layout: RasterLayout) -> codec::Result<Self> {
        let direct = match layout {
            RasterLayout::Argb1555 => DirectFormat::Argb1555,
            RasterLayout::Rgb565 => DirectFormat::Rgb565,
            RasterLayout::Argb4444 => DirectFormat::Argb4444,
            RasterLayout::Lum8 => DirectFormat::Lum8,
            RasterLayout::Argb8888 => DirectFormat::Bgra8888,
            RasterLayout::Rgb888 => DirectFormat::Bgrx8888,
            RasterLayout::Rgb555 => DirectFormat::Rgb555,
            RasterLayout::Default | RasterLayout::Unknown(_) => {
                return Err(CodecError::UnsupportedPixelFormat(format!(
                    "raster layout {layout:?}"
                )));
            }
        };
        Ok(Self::Direct(direct))
    }
}

impl Raster {
    /// Codec that [`Raster::decode_rgba`] would use
    pub fn pixel_format(&self, options: &DecodeOptions) -> codec::Result<PixelFormat> {
        PixelFormat::for_raster(&self.descriptor, options)
    }

    /// Expand the top mip level of this raster to RGBA
    pub fn decode_rgba(&self, options: &DecodeOptions) -> Result<DecodedImage> {
        let format = self.pixel_format(options)?;
        let width = self.descriptor.width;
        let height = self.descriptor.height;
        log::debug!("Decoding {:?} as {format:?} ({width}x{height})", self.descriptor.name);

        let rgba = codec::decode(format, &self.payload, width.into(), height.into())?;
        Ok(DecodedImage {
            width: width.into(),
            height: height.into(),
            rgba,
        })
    }
}

impl TextureDictionary {
    /// Decode every raster, one result per raster in stream order
    pub fn decode_all(&self, options: &DecodeOptions) -> Vec<Result<DecodedImage>> {
        self.rasters
            .iter()
            .map(|raster| raster.decode_rgba(options))
            .collect()
    }
}

/// Decode independent rasters in parallel, one result per raster in input order
#[cfg(feature = "parallel")]
pub fn decode_all_par(rasters: &[Raster], options: &DecodeOptions) -> Vec<Result<DecodedImage>> {
    use rayon::prelude::*;

    rasters
        .par_iter()
        .map(|raster| raster.decode_rgba(options))
        .collect()
}
