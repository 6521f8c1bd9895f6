//! Native raster records inside a texture dictionary.

use binrw::BinRead;
use bitflags::bitflags;
use custom_debug::Debug;
use log::warn;
use rw_stream::text;
use rw_stream::{FieldReader, Result, StreamError};
use rw_utils::debug;
use std::io::Cursor;

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterMode {
    None,
    Nearest,
    Linear,
    MipNearest,
    MipLinear,
    LinearMipNearest,
    LinearMipLinear,
    Unknown(u16),
}

impl From<u16> for FilterMode {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Nearest,
            2 => Self::Linear,
            3 => Self::MipNearest,
            4 => Self::MipLinear,
            5 => Self::LinearMipNearest,
            6 => Self::LinearMipLinear,
            other => Self::Unknown(other),
        }
    }
}

/// Texture coordinate addressing along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressingMode {
    None,
    Wrap,
    Mirror,
    Clamp,
    Unknown(u8),
}

impl From<u8> for AddressingMode {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Wrap,
            2 => Self::Mirror,
            3 => Self::Clamp,
            other => Self::Unknown(other),
        }
    }
}

/// Pixel layout nibble of the raster format word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum RasterLayout {
    Default,
    Argb1555,
    Rgb565,
    Argb4444,
    Lum8,
    Argb8888,
    Rgb888,
    Rgb555,
    Unknown(u8),
}

bitflags! {
    /// Extension bits of the raster format word
    #[derive(std::fmt::Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
    pub struct RasterFormatFlags: u32 {
        const AUTO_MIPMAP = 0x1000;
        const PAL8 = 0x2000;
        const PAL4 = 0x4000;
        const MIPMAP = 0x8000;
    }
}

/// Raster format word: a pixel layout plus extension flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterFormat(pub u32);

impl RasterFormat {
    pub fn layout(self) -> RasterLayout {
        match (self.0 >> 8) & 0xF {
            0x0 => RasterLayout::Default,
            0x1 => RasterLayout::Argb1555,
            0x2 => RasterLayout::Rgb565,
            0x3 => RasterLayout::Argb4444,
            0x4 => RasterLayout::Lum8,
            0x5 => RasterLayout::Argb8888,
            0x6 => RasterLayout::Rgb888,
            0xA => RasterLayout::Rgb555,
            other => RasterLayout::Unknown(other as u8),
        }
    }

    pub fn flags(self) -> RasterFormatFlags {
        RasterFormatFlags::from_bits_truncate(self.0)
    }

    pub fn is_paletted(self) -> bool {
        self.flags()
            .intersects(RasterFormatFlags::PAL8 | RasterFormatFlags::PAL4)
    }
}

/// Pack a four character code the way Direct3D does
pub const fn fourcc(tag: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*tag)
}

/// Direct3D surface format stored with a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum D3dFormat {
    A8R8G8B8,
    X8R8G8B8,
    R5G6B5,
    X1R5G5B5,
    A1R5G5B5,
    A4R4G4B4,
    L8,
    A8L8,
    Uyvy,
    R8G8B8G8,
    Yuy2,
    G8R8G8B8,
    Dxt1,
    Dxt2,
    Dxt3,
    Dxt4,
    Dxt5,
    Unknown(u32),
}

impl D3dFormat {
    const UYVY: u32 = fourcc(b"UYVY");
    const RGBG: u32 = fourcc(b"RGBG");
    const YUY2: u32 = fourcc(b"YUY2");
    const GRGB: u32 = fourcc(b"GRGB");
    const DXT1: u32 = fourcc(b"DXT1");
    const DXT2: u32 = fourcc(b"DXT2");
    const DXT3: u32 = fourcc(b"DXT3");
    const DXT4: u32 = fourcc(b"DXT4");
    const DXT5: u32 = fourcc(b"DXT5");

    pub fn from_raw(value: u32) -> Self {
        match value {
            21 => Self::A8R8G8B8,
            22 => Self::X8R8G8B8,
            23 => Self::R5G6B5,
            24 => Self::X1R5G5B5,
            25 => Self::A1R5G5B5,
            26 => Self::A4R4G4B4,
            50 => Self::L8,
            51 => Self::A8L8,
            Self::UYVY => Self::Uyvy,
            Self::RGBG => Self::R8G8B8G8,
            Self::YUY2 => Self::Yuy2,
            Self::GRGB => Self::G8R8G8B8,
            Self::DXT1 => Self::Dxt1,
            Self::DXT2 => Self::Dxt2,
            Self::DXT3 => Self::Dxt3,
            Self::DXT4 => Self::Dxt4,
            Self::DXT5 => Self::Dxt5,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Self::A8R8G8B8 => 21,
            Self::X8R8G8B8 => 22,
            Self::R5G6B5 => 23,
            Self::X1R5G5B5 => 24,
            Self::A1R5G5B5 => 25,
            Self::A4R4G4B4 => 26,
            Self::L8 => 50,
            Self::A8L8 => 51,
            Self::Uyvy => Self::UYVY,
            Self::R8G8B8G8 => Self::RGBG,
            Self::Yuy2 => Self::YUY2,
            Self::G8R8G8B8 => Self::GRGB,
            Self::Dxt1 => Self::DXT1,
            Self::Dxt2 => Self::DXT2,
            Self::Dxt3 => Self::DXT3,
            Self::Dxt4 => Self::DXT4,
            Self::Dxt5 => Self::DXT5,
            Self::Unknown(value) => value,
        }
    }

    pub fn is_block_compressed(self) -> bool {
        matches!(
            self,
            Self::Dxt1 | Self::Dxt2 | Self::Dxt3 | Self::Dxt4 | Self::Dxt5
        )
    }
}

/// Fixed-size descriptor at the start of a raster struct, as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct RawRasterHeader {
    pub platform_id: u16,
    pub filter_mode: u16,
    pub u_addressing: u8,
    pub v_addressing: u8,
    pub texture_pad: u16,
    pub name: [u8; 32],
    pub mask_name: [u8; 32],
    pub raster_format: u32,
    pub d3d_format: u32,
    pub width: u16,
    pub height: u16,
    pub depth: u8,
    pub mip_levels: u8,
    pub raster_type: u8,
    pub alpha: u8,
    pub cube_map: u8,
    pub auto_mipmap: u8,
    pub compressed: u8,
    pub raster_pad: u8,
}

impl RawRasterHeader {
    /// Size of the stored descriptor in bytes
    pub const SIZE: usize = 92;
}

/// Decoded raster metadata
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterDescriptor {
    pub platform_id: u16,
    pub filter_mode: FilterMode,
    pub u_addressing: AddressingMode,
    pub v_addressing: AddressingMode,
    pub name: String,
    pub mask_name: String,
    pub raster_format: RasterFormat,
    pub d3d_format: D3dFormat,
    pub width: u16,
    pub height: u16,
    pub depth: u8,
    pub mip_levels: u8,
    pub raster_type: u8,
    pub has_alpha: bool,
    pub is_cube_map: bool,
    pub auto_mipmap: bool,
    pub is_compressed: bool,
}

impl RasterDescriptor {
    /// Decode the fixed descriptor.
    ///
    /// A name that is not valid UTF-8 is replaced by `fallback_name` when one
    /// is given; without a fallback the error is returned.
    pub fn decode(reader: &mut FieldReader<'_>, fallback_name: Option<&str>) -> Result<Self> {
        let offset = reader.offset();
        let bytes = reader.read_array::<{ RawRasterHeader::SIZE }>()?;
        let raw = RawRasterHeader::read(&mut Cursor::new(&bytes[..]))?;
        Self::from_raw(&raw, offset, fallback_name)
    }

    fn from_raw(raw: &RawRasterHeader, offset: usize, fallback_name: Option<&str>) -> Result<Self> {
        // name follows platform, filter, addressing and padding
        let name_offset = offset + 8;
        let name = match (text::decode(&raw.name, name_offset), fallback_name) {
            (Ok(name), _) => name,
            (Err(StreamError::InvalidText { source, .. }), Some(fallback)) => {
                warn!("Raster name at {name_offset:#x} is not valid UTF-8 ({source}), using {fallback:?}");
                fallback.to_owned()
            }
            (Err(err), _) => return Err(err),
        };

        let d3d_format = D3dFormat::from_raw(raw.d3d_format);
        if let D3dFormat::Unknown(value) = d3d_format {
            warn!("Raster {name:?} has unknown D3D format {value:#x}");
        }

        Ok(Self {
            platform_id: raw.platform_id,
            filter_mode: raw.filter_mode.into(),
            u_addressing: raw.u_addressing.into(),
            v_addressing: raw.v_addressing.into(),
            name,
            mask_name: text::decode_lossy(&raw.mask_name),
            raster_format: RasterFormat(raw.raster_format),
            d3d_format,
            width: raw.width,
            height: raw.height,
            depth: raw.depth,
            mip_levels: raw.mip_levels,
            raster_type: raw.raster_type,
            has_alpha: raw.alpha != 0,
            is_cube_map: raw.cube_map != 0,
            auto_mipmap: raw.auto_mipmap != 0,
            is_compressed: raw.compressed != 0,
        })
    }
}

/// One texture: its descriptor and the untouched pixel payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Raster {
    pub descriptor: RasterDescriptor,
    /// Struct body after the 92-byte descriptor, so declared size minus 92.
    /// Paletted payloads start with their palette.
    #[debug(with = debug::trimmed_collection_fmt)]
    pub payload: Vec<u8>,
}

impl Raster {
    /// Decode a raster struct body. The payload is everything after the descriptor.
    pub fn decode(reader: &mut FieldReader<'_>, fallback_name: Option<&str>) -> Result<Self> {
        let descriptor = RasterDescriptor::decode(reader, fallback_name)?;
        let payload = reader.read_rest()?.to_vec();
        Ok(Self {
            descriptor,
            payload,
        })
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}
