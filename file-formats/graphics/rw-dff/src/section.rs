use crate::atomic::Atomic;
use crate::clump::{Clump, GeometryList};
use crate::error::{DffError, Result};
use crate::frame::{FrameList, FrameName};
use crate::geometry::Geometry;
use crate::material::{Material, MaterialList, StringSection, TextureReference};
use crate::mesh::BinMesh;
use crate::plugin::{Breakable, ExtraVertexColor};
use rw_stream::ChunkHeader;

/// Section types understood by the model decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum SectionType {
    Struct = 0x0000_0001,
    String = 0x0000_0002,
    Extension = 0x0000_0003,
    Texture = 0x0000_0006,
    Material = 0x0000_0007,
    MaterialList = 0x0000_0008,
    FrameList = 0x0000_000E,
    Geometry = 0x0000_000F,
    Clump = 0x0000_0010,
    Atomic = 0x0000_0014,
    GeometryList = 0x0000_001A,
    BinMesh = 0x0000_050E,
    TwoDEffect = 0x0253_F2F8,
    ExtraVertexColor = 0x0253_F2F9,
    Breakable = 0x0253_F2FD,
    Frame = 0x0253_F2FE,
}

impl SectionType {
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Types whose body follows their own header directly.
    ///
    /// Every other type is a wrapper: its header is followed by a second
    /// header that carries the actual body type and size.
    pub fn is_unwrapped(self) -> bool {
        matches!(
            self,
            Self::String | Self::Breakable | Self::ExtraVertexColor
        )
    }
}

impl TryFrom<u32> for SectionType {
    type Error = DffError;

    fn try_from(id: u32) -> Result<Self> {
        Ok(match id {
            0x0000_0001 => Self::Struct,
            0x0000_0002 => Self::String,
            0x0000_0003 => Self::Extension,
            0x0000_0006 => Self::Texture,
            0x0000_0007 => Self::Material,
            0x0000_0008 => Self::MaterialList,
            0x0000_000E => Self::FrameList,
            0x0000_000F => Self::Geometry,
            0x0000_0010 => Self::Clump,
            0x0000_0014 => Self::Atomic,
            0x0000_001A => Self::GeometryList,
            0x0000_050E => Self::BinMesh,
            0x0253_F2F8 => Self::TwoDEffect,
            0x0253_F2F9 => Self::ExtraVertexColor,
            0x0253_F2FD => Self::Breakable,
            0x0253_F2FE => Self::Frame,
            other => return Err(DffError::UnknownSectionType(other)),
        })
    }
}

/// Resolved header of one logical section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionHeader {
    /// Type of the body, after resolving any wrapper
    pub section_type: SectionType,
    /// Size of the body
    pub size: u32,
    /// Size declared by the outermost header
    pub size_2: u32,
    /// Expanded library version of the outermost header.
    ///
    /// The struct or extension header behind a wrapper carries its own
    /// stamp, which is not kept.
    pub version: u32,
    /// Stream offset of the outermost header
    pub offset: usize,
    /// Whether the outermost header was an extension wrapper
    pub in_extension: bool,
}

impl SectionHeader {
    /// Header for a type whose body follows its own header
    pub(crate) fn unwrapped(section_type: SectionType, header: &ChunkHeader, offset: usize) -> Self {
        Self {
            section_type,
            size: header.size,
            size_2: header.size,
            version: header.version(),
            offset,
            in_extension: false,
        }
    }

    /// Stream offset just past everything the outermost header covers
    pub fn outer_end(&self) -> usize {
        self.offset + ChunkHeader::SIZE + self.size_2 as usize
    }
}

/// Body of an empty or nested extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Extension {
    pub size: u32,
}

/// A decoded section body
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum Section {
    Clump(Clump),
    FrameList(FrameList),
    Frame(FrameName),
    GeometryList(GeometryList),
    Geometry(Geometry),
    MaterialList(MaterialList),
    Material(Material),
    Texture(TextureReference),
    String(StringSection),
    Breakable(Breakable),
    BinMesh(BinMesh),
    ExtraVertexColor(ExtraVertexColor),
    Atomic(Atomic),
    Extension(Extension),
}

impl Section {
    pub fn section_type(&self) -> SectionType {
        match self {
            Self::Clump(_) => SectionType::Clump,
            Self::FrameList(_) => SectionType::FrameList,
            Self::Frame(_) => SectionType::Frame,
            Self::GeometryList(_) => SectionType::GeometryList,
            Self::Geometry(_) => SectionType::Geometry,
            Self::MaterialList(_) => SectionType::MaterialList,
            Self::Material(_) => SectionType::Material,
            Self::Texture(_) => SectionType::Texture,
            Self::String(_) => SectionType::String,
            Self::Breakable(_) => SectionType::Breakable,
            Self::BinMesh(_) => SectionType::BinMesh,
            Self::ExtraVertexColor(_) => SectionType::ExtraVertexColor,
            Self::Atomic(_) => SectionType::Atomic,
            Self::Extension(_) => SectionType::Extension,
        }
    }
}

/// A resolved header together with its decoded body
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedSection {
    pub header: SectionHeader,
    pub body: Section,
}

macro_rules! section_body {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl TryFrom<Section> for $ty {
                type Error = DffError;

                fn try_from(section: Section) -> Result<Self> {
                    match section {
                        Section::$variant(body) => Ok(body),
                        other => Err(DffError::UnexpectedSection {
                            expected: SectionType::$variant,
                            found: Some(other.section_type()),
                        }),
                    }
                }
            }
        )*
    };
}

section_body! {
    Clump => Clump,
    FrameList => FrameList,
    Frame => FrameName,
    GeometryList => GeometryList,
    Geometry => Geometry,
    MaterialList => MaterialList,
    Material => Material,
    Texture => TextureReference,
    String => StringSection,
    Breakable => Breakable,
    BinMesh => BinMesh,
    ExtraVertexColor => ExtraVertexColor,
    Atomic => Atomic,
    Extension => Extension,
}
