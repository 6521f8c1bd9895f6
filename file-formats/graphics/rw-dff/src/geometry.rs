use crate::error::{DffError, Result};
use crate::section::SectionType;
use crate::types::{Rgba, Sphere, read_bool, read_vec2, read_vec3};
use bitflags::bitflags;
use custom_debug::Debug;
use glam::{Vec2, Vec3};
use rw_stream::FieldReader;
use rw_utils::debug;

bitflags! {
    /// Geometry format word.
    ///
    /// Bits 16 to 23 hold the texture coordinate set count and are retained
    /// as-is.
    #[derive(std::fmt::Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
    pub struct GeometryFlags: u32 {
        const TRISTRIP = 0x0000_0001;
        const POSITIONS = 0x0000_0002;
        const TEXTURED = 0x0000_0004;
        const PRELIT = 0x0000_0008;
        const NORMALS = 0x0000_0010;
        const LIGHT = 0x0000_0020;
        const MODULATE_MATERIAL_COLOR = 0x0000_0040;
        const TEXTURED2 = 0x0000_0080;
        const NATIVE = 0x0100_0000;

        const _ = !0;
    }
}

impl GeometryFlags {
    /// Number of texture coordinate sets stored per vertex.
    ///
    /// Only bits 16 to 23 count. `TEXTURED` and `TEXTURED2` do not add sets
    /// on their own.
    pub fn texture_set_count(self) -> usize {
        ((self.bits() & 0x00FF_0000) >> 16) as usize
    }
}

/// One triangle, fields kept in stream order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub vertex2: u16,
    pub vertex1: u16,
    pub material: u16,
    pub vertex3: u16,
}

impl Triangle {
    pub const SIZE: usize = 8;

    /// Vertex indices in winding order
    pub fn indices(&self) -> [u16; 3] {
        [self.vertex1, self.vertex2, self.vertex3]
    }

    fn read(reader: &mut FieldReader<'_>) -> rw_stream::Result<Self> {
        Ok(Self {
            vertex2: reader.read_u16()?,
            vertex1: reader.read_u16()?,
            material: reader.read_u16()?,
            vertex3: reader.read_u16()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct MorphTarget {
    pub bounding_sphere: Sphere,
    pub has_vertices: bool,
    pub has_normals: bool,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub vertices: Vec<Vec3>,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub normals: Vec<Vec3>,
}

/// Decoded geometry body
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub flags: GeometryFlags,
    pub triangle_count: u32,
    pub vertex_count: u32,
    /// Declared count, kept as read. Exactly one target block follows.
    pub morph_target_count: u32,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub prelit_colors: Vec<Rgba>,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub texture_coordinates: Vec<Vec<Vec2>>,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub triangles: Vec<Triangle>,
    pub morph_target: MorphTarget,
}

/// Variable-length blocks of a geometry body, in stream order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryStage {
    PrelitColors,
    TextureCoordinates(usize),
    Triangles,
    MorphTarget,
}

impl GeometryStage {
    /// Blocks that follow the fixed header for the given flags
    pub fn plan(flags: GeometryFlags) -> Vec<Self> {
        let mut stages = Vec::new();
        if flags.contains(GeometryFlags::PRELIT) {
            stages.push(Self::PrelitColors);
        }
        stages.extend((0..flags.texture_set_count()).map(Self::TextureCoordinates));
        stages.push(Self::Triangles);
        stages.push(Self::MorphTarget);
        stages
    }
}

impl Geometry {
    pub(crate) fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        let flags = GeometryFlags::from_bits_retain(reader.read_u32()?);
        let triangle_count = reader.read_u32()?;
        let vertex_count = reader.read_u32()?;
        let morph_target_count = reader.read_u32()?;

        if flags.contains(GeometryFlags::NATIVE) {
            return Err(DffError::UnsupportedSection(
                SectionType::Geometry,
                "platform-native geometry data",
            ));
        }

        let mut geometry = Self {
            flags,
            triangle_count,
            vertex_count,
            morph_target_count,
            ..Self::default()
        };
        let vertices = vertex_count as usize;

        for stage in GeometryStage::plan(flags) {
            match stage {
                GeometryStage::PrelitColors => {
                    geometry.prelit_colors = reader.read_records(vertices, Rgba::SIZE, Rgba::read)?;
                }
                GeometryStage::TextureCoordinates(_) => {
                    let set = reader.read_records(vertices, 8, read_vec2)?;
                    geometry.texture_coordinates.push(set);
                }
                GeometryStage::Triangles => {
                    geometry.triangles = reader.read_records(
                        triangle_count as usize,
                        Triangle::SIZE,
                        Triangle::read,
                    )?;
                }
                GeometryStage::MorphTarget => {
                    geometry.morph_target = MorphTarget::decode(reader, vertices)?;
                }
            }
        }

        Ok(geometry)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.morph_target.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.morph_target.normals
    }
}

impl MorphTarget {
    fn decode(reader: &mut FieldReader<'_>, vertices: usize) -> Result<Self> {
        let bounding_sphere = Sphere::read(reader)?;
        let has_vertices = read_bool(reader)?;
        let has_normals = read_bool(reader)?;

        let vertices_out = if has_vertices {
            reader.read_records(vertices, 12, read_vec3)?
        } else {
            Vec::new()
        };
        let normals = if has_normals {
            reader.read_records(vertices, 12, read_vec3)?
        } else {
            Vec::new()
        };

        Ok(Self {
            bounding_sphere,
            has_vertices,
            has_normals,
            vertices: vertices_out,
            normals,
        })
    }
}
