//! Geometry extension plugins that are stored without a wrapper header

use crate::types::Rgba;
use custom_debug::Debug;
use rw_stream::{FieldReader, Result};
use rw_utils::debug;

/// Breakable-object plugin; only the leading magic word is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakable {
    pub magic: u32,
}

impl Breakable {
    pub(crate) fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            magic: reader.read_u32()?,
        })
    }
}

/// Alternate per-vertex colors used for night lighting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtraVertexColor {
    pub magic: u32,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub colors: Vec<Rgba>,
}

impl ExtraVertexColor {
    /// Decode with the vertex count of the owning geometry
    pub(crate) fn decode(reader: &mut FieldReader<'_>, vertex_count: usize) -> Result<Self> {
        let magic = reader.read_u32()?;
        let colors = if magic > 0 {
            reader.read_records(vertex_count, Rgba::SIZE, Rgba::read)?
        } else {
            Vec::new()
        };
        Ok(Self { magic, colors })
    }
}
