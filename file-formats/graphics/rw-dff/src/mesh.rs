use custom_debug::Debug;
use rw_stream::{FieldReader, Result};
use rw_utils::debug;

/// Index list of one material split
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Mesh {
    pub material_index: u32,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub indices: Vec<u32>,
}

/// Material-split index lists of a geometry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct BinMesh {
    pub flags: u32,
    pub mesh_count: u32,
    pub total_index_count: u32,
    pub meshes: Vec<Mesh>,
}

impl BinMesh {
    /// Meshes are triangle strips rather than lists
    pub const TRISTRIP: u32 = 0x1;

    pub(crate) fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        let flags = reader.read_u32()?;
        let mesh_count = reader.read_u32()?;
        let total_index_count = reader.read_u32()?;

        let mut meshes = Vec::with_capacity((mesh_count as usize).min(reader.remaining() / 8));
        for _ in 0..mesh_count {
            let index_count = reader.read_u32()?;
            let material_index = reader.read_u32()?;
            let indices = reader.read_records(index_count as usize, 4, FieldReader::read_u32)?;
            meshes.push(Mesh {
                material_index,
                indices,
            });
        }

        Ok(Self {
            flags,
            mesh_count,
            total_index_count,
            meshes,
        })
    }

    pub fn is_tristrip(&self) -> bool {
        self.flags & Self::TRISTRIP != 0
    }
}
