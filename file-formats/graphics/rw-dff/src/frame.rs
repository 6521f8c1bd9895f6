use custom_debug::Debug;
use rw_stream::{FieldReader, Result};
use rw_utils::debug;

/// Frame hierarchy records.
///
/// Each record is a 0x38-byte block holding a rotation matrix, a
/// translation, the parent index and matrix flags. The records are kept as
/// raw bytes.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameList {
    pub frame_count: u32,
    #[debug(with = debug::trimmed_collection_fmt)]
    pub records: Vec<u8>,
}

impl FrameList {
    pub const RECORD_SIZE: usize = 0x38;

    pub(crate) fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        let frame_count = reader.read_u32()?;
        let len = (frame_count as usize).saturating_mul(Self::RECORD_SIZE);
        let records = reader.read_bytes(len)?.to_vec();
        Ok(Self {
            frame_count,
            records,
        })
    }

    /// Raw record of each frame, in stream order
    pub fn frame_records(&self) -> impl Iterator<Item = &[u8]> {
        self.records.chunks_exact(Self::RECORD_SIZE)
    }

    /// Parent index of a frame, -1 for roots
    pub fn parent_index(&self, frame: usize) -> Option<i32> {
        let record = self.frame_records().nth(frame)?;
        let bytes: [u8; 4] = record[0x30..0x34].try_into().ok()?;
        Some(i32::from_le_bytes(bytes))
    }
}

/// Name attached to a frame through its extension
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameName {
    pub name: String,
}

impl FrameName {
    pub(crate) fn decode(reader: &mut FieldReader<'_>, len: usize) -> Result<Self> {
        Ok(Self {
            name: reader.read_text(len)?,
        })
    }
}
