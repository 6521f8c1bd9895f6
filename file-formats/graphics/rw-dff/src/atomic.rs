use rw_stream::{FieldReader, Result};

/// Binding of a geometry to a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Atomic {
    pub frame_index: u32,
    pub geometry_index: u32,
    pub flags: u32,
    pub reserved: u32,
}

impl Atomic {
    pub const COLLISION_TEST: u32 = 0x01;
    pub const RENDER: u32 = 0x04;

    pub(crate) fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            frame_index: reader.read_u32()?,
            geometry_index: reader.read_u32()?,
            flags: reader.read_u32()?,
            reserved: reader.read_u32()?,
        })
    }

    pub fn is_rendered(&self) -> bool {
        self.flags & Self::RENDER != 0
    }
}
