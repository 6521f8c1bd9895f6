use crate::error::{Result, StreamError};
use crate::text;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

/// Little-endian field reader bounded to one chunk body.
///
/// Reads never cross the end of the body; an over-read is reported as
/// [`StreamError::Truncated`] with the absolute stream offset.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    cursor: Cursor<&'a [u8]>,
    base: usize,
}

impl<'a> FieldReader<'a> {
    /// Wrap `data`, which starts at absolute offset `base` in the stream
    pub fn new(data: &'a [u8], base: usize) -> Self {
        Self {
            cursor: Cursor::new(data),
            base,
        }
    }

    /// Length of the whole body
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn consumed(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.len() - self.consumed()
    }

    /// Absolute stream offset of the next byte
    pub fn offset(&self) -> usize {
        self.base + self.consumed()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(StreamError::Truncated {
                offset: self.offset(),
                needed,
                remaining,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.cursor.read_i16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        Ok(self.cursor.read_f32::<LittleEndian>()?)
    }

    /// Borrow the next `len` bytes of the body
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let start = self.consumed();
        let data: &'a [u8] = *self.cursor.get_ref();
        self.cursor.set_position((start + len) as u64);
        Ok(&data[start..start + len])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read everything left in the body
    pub fn read_rest(&mut self) -> Result<&'a [u8]> {
        self.read_bytes(self.remaining())
    }

    /// Read `len` bytes as text, trimmed at the first NUL
    pub fn read_text(&mut self, len: usize) -> Result<String> {
        let offset = self.offset();
        let bytes = self.read_bytes(len)?;
        text::decode(bytes, offset)
    }

    /// Read `count` records of `record_size` bytes each.
    ///
    /// The whole run is bounds-checked before anything is allocated so a
    /// corrupt count cannot trigger a huge allocation.
    pub fn read_records<T, F>(&mut self, count: usize, record_size: usize, mut read: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let total = count.checked_mul(record_size).ok_or(StreamError::Truncated {
            offset: self.offset(),
            needed: usize::MAX,
            remaining: self.remaining(),
        })?;
        self.ensure(total)?;

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(read(self)?);
        }
        Ok(records)
    }

    /// Check that the whole body was consumed
    pub fn finish(&self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(StreamError::SizeMismatch {
                offset: self.base,
                declared: self.len(),
                consumed: self.consumed(),
            });
        }
        Ok(())
    }
}
