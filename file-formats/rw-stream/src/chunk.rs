use crate::error::{Result, StreamError};
use crate::reader::FieldReader;
use crate::version::expand_version;
use binrw::BinRead;
use log::trace;
use std::io::Cursor;

/// Well known chunk type ids shared by model and texture containers
pub mod ids {
    pub const STRUCT: u32 = 0x0000_0001;
    pub const STRING: u32 = 0x0000_0002;
    pub const EXTENSION: u32 = 0x0000_0003;
    pub const TEXTURE_NATIVE: u32 = 0x0000_0015;
    pub const TEXTURE_DICTIONARY: u32 = 0x0000_0016;
}

/// Fixed 12-byte header in front of every chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ChunkHeader {
    /// Chunk type id, 0 marks a terminator
    pub type_id: u32,
    /// Size of the payload following this header
    pub size: u32,
    /// Packed library stamp, see [`expand_version`]
    pub raw_version: u32,
}

impl ChunkHeader {
    /// Size of a chunk header in bytes
    pub const SIZE: usize = 12;

    /// Expanded library version of this chunk
    pub fn version(&self) -> u32 {
        expand_version(self.raw_version)
    }
}

/// Result of a read that may hit the end of the stream
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    Read(T),
    EndOfStream,
}

impl<T> ReadOutcome<T> {
    pub fn is_end(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Read(value) => Some(value),
            Self::EndOfStream => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ReadOutcome<U> {
        match self {
            Self::Read(value) => ReadOutcome::Read(f(value)),
            Self::EndOfStream => ReadOutcome::EndOfStream,
        }
    }
}

/// Sequential cursor over an in-memory chunk stream
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ChunkReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current byte offset from the start of the stream
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Decode the next chunk header.
    ///
    /// Returns [`ReadOutcome::EndOfStream`] when no bytes remain or when the
    /// header carries the terminator type id 0. A partial header is an error.
    pub fn read_header(&mut self) -> Result<ReadOutcome<ChunkHeader>> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Ok(ReadOutcome::EndOfStream);
        }
        if remaining < ChunkHeader::SIZE {
            return Err(StreamError::Truncated {
                offset: self.position,
                needed: ChunkHeader::SIZE,
                remaining,
            });
        }

        let mut cursor = Cursor::new(&self.data[self.position..self.position + ChunkHeader::SIZE]);
        let header = ChunkHeader::read(&mut cursor)?;
        self.position += ChunkHeader::SIZE;

        if header.type_id == 0 {
            trace!("Terminator chunk at {:#x}", self.position - ChunkHeader::SIZE);
            return Ok(ReadOutcome::EndOfStream);
        }

        trace!(
            "Chunk {:#x} at {:#x}: {} bytes, version {:#x}",
            header.type_id,
            self.position - ChunkHeader::SIZE,
            header.size,
            header.version()
        );

        Ok(ReadOutcome::Read(header))
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(StreamError::Truncated {
                offset: self.position,
                needed: len,
                remaining,
            });
        }

        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Skip a chunk payload without decoding it
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    /// Take `len` bytes as a bounded field reader that reports absolute offsets
    pub fn body(&mut self, len: usize) -> Result<FieldReader<'a>> {
        let base = self.position;
        let data = self.take(len)?;
        Ok(FieldReader::new(data, base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header_bytes(type_id: u32, size: u32, raw_version: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&type_id.to_le_bytes());
        bytes.extend_from_slice(&size.to_le_bytes());
        bytes.extend_from_slice(&raw_version.to_le_bytes());
        bytes
    }

    #[test]
    fn test_read_header() {
        let data = header_bytes(0x10, 0x20, 0x1803_FFFF);
        let mut reader = ChunkReader::new(&data);

        let header = reader.read_header().unwrap().into_option().unwrap();
        assert_eq!(header.type_id, 0x10);
        assert_eq!(header.size, 0x20);
        assert_eq!(header.version(), 0x36003);
        assert_eq!(reader.position(), 12);
        assert!(reader.read_header().unwrap().is_end());
    }

    #[test]
    fn test_terminator_type_ends_stream() {
        let data = header_bytes(0, 0, 0);
        let mut reader = ChunkReader::new(&data);
        assert_eq!(reader.read_header().unwrap(), ReadOutcome::EndOfStream);
    }

    #[test]
    fn test_partial_header_is_truncated() {
        for len in 1..ChunkHeader::SIZE {
            let data = vec![0xAB; len];
            let mut reader = ChunkReader::new(&data);
            match reader.read_header() {
                Err(StreamError::Truncated {
                    needed, remaining, ..
                }) => {
                    assert_eq!(needed, 12);
                    assert_eq!(remaining, len);
                }
                other => panic!("expected truncation for {len} bytes, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_take_past_end() {
        let data = [1u8, 2, 3];
        let mut reader = ChunkReader::new(&data);
        assert_eq!(reader.take(2).unwrap(), &[1, 2]);
        assert!(matches!(
            reader.take(2),
            Err(StreamError::Truncated {
                offset: 2,
                needed: 2,
                remaining: 1
            })
        ));
        assert_eq!(reader.position(), 2);
    }
}
