//! # RenderWare chunk stream
//!
//! Shared reading layer for RenderWare binary streams. Every asset in the
//! format is a tree of chunks, each introduced by a 12-byte header holding a
//! type id, a payload size and a packed library version.
//!
//! This crate provides:
//!
//! - [`ChunkReader`]: a sequential cursor that decodes chunk headers
//! - [`FieldReader`]: a little-endian reader bounded to a single chunk body
//! - [`expand_version`]: the library version codec
//! - NUL-trimmed text helpers
//!
//! ```
//! use rw_stream::{ChunkReader, ReadOutcome};
//!
//! # fn main() -> Result<(), rw_stream::StreamError> {
//! let mut bytes = Vec::new();
//! bytes.extend_from_slice(&0x16u32.to_le_bytes());
//! bytes.extend_from_slice(&0u32.to_le_bytes());
//! bytes.extend_from_slice(&0x1803_FFFFu32.to_le_bytes());
//!
//! let mut reader = ChunkReader::new(&bytes);
//! if let ReadOutcome::Read(header) = reader.read_header()? {
//!     assert_eq!(header.type_id, 0x16);
//!     assert_eq!(header.version(), 0x36003);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chunk;
pub mod error;
pub mod reader;
pub mod text;
pub mod version;

pub use chunk::{ChunkHeader, ChunkReader, ReadOutcome, ids};
pub use error::{Result, StreamError};
pub use reader::FieldReader;
pub use version::{LibraryVersion, expand_version};
