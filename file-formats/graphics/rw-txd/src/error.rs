use crate::codec::CodecError;
use rw_stream::StreamError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a texture dictionary
#[derive(Error, Debug)]
pub enum TxdError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Expected chunk {expected:#x} at offset {offset:#x}, found {}", found_name(.found))]
    UnexpectedChunk {
        expected: u32,
        found: Option<u32>,
        offset: usize,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Failed to read {0}: {1}")]
    FileSystem(PathBuf, #[source] std::io::Error),

    #[error("{0}: {1}")]
    Context(String, #[source] Box<Self>),
}

impl TxdError {
    /// Wrap this error with a description of what was being decoded
    pub fn with_context(self, context: &str) -> Self {
        Self::Context(context.to_owned(), Box::new(self))
    }
}

fn found_name(found: &Option<u32>) -> String {
    found.map_or_else(|| "end of stream".to_owned(), |id| format!("{id:#x}"))
}

/// Result type for TXD operations
pub type Result<T> = std::result::Result<T, TxdError>;
