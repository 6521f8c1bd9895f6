use std::io;
use thiserror::Error;

/// Errors raised while walking a RenderWare chunk stream
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Truncated data at offset {offset:#x}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Invalid text at offset {offset:#x}: {source}")]
    InvalidText {
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Chunk body at offset {offset:#x} declared {declared} bytes but {consumed} were consumed")]
    SizeMismatch {
        offset: usize,
        declared: usize,
        consumed: usize,
    },

    #[error("Binary read error: {0}")]
    Binary(#[from] binrw::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for chunk stream operations
pub type Result<T> = std::result::Result<T, StreamError>;
