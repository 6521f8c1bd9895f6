use crate::section::SectionType;
use rw_stream::StreamError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding a DFF model stream
#[derive(Error, Debug)]
pub enum DffError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Unknown section type {0:#x}")]
    UnknownSectionType(u32),

    #[error("Unsupported {0:?} section: {1}")]
    UnsupportedSection(SectionType, &'static str),

    #[error("Expected {expected:?} section, found {}", found_name(.found))]
    UnexpectedSection {
        expected: SectionType,
        found: Option<SectionType>,
    },

    #[error("Unexpected {0:?} section after the clump")]
    TrailingSection(SectionType),

    #[error("Failed to read {0}: {1}")]
    FileSystem(PathBuf, #[source] std::io::Error),

    #[error("{0}: {1}")]
    Context(String, #[source] Box<Self>),
}

impl DffError {
    /// Wrap this error with a description of what was being decoded
    pub fn with_context(self, context: &str) -> Self {
        Self::Context(context.to_owned(), Box::new(self))
    }
}

fn found_name(found: &Option<SectionType>) -> String {
    found.map_or_else(|| "end of stream".to_owned(), |t| format!("{t:?} section"))
}

/// Result type for DFF operations
pub type Result<T> = std::result::Result<T, DffError>;
