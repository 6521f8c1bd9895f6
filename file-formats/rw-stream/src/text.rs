//! Fixed-width and length-prefixed text fields

use crate::error::{Result, StreamError};
use memchr::memchr;

/// Cut a byte field at its first NUL
pub fn trim_nul(bytes: &[u8]) -> &[u8] {
    match memchr(0, bytes) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Decode a text field as UTF-8, trimmed at the first NUL.
///
/// `offset` is the absolute stream offset of the field, used for errors.
pub fn decode(bytes: &[u8], offset: usize) -> Result<String> {
    std::str::from_utf8(trim_nul(bytes))
        .map(str::to_owned)
        .map_err(|source| StreamError::InvalidText { offset, source })
}

/// Decode a text field, replacing invalid sequences
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(trim_nul(bytes)).into_owned()
}
