use thiserror::Error;

/// Errors raised while expanding a pixel payload to RGBA
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("Pixel payload holds {actual} bytes, {expected} required")]
    TruncatedPayload { expected: usize, actual: usize },

    #[error("Palette holds {actual} bytes, {expected} required")]
    MissingPalette { expected: usize, actual: usize },

    #[error("A {width}x{height} image does not fit in memory")]
    ImageTooLarge { width: usize, height: usize },
}

/// Result type for pixel codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Fail with [`CodecError::TruncatedPayload`] when `data` is shorter than `expected`
pub(crate) fn ensure_len(data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(CodecError::TruncatedPayload {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Pixel count of a `width` x `height` image whose RGBA output fits in `usize`
pub(crate) fn pixel_count(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .filter(|pixels| pixels.checked_mul(4).is_some())
        .ok_or(CodecError::ImageTooLarge { width, height })
}
