//! Pixel codec: expands raw raster payloads to 8-bit RGBA.
//!
//! Every decoder produces exactly `4 * width * height` bytes in row-major
//! order with channels R, G, B, A.

pub mod bcn;
pub mod direct;
pub mod error;
pub mod palette;

pub use direct::DirectFormat;
pub use error::{CodecError, Result};

/// A payload layout the codec can expand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    Direct(DirectFormat),
    /// 256-entry palette followed by one index byte per pixel
    Palette8 { opaque: bool },
    /// 16-entry palette followed by two indices per byte
    Palette4 { opaque: bool },
    Bc1 { alpha_flag: u8 },
    Bc2 { premultiplied: bool },
    Bc3 { premultiplied: bool },
}

impl PixelFormat {
    /// Palette bytes at the start of the payload
    pub fn palette_len(&self) -> usize {
        match self {
            Self::Palette8 { .. } => palette::PAL8_SIZE,
            Self::Palette4 { .. } => palette::PAL4_SIZE,
            _ => 0,
        }
    }

    /// Payload length needed for a `width` x `height` image, palette included
    ///
    /// Saturates at `usize::MAX` for dimensions no payload could satisfy.
    pub fn required_len(&self, width: usize, height: usize) -> usize {
        let pixels = width.saturating_mul(height);
        match self {
            Self::Direct(format) => format.required_len(width, height),
            Self::Palette8 { .. } => palette::PAL8_SIZE.saturating_add(pixels),
            Self::Palette4 { .. } => palette::PAL4_SIZE.saturating_add(pixels.div_ceil(2)),
            Self::Bc1 { .. } => bcn::required_len(width, height, bcn::BC1_BLOCK_SIZE),
            Self::Bc2 { .. } => bcn::required_len(width, height, bcn::BC2_BLOCK_SIZE),
            Self::Bc3 { .. } => bcn::required_len(width, height, bcn::BC3_BLOCK_SIZE),
        }
    }
}

/// Expand `payload` to RGBA.
///
/// Paletted payloads carry their RGBA palette first, followed by the indices.
pub fn decode(format: PixelFormat, payload: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    match format {
        PixelFormat::Direct(direct) => direct::decode(direct, payload, width, height),
        PixelFormat::Palette8 { opaque } => {
            let (table, indices) = split_palette(payload, palette::PAL8_SIZE)?;
            if opaque {
                palette::pal8_noalpha(indices, table, width, height)
            } else {
                palette::pal8(indices, table, width, height)
            }
        }
        PixelFormat::Palette4 { opaque } => {
            let (table, indices) = split_palette(payload, palette::PAL4_SIZE)?;
            if opaque {
                palette::pal4_noalpha(indices, table, width, height)
            } else {
                palette::pal4(indices, table, width, height)
            }
        }
        PixelFormat::Bc1 { alpha_flag } => bcn::bc1(payload, width, height, alpha_flag),
        PixelFormat::Bc2 { premultiplied } => bcn::bc2(payload, width, height, premultiplied),
        PixelFormat::Bc3 { premultiplied } => bcn::bc3(payload, width, height, premultiplied),
    }
}

fn split_palette(payload: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    if payload.len() < len {
        return Err(CodecError::MissingPalette {
            expected: len,
            actual: payload.len(),
        });
    }
    Ok(payload.split_at(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_required_len() {
        assert_eq!(PixelFormat::Bc1 { alpha_flag: 0 }.required_len(5, 5), 4 * 8);
        assert_eq!(PixelFormat::Bc3 { premultiplied: false }.required_len(8, 4), 2 * 16);
        assert_eq!(PixelFormat::Palette4 { opaque: true }.required_len(3, 1), 64 + 2);
        assert_eq!(PixelFormat::Direct(DirectFormat::Argb4444).required_len(2, 2), 8);
    }

    #[test]
    fn test_decode_paletted_payload() {
        let mut payload = vec![0u8; palette::PAL4_SIZE];
        payload[4..8].copy_from_slice(&[9, 8, 7, 6]);
        payload.push(0x10);

        let rgba = decode(PixelFormat::Palette4 { opaque: false }, &payload, 2, 1).unwrap();
        assert_eq!(rgba, vec![9, 8, 7, 6, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_without_palette() {
        let err = decode(PixelFormat::Palette8 { opaque: true }, &[0; 100], 1, 1).unwrap_err();
        assert_eq!(
            err,
            CodecError::MissingPalette {
                expected: 1024,
                actual: 100
            }
        );
    }

    #[test]
    fn test_required_len_saturates() {
        assert_eq!(
            PixelFormat::Bc1 { alpha_flag: 0 }.required_len(usize::MAX / 2, 3),
            usize::MAX
        );
        assert_eq!(
            PixelFormat::Direct(DirectFormat::Bgra8888).required_len(usize::MAX, 2),
            usize::MAX
        );
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        let huge = usize::MAX / 2;
        let formats = [
            PixelFormat::Direct(DirectFormat::Lum8),
            PixelFormat::Palette4 { opaque: false },
            PixelFormat::Bc1 { alpha_flag: 0 },
            PixelFormat::Bc3 { premultiplied: false },
        ];
        for format in formats {
            let payload = vec![0u8; format.palette_len() + 64];
            assert_eq!(
                decode(format, &payload, huge, 3),
                Err(CodecError::ImageTooLarge {
                    width: huge,
                    height: 3
                }),
                "{format:?}"
            );
        }
    }

    #[test]
    fn test_output_size_overflow_is_checked() {
        // width * height fits, the RGBA byte count does not
        let width = usize::MAX / 4 + 1;
        assert_eq!(
            decode(PixelFormat::Direct(DirectFormat::Lum8), &[], width, 1),
            Err(CodecError::ImageTooLarge { width, height: 1 })
        );
    }

    #[test]
    fn test_decode_output_contract() {
        let formats = [
            PixelFormat::Direct(DirectFormat::Rgb565),
            PixelFormat::Palette8 { opaque: false },
            PixelFormat::Bc1 { alpha_flag: 0 },
            PixelFormat::Bc2 { premultiplied: true },
            PixelFormat::Bc3 { premultiplied: false },
        ];
        for format in formats {
            let payload = vec![0u8; format.required_len(7, 3)];
            let rgba = decode(format, &payload, 7, 3).unwrap();
            assert_eq!(rgba.len(), 4 * 7 * 3, "{format:?}");
        }
    }
}
