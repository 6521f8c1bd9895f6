//! Unpackers for uncompressed pixel layouts.
//!
//! Every unpacker turns one stored unit into one RGBA pixel. Narrow channels
//! are widened with truncating fixed-point scaling, so a 5-bit 16 becomes
//! `16 * 255 / 31 = 131` rather than the rounded 132.

use super::error::{Result, ensure_len, pixel_count};

/// Uncompressed layouts stored one unit per pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectFormat {
    /// 32-bit B,G,R,A bytes
    Bgra8888,
    /// 32-bit B,G,R bytes plus an unused byte, alpha forced opaque
    Bgrx8888,
    /// 16-bit 5:6:5 color
    Rgb565,
    /// 16-bit 5:5:5 color, top bit unused
    Rgb555,
    /// 16-bit color with a 1-bit alpha in the top bit
    Argb1555,
    /// 16-bit 4:4:4:4 with alpha in the top nibble
    Argb4444,
    /// 8-bit luminance
    Lum8,
    /// 8-bit luminance followed by 8-bit alpha
    Lum8Alpha8,
}

impl DirectFormat {
    /// Size of one stored pixel in bytes
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Bgra8888 | Self::Bgrx8888 => 4,
            Self::Rgb565 | Self::Rgb555 | Self::Argb1555 | Self::Argb4444 => 2,
            Self::Lum8Alpha8 => 2,
            Self::Lum8 => 1,
        }
    }

    /// Payload length needed for a `width` x `height` image
    pub fn required_len(self, width: usize, height: usize) -> usize {
        width
            .saturating_mul(height)
            .saturating_mul(self.bytes_per_pixel())
    }

    /// Convert one stored unit to RGBA
    pub fn unpack(self, unit: &[u8]) -> [u8; 4] {
        match self {
            Self::Bgra8888 => [unit[2], unit[1], unit[0], unit[3]],
            Self::Bgrx8888 => [unit[2], unit[1], unit[0], 0xFF],
            Self::Rgb565 => unpack_565(word(unit)),
            Self::Rgb555 => unpack_555(word(unit)),
            Self::Argb1555 => unpack_1555(word(unit)),
            Self::Argb4444 => unpack_4444(word(unit)),
            Self::Lum8 => [unit[0], unit[0], unit[0], 0xFF],
            Self::Lum8Alpha8 => [unit[0], unit[0], unit[0], unit[1]],
        }
    }
}

fn word(unit: &[u8]) -> u16 {
    u16::from_le_bytes([unit[0], unit[1]])
}

/// Widen a `bits`-wide channel value to 8 bits
#[inline]
pub fn expand_channel(value: u16, bits: u32) -> u8 {
    let max = (1u32 << bits) - 1;
    ((u32::from(value) & max) * 255 / max) as u8
}

#[inline]
pub fn unpack_565(word: u16) -> [u8; 4] {
    [
        expand_channel(word >> 11, 5),
        expand_channel(word >> 5, 6),
        expand_channel(word, 5),
        0xFF,
    ]
}

#[inline]
pub fn unpack_555(word: u16) -> [u8; 4] {
    [
        expand_channel(word >> 10, 5),
        expand_channel(word >> 5, 5),
        expand_channel(word, 5),
        0xFF,
    ]
}

#[inline]
pub fn unpack_1555(word: u16) -> [u8; 4] {
    let [r, g, b, _] = unpack_555(word);
    [r, g, b, expand_channel(word >> 15, 1)]
}

#[inline]
pub fn unpack_4444(word: u16) -> [u8; 4] {
    [
        expand_channel(word >> 8, 4),
        expand_channel(word >> 4, 4),
        expand_channel(word, 4),
        expand_channel(word >> 12, 4),
    ]
}

/// Expand a whole uncompressed image to RGBA
pub fn decode(format: DirectFormat, data: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    let pixels = pixel_count(width, height)?;
    let unit = format.bytes_per_pixel();
    ensure_len(data, pixels * unit)?;

    let mut rgba = Vec::with_capacity(pixels * 4);
    for chunk in data.chunks_exact(unit).take(pixels) {
        rgba.extend_from_slice(&format.unpack(chunk));
    }
    Ok(rgba)
}
