//! Indexed color lookups against an RGBA palette.

use super::error::{CodecError, Result, ensure_len, pixel_count};

/// Palette size in bytes for 8-bit indices
pub const PAL8_SIZE: usize = 256 * 4;
/// Palette size in bytes for 4-bit indices
pub const PAL4_SIZE: usize = 16 * 4;

fn ensure_palette(palette: &[u8], expected: usize) -> Result<()> {
    if palette.len() < expected {
        return Err(CodecError::MissingPalette {
            expected,
            actual: palette.len(),
        });
    }
    Ok(())
}

#[inline]
fn lookup(palette: &[u8], index: u8, opaque: bool) -> [u8; 4] {
    let at = usize::from(index) * 4;
    let alpha = if opaque { 0xFF } else { palette[at + 3] };
    [palette[at], palette[at + 1], palette[at + 2], alpha]
}

fn decode_pal8(data: &[u8], palette: &[u8], width: usize, height: usize, opaque: bool) -> Result<Vec<u8>> {
    ensure_palette(palette, PAL8_SIZE)?;
    let pixels = pixel_count(width, height)?;
    ensure_len(data, pixels)?;

    let mut rgba = Vec::with_capacity(pixels * 4);
    for &index in &data[..pixels] {
        rgba.extend_from_slice(&lookup(palette, index, opaque));
    }
    Ok(rgba)
}

fn decode_pal4(data: &[u8], palette: &[u8], width: usize, height: usize, opaque: bool) -> Result<Vec<u8>> {
    ensure_palette(palette, PAL4_SIZE)?;
    let pixels = pixel_count(width, height)?;
    ensure_len(data, pixels.div_ceil(2))?;

    // High nibble is the earlier pixel
    let mut rgba = Vec::with_capacity(pixels * 4);
    for pixel in 0..pixels {
        let byte = data[pixel / 2];
        let index = if pixel % 2 == 0 { byte >> 4 } else { byte & 0x0F };
        rgba.extend_from_slice(&lookup(palette, index, opaque));
    }
    Ok(rgba)
}

/// 8-bit indices, palette alpha kept
pub fn pal8(data: &[u8], palette: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    decode_pal8(data, palette, width, height, false)
}

/// 8-bit indices, alpha forced to 255
pub fn pal8_noalpha(data: &[u8], palette: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    decode_pal8(data, palette, width, height, true)
}

/// 4-bit indices, palette alpha kept
pub fn pal4(data: &[u8], palette: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    decode_pal4(data, palette, width, height, false)
}

/// 4-bit indices, alpha forced to 255
pub fn pal4_noalpha(data: &[u8], palette: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    decode_pal4(data, palette, width, height, true)
}
