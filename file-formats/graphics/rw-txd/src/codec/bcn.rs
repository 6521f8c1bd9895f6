//! S3TC block decoders (BC1, BC2, BC3).
//!
//! Images are stored as 4x4 pixel blocks in row-major block order. Blocks on
//! the right and bottom edges may extend past the image; those pixels are
//! decoded and dropped.

use super::direct::unpack_565;
use super::error::{Result, ensure_len, pixel_count};

/// Bytes per BC1 block
pub const BC1_BLOCK_SIZE: usize = 8;
/// Bytes per BC2 block
pub const BC2_BLOCK_SIZE: usize = 16;
/// Bytes per BC3 block
pub const BC3_BLOCK_SIZE: usize = 16;

type Block = [[u8; 4]; 16];

/// Number of blocks covering a `width` x `height` image
pub fn block_count(width: usize, height: usize) -> usize {
    width.div_ceil(4).saturating_mul(height.div_ceil(4))
}

/// Payload length needed for a `width` x `height` image
pub fn required_len(width: usize, height: usize, block_size: usize) -> usize {
    block_count(width, height).saturating_mul(block_size)
}

fn u16_at(block: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([block[at], block[at + 1]])
}

fn u32_at(block: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([block[at], block[at + 1], block[at + 2], block[at + 3]])
}

/// Four-entry color table for one block.
///
/// With `color0 > color1` entries 2 and 3 sit at thirds between the
/// endpoints. Otherwise entry 2 is the midpoint and entry 3 is black, with
/// alpha 0 when `punch_through` is set.
fn color_table(color0: u16, color1: u16, punch_through: bool) -> [[u8; 4]; 4] {
    let a = unpack_565(color0);
    let b = unpack_565(color1);
    let mix = |f: fn(u32, u32) -> u32| -> [u8; 4] {
        [
            f(a[0].into(), b[0].into()) as u8,
            f(a[1].into(), b[1].into()) as u8,
            f(a[2].into(), b[2].into()) as u8,
            0xFF,
        ]
    };

    if color0 > color1 {
        [a, b, mix(|a, b| (2 * a + b) / 3), mix(|a, b| (a + 2 * b) / 3)]
    } else {
        let black = if punch_through { [0, 0, 0, 0] } else { [0, 0, 0, 0xFF] };
        [a, b, mix(|a, b| (a + b) / 2), black]
    }
}

/// Expand the color half of a block: two 565 endpoints and 2-bit controls
fn color_block(bytes: &[u8], punch_through: bool) -> Block {
    let table = color_table(u16_at(bytes, 0), u16_at(bytes, 2), punch_through);
    let controls = u32_at(bytes, 4);

    let mut block = [[0u8; 4]; 16];
    for (pixel, out) in block.iter_mut().enumerate() {
        let control = (controls >> (2 * pixel)) & 0b11;
        *out = table[control as usize];
    }
    block
}

/// Alpha values selectable by a BC3 block's 3-bit indices.
///
/// When `alpha0 > alpha1` the six inner entries step in sevenths between the
/// endpoints. Otherwise four inner entries step in fifths and the last two are
/// 0 and 255.
pub fn alpha_ramp(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let (a0, a1) = (u32::from(alpha0), u32::from(alpha1));
    let lerp = |w0: u32, w1: u32, d: u32| ((2 * (a0 * w0 + a1 * w1) + d) / (2 * d)) as u8;

    let mut ramp = [alpha0, alpha1, 0, 0, 0, 0, 0, 0];
    if alpha0 > alpha1 {
        for step in 1..7 {
            ramp[step as usize + 1] = lerp(7 - step, step, 7);
        }
    } else {
        for step in 1..5 {
            ramp[step as usize + 1] = lerp(5 - step, step, 5);
        }
        ramp[6] = 0;
        ramp[7] = 255;
    }
    ramp
}

/// Slot of `pixel`'s alpha index within a BC3 block's 48-bit index field.
///
/// Rows are packed bottom-up: the last row of the block holds slots 0 to 3
/// and each row runs left to right.
pub fn alpha_slot(pixel: usize) -> usize {
    4 * (3 - pixel / 4) + pixel % 4
}

/// 3-bit alpha index at `slot` of the 48-bit field held in three words.
///
/// Slot `s` starts at bit `3 * s`; some indices straddle two words.
pub fn alpha_index(words: [u16; 3], slot: usize) -> usize {
    let bit = 3 * slot;
    let word = bit / 16;
    let shift = bit % 16;

    let mut index = usize::from(words[word] >> shift);
    if shift > 13 {
        index |= usize::from(words[word + 1]) << (16 - shift);
    }
    index & 0b111
}

/// Undo premultiplied alpha, rounding half to even and clamping to 255
pub fn unpremultiply(pixel: &mut [u8; 4]) {
    let alpha = u32::from(pixel[3]);
    if alpha == 0 {
        return;
    }
    for channel in &mut pixel[..3] {
        let scaled = u32::from(*channel) * 255;
        let (quotient, remainder) = (scaled / alpha, scaled % alpha);
        let rounded = match (2 * remainder).cmp(&alpha) {
            std::cmp::Ordering::Greater => quotient + 1,
            std::cmp::Ordering::Equal => quotient + (quotient & 1),
            std::cmp::Ordering::Less => quotient,
        };
        *channel = rounded.min(255) as u8;
    }
}

/// Run `decode_block` over every block and scatter the pixels into the image
fn decode_blocks<F>(data: &[u8], width: usize, height: usize, block_size: usize, decode_block: F) -> Result<Vec<u8>>
where
    F: Fn(&[u8]) -> Block,
{
    let pixels = pixel_count(width, height)?;
    ensure_len(data, required_len(width, height, block_size))?;

    let blocks_wide = width.div_ceil(4);
    let mut rgba = vec![0u8; pixels * 4];

    for (index, bytes) in data.chunks_exact(block_size).take(block_count(width, height)).enumerate() {
        let block = decode_block(bytes);
        let x0 = (index % blocks_wide) * 4;
        let y0 = (index / blocks_wide) * 4;

        for (pixel, color) in block.iter().enumerate() {
            let x = x0 + pixel % 4;
            let y = y0 + pixel / 4;
            if x < width && y < height {
                let at = (y * width + x) * 4;
                rgba[at..at + 4].copy_from_slice(color);
            }
        }
    }

    Ok(rgba)
}

/// Decode BC1 (DXT1). `alpha_flag` is OR'd into every pixel's alpha.
pub fn bc1(data: &[u8], width: usize, height: usize, alpha_flag: u8) -> Result<Vec<u8>> {
    decode_blocks(data, width, height, BC1_BLOCK_SIZE, |bytes| {
        let mut block = color_block(bytes, true);
        for pixel in &mut block {
            pixel[3] |= alpha_flag;
        }
        block
    })
}

/// Decode BC2 (DXT3, or DXT2 when `premultiplied`)
pub fn bc2(data: &[u8], width: usize, height: usize, premultiplied: bool) -> Result<Vec<u8>> {
    decode_blocks(data, width, height, BC2_BLOCK_SIZE, |bytes| {
        let mut block = color_block(&bytes[8..], false);
        for (pixel, out) in block.iter_mut().enumerate() {
            let row = u16_at(bytes, (pixel / 4) * 2);
            let nibble = (row >> ((pixel % 4) * 4)) & 0xF;
            out[3] = (nibble * 17) as u8;
            if premultiplied {
                unpremultiply(out);
            }
        }
        block
    })
}

/// Decode BC3 (DXT5, or DXT4 when `premultiplied`)
pub fn bc3(data: &[u8], width: usize, height: usize, premultiplied: bool) -> Result<Vec<u8>> {
    decode_blocks(data, width, height, BC3_BLOCK_SIZE, |bytes| {
        let ramp = alpha_ramp(bytes[0], bytes[1]);
        let words = [u16_at(bytes, 2), u16_at(bytes, 4), u16_at(bytes, 6)];

        let mut block = color_block(&bytes[8..], false);
        for (pixel, out) in block.iter_mut().enumerate() {
            out[3] = ramp[alpha_index(words, alpha_slot(pixel))];
            if premultiplied {
                unpremultiply(out);
            }
        }
        block
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use pretty_assertions::assert_eq;

    fn bc1_block(color0: u16, color1: u16, controls: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&color0.to_le_bytes());
        bytes.extend_from_slice(&color1.to_le_bytes());
        bytes.extend_from_slice(&controls.to_le_bytes());
        bytes
    }

    #[test]
    fn test_bc1_solid_red() {
        let rgba = bc1(&bc1_block(0xF800, 0x001F, 0), 4, 4, 0).unwrap();
        assert_eq!(rgba.len(), 64);
        assert!(rgba.chunks(4).all(|pixel| pixel == [255, 0, 0, 255]));
    }

    #[test]
    fn test_bc1_interpolated_thirds() {
        // Controls 0,1,2,3 on the first row
        let rgba = bc1(&bc1_block(0xF800, 0x001F, 0b11_10_01_00), 4, 4, 0).unwrap();
        assert_eq!(&rgba[0..4], &[255, 0, 0, 255]);
        assert_eq!(&rgba[4..8], &[0, 0, 255, 255]);
        assert_eq!(&rgba[8..12], &[170, 0, 85, 255]);
        assert_eq!(&rgba[12..16], &[85, 0, 170, 255]);
    }

    #[test]
    fn test_bc1_equal_colors_punch_through() {
        let rgba = bc1(&bc1_block(0x1234, 0x1234, 0xFFFF_FFFF), 4, 4, 0).unwrap();
        assert!(rgba.chunks(4).all(|pixel| pixel == [0, 0, 0, 0]));
    }

    #[test]
    fn test_bc1_midpoint_when_not_greater() {
        let rgba = bc1(&bc1_block(0x001F, 0xF800, 0b10), 4, 4, 0).unwrap();
        assert_eq!(&rgba[0..4], &[127, 0, 127, 255]);
    }

    #[test]
    fn test_bc1_alpha_flag() {
        let rgba = bc1(&bc1_block(0x0000, 0x0000, 0xFFFF_FFFF), 4, 4, 0x80).unwrap();
        assert!(rgba.chunks(4).all(|pixel| pixel == [0, 0, 0, 0x80]));
    }

    #[test]
    fn test_bc1_clips_partial_blocks() {
        let mut data = bc1_block(0xF800, 0, 0);
        data.extend(bc1_block(0x001F, 0, 0));
        let rgba = bc1(&data, 6, 2, 0).unwrap();

        assert_eq!(rgba.len(), 6 * 2 * 4);
        for row in rgba.chunks(6 * 4) {
            for (x, pixel) in row.chunks(4).enumerate() {
                let expected = if x < 4 { [255, 0, 0, 255] } else { [0, 0, 255, 255] };
                assert_eq!(pixel, expected);
            }
        }
    }

    #[test]
    fn test_bc1_truncated() {
        let err = bc1(&[0; 8], 8, 4, 0).unwrap_err();
        assert_eq!(
            err,
            CodecError::TruncatedPayload {
                expected: 16,
                actual: 8
            }
        );
    }

    #[test]
    fn test_bc2_explicit_alpha() {
        let mut data = Vec::new();
        for row in [0x0000u16, 0xFFFF, 0x3210, 0xF0F0] {
            data.extend_from_slice(&row.to_le_bytes());
        }
        data.extend(bc1_block(0xFFFF, 0x0000, 0));

        let rgba = bc2(&data, 4, 4, false).unwrap();
        let alpha: Vec<u8> = rgba.chunks(4).map(|pixel| pixel[3]).collect();
        assert_eq!(
            alpha,
            vec![0, 0, 0, 0, 255, 255, 255, 255, 0, 17, 34, 51, 0, 255, 0, 255]
        );
        assert_eq!(&rgba[4 * 4..4 * 4 + 3], &[255, 255, 255]);
    }

    #[test]
    fn test_bc2_no_punch_through() {
        let mut data = 0xFFFF_FFFF_FFFF_FFFFu64.to_le_bytes().to_vec();
        data.extend(bc1_block(0x0000, 0x0000, 0xFFFF_FFFF));

        let rgba = bc2(&data, 4, 4, false).unwrap();
        assert!(rgba.chunks(4).all(|pixel| pixel == [0, 0, 0, 255]));
    }

    #[test]
    fn test_alpha_ramp_sevenths() {
        assert_eq!(alpha_ramp(255, 0), [255, 0, 219, 182, 146, 109, 73, 36]);
    }

    #[test]
    fn test_alpha_ramp_fifths() {
        assert_eq!(alpha_ramp(0, 255), [0, 255, 51, 102, 153, 204, 0, 255]);
    }

    #[test]
    fn test_alpha_ramp_equal_endpoints() {
        assert_eq!(alpha_ramp(90, 90), [90, 90, 90, 90, 90, 90, 0, 255]);
    }

    #[test]
    fn test_alpha_index_straddles_words() {
        // Slot 5 covers bits 15..=17: bit 15 of word 0 and bits 0..=1 of word 1
        assert_eq!(alpha_index([0x8000, 0x0003, 0], 5), 0b111);
        assert_eq!(alpha_index([0x8000, 0x0000, 0], 5), 0b001);
        assert_eq!(alpha_index([0x0000, 0x0002, 0], 5), 0b100);
        // Slot 10 covers bits 30..=32
        assert_eq!(alpha_index([0, 0x4000, 0x0001], 10), 0b101);
    }

    #[test]
    fn test_alpha_index_packed_run() {
        // Indices 0..=7 followed by 7..=0, packed at 3 bits each
        let indices: Vec<u64> = (0..8).chain((0..8).rev()).collect();
        let packed = indices
            .iter()
            .enumerate()
            .fold(0u64, |acc, (slot, &index)| acc | (index << (3 * slot)));
        let words = [packed as u16, (packed >> 16) as u16, (packed >> 32) as u16];

        for (slot, &index) in indices.iter().enumerate() {
            assert_eq!(alpha_index(words, slot), index as usize);
        }
    }

    #[test]
    fn test_alpha_slots_run_bottom_row_first() {
        let slots: Vec<usize> = (0..16).map(alpha_slot).collect();
        assert_eq!(
            slots,
            vec![12, 13, 14, 15, 8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3]
        );
    }

    fn bc3_block(alpha0: u8, alpha1: u8, packed: u64) -> Vec<u8> {
        let mut data = vec![alpha0, alpha1];
        data.extend_from_slice(&packed.to_le_bytes()[..6]);
        data.extend(bc1_block(0xFFFF, 0x0000, 0));
        data
    }

    #[test]
    fn test_bc3_lowest_index_is_bottom_left_pixel() {
        let rgba = bc3(&bc3_block(255, 0, 0b001), 4, 4, false).unwrap();
        let alpha: Vec<u8> = rgba.chunks(4).map(|pixel| pixel[3]).collect();

        let mut expected = vec![255; 16];
        expected[12] = 0;
        assert_eq!(alpha, expected);
    }

    #[test]
    fn test_bc3_first_index_word_covers_bottom_rows() {
        // Slots 0..=3 (the bottom row) select alpha1
        let packed = (0..4).fold(0u64, |acc, slot| acc | (1 << (3 * slot)));
        let rgba = bc3(&bc3_block(200, 10, packed), 4, 4, false).unwrap();
        let alpha: Vec<u8> = rgba.chunks(4).map(|pixel| pixel[3]).collect();
        assert_eq!(&alpha[..12], &[200; 12]);
        assert_eq!(&alpha[12..], &[10; 4]);
    }

    #[test]
    fn test_bc3_alpha_and_color() {
        let mut data = vec![255, 0];
        // Every pixel uses ramp index 2
        let packed = (0..16).fold(0u64, |acc, pixel| acc | (2 << (3 * pixel)));
        data.extend_from_slice(&packed.to_le_bytes()[..6]);
        data.extend(bc1_block(0x07E0, 0x0000, 0));

        let rgba = bc3(&data, 4, 4, false).unwrap();
        assert!(rgba.chunks(4).all(|pixel| pixel == [0, 255, 0, 219]));
    }

    #[test]
    fn test_bc3_premultiplied() {
        let mut data = vec![255, 0];
        // Index 5 selects 109 from the sevenths ramp
        let packed = (0..16).fold(0u64, |acc, pixel| acc | (5 << (3 * pixel)));
        data.extend_from_slice(&packed.to_le_bytes()[..6]);
        // 565 with only red at 16 of 31
        data.extend(bc1_block(16 << 11, 0x0000, 0));

        let rgba = bc3(&data, 4, 4, true).unwrap();
        // 131 * 255 / 109 = 306.4, clamped
        assert_eq!(&rgba[0..4], &[255, 0, 0, 109]);
    }

    #[test]
    fn test_unpremultiply() {
        let mut pixel = [64, 32, 0, 128];
        unpremultiply(&mut pixel);
        assert_eq!(pixel, [128, 64, 0, 128]);

        let mut transparent = [10, 20, 30, 0];
        unpremultiply(&mut transparent);
        assert_eq!(transparent, [10, 20, 30, 0]);
    }

    #[test]
    fn test_unpremultiply_rounds_half_to_even() {
        // 1 * 255 / 2 = 127.5 -> 128, 3 * 255 / 2 = 382.5 -> clamp
        let mut pixel = [1, 3, 0, 2];
        unpremultiply(&mut pixel);
        assert_eq!(pixel, [128, 255, 0, 2]);

        // 5 * 255 / 6 = 212.5 -> 212
        let mut pixel = [5, 0, 0, 6];
        unpremultiply(&mut pixel);
        assert_eq!(pixel[0], 212);
    }
}
