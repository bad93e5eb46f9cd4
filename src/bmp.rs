//! BMP encoding for 1-bit canvases.
//!
//! Writes the smallest container most e-paper clients accept:
//! - `BITMAPFILEHEADER` (14 bytes)
//! - `BITMAPINFOHEADER` (40 bytes), 1 bit per pixel, uncompressed
//! - 2-entry palette: index 0 = black, index 1 = white
//! - rows stored bottom-up, each padded to a 4-byte boundary
//!
//! The canvas already stores pixels as "bit set = white", so rows are copied
//! without any per-pixel conversion.

use crate::canvas::Canvas;

/// MIME type of the encoded image
pub const CONTENT_TYPE: &str = "image/bmp";

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;
const PALETTE_LEN: u32 = 2 * 4;
const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_LEN + INFO_HEADER_LEN + PALETTE_LEN;

/// 72 DPI expressed in pixels per metre
const PIXELS_PER_METRE: u32 = 2835;

/// Row stride of the BMP pixel array for a given width
fn stride(width: u32) -> u32 {
    width.div_ceil(32) * 4
}

/// Encode `canvas` as a 1-bpp BMP file.
pub fn encode(canvas: &Canvas) -> Vec<u8> {
    let width = canvas.width();
    let height = canvas.height();
    let stride = stride(width);
    let image_size = stride * height;
    let file_size = PIXEL_DATA_OFFSET + image_size;

    let mut out = Vec::with_capacity(file_size as usize);

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // reserved
    out.extend_from_slice(&PIXEL_DATA_OFFSET.to_le_bytes());

    // BITMAPINFOHEADER
    out.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes()); // positive = bottom-up
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&1u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&image_size.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes()); // colors used
    out.extend_from_slice(&2u32.to_le_bytes()); // important colors

    // Palette (BGRA)
    out.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    out.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0x00]);

    let row_len = canvas.bytes_per_row() as usize;
    let padding = stride as usize - row_len;
    let unused_bits = (row_len as u32 * 8 - width) as u8;
    // Trailing bits past the last pixel are written as black, as most encoders do
    let tail_mask: u8 = if unused_bits == 0 { 0xFF } else { 0xFF << unused_bits };

    for row in canvas.buffer().chunks(row_len).rev() {
        let (last, body) = match row.split_last() {
            Some(split) => split,
            None => continue,
        };
        out.extend_from_slice(body);
        out.push(last & tail_mask);
        out.extend(std::iter::repeat(0u8).take(padding));
    }

    out
}
