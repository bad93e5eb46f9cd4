//! 1-bit frame buffer for the 4.2" e-paper dashboard
//!
//! The buffer layout matches what monochrome e-paper controllers expect: rows of
//! bytes, 8 horizontal pixels per byte, most significant bit first, bit set = white.
//! Both [`Canvas`] and [`GrayLayer`] implement `embedded_graphics::DrawTarget` so
//! all primitives and text go through embedded-graphics.

use core::convert::Infallible;
use embedded_graphics::{
    pixelcolor::{BinaryColor, Gray8, GrayColor},
    prelude::*,
};

/// Display dimensions
pub const WIDTH: u32 = 400;
pub const HEIGHT: u32 = 300;

/// 4×4 Bayer matrix used to dither gray layers down to 1 bit
const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Monochrome canvas. `BinaryColor::On` is black ink, `Off` is white paper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        // Each row has (width+7)/8 bytes
        let bytes_per_row = width.div_ceil(8);
        let buffer_size = (bytes_per_row * height) as usize;
        Self {
            width,
            height,
            buffer: vec![0xFF; buffer_size], // White by default
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width.div_ceil(8)
    }

    /// Packed rows, top row first
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        if x >= self.width || y >= self.height {
            return;
        }

        let byte_index = (y * self.bytes_per_row() + x / 8) as usize;
        let bit_mask = 0x80 >> (x % 8);

        match color {
            BinaryColor::Off => self.buffer[byte_index] |= bit_mask,
            BinaryColor::On => self.buffer[byte_index] &= !bit_mask,
        }
    }

    /// True when the pixel carries black ink. Out-of-range reads as white.
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte_index = (y * self.bytes_per_row() + x / 8) as usize;
        self.buffer[byte_index] & (0x80 >> (x % 8)) == 0
    }

    pub fn black_pixel_count(&self) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_black(x, y))
            .count()
    }

    /// Count black pixels inside the half-open box `[x0, x1) × [y0, y1)`.
    pub fn black_pixels_in(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
        (y0..y1.min(self.height))
            .flat_map(|y| (x0..x1.min(self.width)).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_black(x, y))
            .count()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT)
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }
}

/// 8-bit grayscale scratch layer, black by default.
///
/// Shapes drawn here at partial intensity are composited onto a [`Canvas`]
/// with an ordered dither, so a 50 % gray line comes out as a dotted line.
#[derive(Clone, Debug)]
pub struct GrayLayer {
    width: u32,
    height: u32,
    luma: Vec<u8>,
}

impl GrayLayer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            luma: vec![0; (width * height) as usize],
        }
    }

    pub fn luma(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.luma[(y * self.width + x) as usize]
    }

    /// Paint black ink on `canvas` wherever this layer is above pure black and
    /// its luma beats the dither threshold for that pixel.
    pub fn composite_onto(&self, canvas: &mut Canvas) {
        for y in 0..self.height {
            for x in 0..self.width {
                let luma = self.luma(x, y);
                if luma == 0 {
                    continue;
                }
                let threshold = BAYER_4X4[(y % 4) as usize][(x % 4) as usize] * 16 + 8;
                if luma > threshold {
                    canvas.set_pixel(x, y, BinaryColor::On);
                }
            }
        }
    }
}

impl OriginDimensions for GrayLayer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for GrayLayer {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < self.width && y < self.height {
                self.luma[(y * self.width + x) as usize] = color.luma();
            }
        }
        Ok(())
    }
}
