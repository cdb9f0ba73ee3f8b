//! Shared output raster.
//!
//! Workers write disjoint chunks of the same buffer concurrently. Each
//! pixel is its own atomic word, so writes need no lock; the bit above the
//! packed 0xRRGGBB marks a pixel as written.

use std::sync::atomic::{AtomicU32, Ordering};

use image::{Rgb, RgbImage};

use crate::error::{RenderError, RenderResult};

const WRITTEN: u32 = 1 << 24;

/// A width x height grid of 8-bit RGB pixels, writable through `&self`.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Box<[AtomicU32]>,
}

impl FrameBuffer {
    /// Create an empty (all unwritten) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: (0..len).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    /// Store the final color of pixel (x, y).
    ///
    /// Fails if the pixel was already written.
    pub fn set(&self, x: u32, y: u32, rgb: [u8; 3]) -> RenderResult<()> {
        let [r, g, b] = rgb;
        let packed = WRITTEN | (r as u32) << 16 | (g as u32) << 8 | b as u32;

        let previous = self.pixels[self.index(x, y)].swap(packed, Ordering::Relaxed);
        if previous & WRITTEN != 0 {
            return Err(RenderError::DoubleWrite { x, y });
        }
        Ok(())
    }

    /// The color of pixel (x, y), or `None` if it has not been written.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let packed = self.pixels[self.index(x, y)].load(Ordering::Relaxed);
        (packed & WRITTEN != 0).then(|| unpack(packed))
    }

    /// Number of pixels written so far.
    pub fn written(&self) -> usize {
        self.pixels
            .iter()
            .filter(|p| p.load(Ordering::Relaxed) & WRITTEN != 0)
            .count()
    }

    /// Convert into a row-major RGB image, failing if any pixel is missing.
    pub fn into_image(self) -> RenderResult<RgbImage> {
        let expected = self.pixels.len();
        let written = self.written();
        if written != expected {
            return Err(RenderError::IncompleteFrame { written, expected });
        }

        let pixels = self.pixels;
        let width = self.width as usize;
        Ok(RgbImage::from_fn(self.width, self.height, |x, y| {
            let packed = pixels[y as usize * width + x as usize].load(Ordering::Relaxed);
            Rgb(unpack(packed))
        }))
    }
}

#[inline]
fn unpack(packed: u32) -> [u8; 3] {
    [(packed >> 16) as u8, (packed >> 8) as u8, packed as u8]
}
