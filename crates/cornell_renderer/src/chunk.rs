//! Chunk-based tile rendering.
//!
//! Divides the image into rectangular chunks that are rendered
//! independently: a worker claims a whole chunk, renders every pixel in it
//! and writes the results straight into the shared frame buffer.

use rand::RngCore;

use crate::camera::Camera;
use crate::error::RenderResult;
use crate::framebuffer::FrameBuffer;
use crate::integrator::PathIntegrator;
use crate::renderer::{color_to_rgb, render_pixel};

/// A rectangular region of the image, `[x_start, x_end) x [y_start, y_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub x_start: u32,
    pub x_end: u32,
    pub y_start: u32,
    pub y_end: u32,
    /// Position of this chunk in generation order
    pub index: usize,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(x_start: u32, x_end: u32, y_start: u32, y_end: u32, index: usize) -> Self {
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
            index,
        }
    }

    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    pub fn height(&self) -> u32 {
        self.y_end - self.y_start
    }

    /// Get the total number of pixels in this chunk.
    pub fn pixel_count(&self) -> u32 {
        self.width() * self.height()
    }

    /// Pixel coordinates in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y_start..self.y_end).flat_map(move |y| (self.x_start..self.x_end).map(move |x| (x, y)))
    }
}

/// Default chunk edge length in pixels.
pub const DEFAULT_CHUNK_SIZE: u32 = 100;

/// Split a `width` x `height` image into `chunk_size` squares, clipping the
/// last row and column at the image border. Chunks are returned row-major.
pub fn generate_chunks(width: u32, height: u32, chunk_size: u32) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    if chunk_size == 0 {
        return chunks;
    }

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let x_end = x.saturating_add(chunk_size).min(width);
            let y_end = y.saturating_add(chunk_size).min(height);
            chunks.push(Chunk::new(x, x_end, y, y_end, chunks.len()));
            x = x_end;
        }
        y = y.saturating_add(chunk_size).min(height);
    }

    chunks
}

/// Render every pixel of `chunk` into `framebuffer`.
pub fn render_chunk(
    chunk: &Chunk,
    camera: &Camera,
    integrator: &PathIntegrator<'_>,
    samples_per_pixel: u32,
    framebuffer: &FrameBuffer,
    rng: &mut dyn RngCore,
) -> RenderResult<()> {
    for (x, y) in chunk.pixels() {
        let color = render_pixel(camera, integrator, x, y, samples_per_pixel, rng)?;
        framebuffer.set(x, y, color_to_rgb(color))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every pixel of the image is covered by exactly one chunk.
    fn assert_exact_cover(width: u32, height: u32, chunk_size: u32) {
        let chunks = generate_chunks(width, height, chunk_size);
        let mut hits = vec![0u32; (width * height) as usize];

        for chunk in &chunks {
            assert!(chunk.x_start < chunk.x_end && chunk.x_end <= width);
            assert!(chunk.y_start < chunk.y_end && chunk.y_end <= height);
            assert!(chunk.width() <= chunk_size && chunk.height() <= chunk_size);
            for (x, y) in chunk.pixels() {
                hits[(y * width + x) as usize] += 1;
            }
        }

        assert!(hits.iter().all(|&h| h == 1), "{}x{} / {}", width, height, chunk_size);
    }

    #[test]
    fn test_generate_chunks_exact_fit() {
        let chunks = generate_chunks(200, 200, 100);
        assert_eq!(chunks.len(), 4); // 2x2 grid

        let total_pixels: u32 = chunks.iter().map(|c| c.pixel_count()).sum();
        assert_eq!(total_pixels, 200 * 200);
    }

    #[test]
    fn test_generate_chunks_partial_fit() {
        let chunks = generate_chunks(1024, 720, 100);
        assert_eq!(chunks.len(), 11 * 8);

        let last = chunks.last().unwrap();
        assert_eq!((last.x_start, last.x_end), (1000, 1024));
        assert_eq!((last.y_start, last.y_end), (700, 720));
    }

    #[test]
    fn test_chunks_cover_image_disjointly() {
        for &(w, h, s) in &[
            (1, 1, 100),
            (2, 2, 1),
            (7, 3, 2),
            (100, 100, 100),
            (101, 99, 10),
            (13, 250, 64),
            (5, 5, 7),
        ] {
            assert_exact_cover(w, h, s);
        }
    }

    #[test]
    fn test_chunk_indices_are_sequential() {
        let chunks = generate_chunks(30, 20, 8);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_empty_image_has_no_chunks() {
        assert!(generate_chunks(0, 10, 4).is_empty());
        assert!(generate_chunks(10, 0, 4).is_empty());
        assert!(generate_chunks(10, 10, 0).is_empty());
    }

    #[test]
    fn test_chunk_pixels_row_major() {
        let chunk = Chunk::new(2, 4, 5, 7, 0);
        let pixels: Vec<_> = chunk.pixels().collect();
        assert_eq!(pixels, vec![(2, 5), (3, 5), (2, 6), (3, 6)]);
        assert_eq!(chunk.pixel_count(), 4);
    }
}
