//! Render errors.
//!
//! A "no hit" is never an error; everything here aborts the whole render.

use cornell_math::MathError;
use thiserror::Error;

/// Errors that can occur while rendering a frame.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("Numerical fault at pixel ({x}, {y}): {source}")]
    Numerical {
        x: u32,
        y: u32,
        #[source]
        source: MathError,
    },

    #[error("Pixel ({x}, {y}) written twice")]
    DoubleWrite { x: u32, y: u32 },

    #[error("Frame incomplete: {written} of {expected} pixels written")]
    IncompleteFrame { written: usize, expected: usize },

    #[error("Chunk queue disconnected before scheduling finished")]
    QueueDisconnected,

    #[error("Render worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
