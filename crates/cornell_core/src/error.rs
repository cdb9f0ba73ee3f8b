//! Errors raised while constructing scene geometry.

use cornell_math::MathError;
use thiserror::Error;

/// Errors that can occur while building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Degenerate triangle {index}: {source}")]
    DegenerateTriangle {
        index: usize,
        #[source]
        source: MathError,
    },

    #[error("Non-finite vertex in triangle {0}")]
    NonFinite(usize),

    #[error("Invalid albedo in triangle {index}: ({r}, {g}, {b})")]
    InvalidAlbedo { index: usize, r: f32, g: f32, b: f32 },

    #[error("Invalid emission in triangle {0}")]
    InvalidEmission(usize),

    #[error("Invalid background color")]
    InvalidBackground,

    #[error("Scene contains no triangles")]
    Empty,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;
