//! Guarded vector operations.
//!
//! `glam` happily divides by zero when normalizing; everything that feeds
//! geometry or sampling goes through here instead so a malformed input
//! surfaces as an error rather than NaN in the radiance estimate.

use crate::Vec3;
use thiserror::Error;

/// Errors from vector operations that have no meaningful result.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("cannot normalize zero-length vector")]
    ZeroLength,

    #[error("non-finite vector ({0}, {1}, {2})")]
    NonFinite(f32, f32, f32),
}

/// Normalize `v`, failing on zero-length or non-finite input.
pub fn checked_normalize(v: Vec3) -> Result<Vec3, MathError> {
    if !v.is_finite() {
        return Err(MathError::NonFinite(v.x, v.y, v.z));
    }
    v.try_normalize().ok_or(MathError::ZeroLength)
}
