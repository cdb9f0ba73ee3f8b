// Re-export glam for convenience
pub use glam::*;

// Cornell math types
mod ray;
mod vector;

pub use ray::Ray;
pub use vector::{checked_normalize, MathError};

/// RGB color, linear radiance or reflectance per channel.
pub type Color = Vec3;
