//! Cornell Core - Scene data for the enclosure path tracer.
//!
//! This crate provides:
//!
//! - **Geometry types**: `Triangle`, `SceneGeometry`
//! - **Stock scene**: the Cornell box with two blocks and one area light
//! - **Scene descriptions**: JSON loading of alternative enclosures
//!
//! # Example
//!
//! ```ignore
//! use cornell_core::SceneGeometry;
//!
//! let scene = SceneGeometry::cornell_box()?;
//! println!("Loaded {} triangles, {} emissive",
//!     scene.len(),
//!     scene.lights().count());
//! ```

pub mod cornell;
pub mod description;
pub mod error;
pub mod scene;
pub mod triangle;

// Re-export commonly used types
pub use cornell_math::Color;
pub use description::{SceneDescription, TriangleDescription};
pub use error::{SceneError, SceneResult};
pub use scene::{SceneBuilder, SceneGeometry};
pub use triangle::Triangle;
