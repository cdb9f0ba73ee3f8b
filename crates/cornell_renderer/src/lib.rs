//! Cornell Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for closed, purely diffuse enclosures.
//!
//! The image is split into chunks that a per-render worker pool drains
//! from a shared queue; every pixel is supersampled with jittered camera
//! rays whose radiance is estimated by an iterative path integrator with
//! Russian roulette termination.

mod camera;
mod chunk;
mod error;
mod framebuffer;
mod hittable;
mod integrator;
pub mod material;
mod renderer;

pub use camera::Camera;
pub use chunk::{generate_chunks, render_chunk, Chunk, DEFAULT_CHUNK_SIZE};
pub use error::{RenderError, RenderResult};
pub use framebuffer::FrameBuffer;
pub use hittable::{intersect_triangle, HitRecord, Hittable, Visibility, INTERSECT_EPSILON};
pub use integrator::{PathIntegrator, DEFAULT_MAX_DEPTH, ROULETTE_DEPTH};
pub use renderer::{color_to_rgb, render, render_pixel, worker_count, RenderConfig, Renderer};

/// Re-export scene and math types used in the public API
pub use cornell_core::{SceneGeometry, Triangle};
pub use cornell_math::{Color, Ray, Vec3};
pub use image::RgbImage;
