//! Path tracing radiance estimator.
//!
//! The estimate for a camera ray is the emission of the first surface hit
//! plus its albedo times the estimate for a cosine-sampled bounce ray. The
//! recursion is unrolled into a loop carrying the accumulated radiance and
//! the product of albedos along the path (the throughput).

use cornell_core::SceneGeometry;
use cornell_math::{Color, MathError, Ray};
use rand::RngCore;

use crate::hittable::{Hittable, Visibility};
use crate::material::{russian_roulette, scatter};

/// Depth past which Russian roulette may terminate a path.
pub const ROULETTE_DEPTH: u32 = 6;

/// Hard depth limit. Only reached when roulette cannot terminate the path,
/// i.e. albedos at or above 1.
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Monte Carlo radiance estimator over a diffuse triangle scene.
#[derive(Debug, Clone, Copy)]
pub struct PathIntegrator<'a> {
    scene: &'a SceneGeometry,
    roulette_depth: u32,
    max_depth: u32,
}

impl<'a> PathIntegrator<'a> {
    pub fn new(scene: &'a SceneGeometry) -> Self {
        Self {
            scene,
            roulette_depth: ROULETTE_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the depth past which Russian roulette applies.
    pub fn with_roulette_depth(mut self, roulette_depth: u32) -> Self {
        self.roulette_depth = roulette_depth;
        self
    }

    /// Set the hard depth limit.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn scene(&self) -> &'a SceneGeometry {
        self.scene
    }

    /// Estimate the radiance arriving along a camera ray.
    ///
    /// The ray is treated as primary (depth 1), so camera-occluder
    /// triangles are invisible to it. Fails only on numerical faults; a
    /// non-finite estimate is reported rather than returned.
    pub fn radiance(&self, ray: &Ray, rng: &mut dyn RngCore) -> Result<Color, MathError> {
        let mut ray = *ray;
        let mut depth: u32 = 1;
        let mut radiance = Color::ZERO;
        let mut throughput = Color::ONE;

        loop {
            let Some(hit) = self.scene.hit(&ray, Visibility::for_depth(depth)) else {
                radiance += throughput * self.scene.background();
                break;
            };

            let emitted = hit.triangle.emitted();
            let mut albedo = hit.triangle.albedo();

            depth += 1;
            if depth > self.roulette_depth {
                match russian_roulette(albedo, rng) {
                    Some(rescaled) => albedo = rescaled,
                    None => {
                        radiance += throughput * emitted;
                        break;
                    }
                }
            }

            radiance += throughput * emitted;
            if depth > self.max_depth {
                break;
            }
            throughput *= albedo;

            let normal = hit.facing_normal(ray.direction());
            ray = scatter(hit.p, normal, rng)?;
        }

        if radiance.is_finite() {
            Ok(radiance)
        } else {
            Err(MathError::NonFinite(radiance.x, radiance.y, radiance.z))
        }
    }
}
