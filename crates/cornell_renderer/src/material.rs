//! Lambertian surface scattering.
//!
//! Every surface in the scene is purely diffuse, so scattering is a
//! cosine-weighted direction about the surface normal and the throughput
//! update is just the albedo (the cosine and the 1/pi of the BRDF cancel
//! against the sampling density).

use std::f32::consts::PI;

use cornell_math::{checked_normalize, Color, MathError, Ray, Vec3};
use rand::{Rng, RngCore};

/// Offset applied along the normal to bounce-ray origins.
pub const RAY_EPSILON: f32 = 1e-5;

/// Build two unit tangents `(u, v)` so that `(u, v, normal)` is orthonormal.
///
/// The helper axis is (0, 1, 0) unless the normal is close to the y-z
/// plane, in which case (1, 0, 0) is used so the cross product never
/// vanishes.
pub fn orthonormal_basis(normal: Vec3) -> Result<(Vec3, Vec3), MathError> {
    let helper = if normal.x.abs() > 0.1 { Vec3::Y } else { Vec3::X };
    let u = checked_normalize(helper.cross(normal))?;
    let v = normal.cross(u);
    Ok((u, v))
}

/// Sample a direction in the hemisphere around `normal` with density
/// proportional to the cosine of the angle to the normal.
pub fn cosine_sample_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Result<Vec3, MathError> {
    let r1 = 2.0 * PI * rng.gen::<f32>();
    let r2: f32 = rng.gen();
    let r2s = r2.sqrt();

    let (u, v) = orthonormal_basis(normal)?;
    checked_normalize(u * (r1.cos() * r2s) + v * (r1.sin() * r2s) + normal * (1.0 - r2).sqrt())
}

/// Scatter off a diffuse surface at `point` with outward `normal`.
///
/// The new origin is pushed off the surface so the bounce ray cannot
/// re-hit the triangle it starts on.
pub fn scatter(point: Vec3, normal: Vec3, rng: &mut dyn RngCore) -> Result<Ray, MathError> {
    let direction = cosine_sample_hemisphere(normal, rng)?;
    Ok(Ray::new(point + normal * RAY_EPSILON, direction))
}

/// Russian roulette on a surface with the given albedo.
///
/// The path survives with probability `p = max(albedo)`; on survival the
/// albedo is returned rescaled by `1 / p` so the estimate stays unbiased.
/// Returns `None` when the path is terminated.
pub fn russian_roulette(albedo: Color, rng: &mut dyn RngCore) -> Option<Color> {
    let p = albedo.max_element();
    if rng.gen::<f32>() < p {
        Some(albedo / p)
    } else {
        None
    }
}
