//! Hittable trait and HitRecord for ray-object intersection.
//!
//! The scene is an unindexed triangle list: every ray is tested against
//! every triangle.

use cornell_core::{SceneGeometry, Triangle};
use cornell_math::{Ray, Vec3};

/// Tolerance for the parallel test and the minimum hit distance.
pub const INTERSECT_EPSILON: f32 = 1e-5;

/// Which kind of ray is being traced.
///
/// Primary camera rays ignore camera-occluder triangles so the camera can
/// see through the front wall into the room; bounce rays see everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Primary,
    Bounce,
}

impl Visibility {
    /// Visibility for a ray at the given path depth (1 = camera ray).
    #[inline]
    pub fn for_depth(depth: u32) -> Self {
        if depth <= 1 {
            Visibility::Primary
        } else {
            Visibility::Bounce
        }
    }

    #[inline]
    fn sees(self, triangle: &Triangle) -> bool {
        self == Visibility::Bounce || !triangle.is_camera_occluder()
    }
}

/// Record of a ray-triangle intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Euclidean distance from the ray origin to `p`
    pub distance: f32,
    /// The triangle that was hit
    pub triangle: &'a Triangle,
}

impl<'a> HitRecord<'a> {
    /// The geometric normal, flipped if needed so it points against the
    /// incoming ray direction.
    #[inline]
    pub fn facing_normal(&self, direction: Vec3) -> Vec3 {
        let normal = self.triangle.normal();
        if direction.dot(normal) > 0.0 {
            -normal
        } else {
            normal
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Find the nearest intersection of `ray` with this object, if any.
    fn hit(&self, ray: &Ray, visibility: Visibility) -> Option<HitRecord<'_>>;
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns the world-space hit point when the ray crosses the triangle's
/// interior (edges inclusive) at a distance greater than
/// [`INTERSECT_EPSILON`] along the ray.
pub fn intersect_triangle(ray: &Ray, triangle: &Triangle) -> Option<Vec3> {
    let [v1, v2, v3] = triangle.vertices();
    let edge1 = v2 - v1;
    let edge2 = v3 - v1;

    let h = ray.direction().cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < INTERSECT_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin() - v1;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t > INTERSECT_EPSILON {
        Some(ray.at(t))
    } else {
        None
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, visibility: Visibility) -> Option<HitRecord<'_>> {
        if !visibility.sees(self) {
            return None;
        }

        intersect_triangle(ray, self).map(|p| HitRecord {
            p,
            distance: (p - ray.origin()).length(),
            triangle: self,
        })
    }
}

impl Hittable for SceneGeometry {
    fn hit(&self, ray: &Ray, visibility: Visibility) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for triangle in self.triangles() {
            if let Some(rec) = triangle.hit(ray, visibility) {
                if closest.map_or(true, |c| rec.distance < c.distance) {
                    closest = Some(rec);
                }
            }
        }

        closest
    }
}
