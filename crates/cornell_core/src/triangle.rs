//! Triangle primitive.
//!
//! Triangles are immutable once built: the face normal is derived from the
//! vertex winding (v1 -> v2 -> v3, right-hand rule) at construction and
//! never recomputed.

use cornell_math::{checked_normalize, Color, MathError, Vec3};
use rand::Rng;

/// A flat-shaded diffuse triangle, optionally emissive.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Vertices
    v1: Vec3,
    v2: Vec3,
    v3: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Diffuse reflectance per channel
    albedo: Color,
    /// Emitted radiance, `None` for non-lights
    emission: Option<Color>,
    /// Skipped by primary camera rays so the camera can look through it
    camera_occluder: bool,
}

impl Triangle {
    /// Create a new diffuse triangle from three vertices.
    ///
    /// Fails if the vertices are non-finite or span zero area, since the
    /// normal would otherwise be NaN.
    pub fn new(v1: Vec3, v2: Vec3, v3: Vec3, albedo: Color) -> Result<Self, MathError> {
        let normal = checked_normalize((v2 - v1).cross(v3 - v1))?;

        Ok(Self {
            v1,
            v2,
            v3,
            normal,
            albedo,
            emission: None,
            camera_occluder: false,
        })
    }

    /// Turn this triangle into a light source.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = Some(emission);
        self
    }

    /// Mark this triangle as invisible to primary camera rays.
    pub fn with_camera_occluder(mut self, camera_occluder: bool) -> Self {
        self.camera_occluder = camera_occluder;
        self
    }

    /// The three vertices in winding order.
    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v1, self.v2, self.v3]
    }

    /// Unit face normal.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    #[inline]
    pub fn albedo(&self) -> Color {
        self.albedo
    }

    #[inline]
    pub fn emission(&self) -> Option<Color> {
        self.emission
    }

    /// Emission, or black for non-lights.
    #[inline]
    pub fn emitted(&self) -> Color {
        self.emission.unwrap_or(Color::ZERO)
    }

    #[inline]
    pub fn is_emissive(&self) -> bool {
        self.emission.is_some()
    }

    #[inline]
    pub fn is_camera_occluder(&self) -> bool {
        self.camera_occluder
    }

    /// Surface area.
    pub fn area(&self) -> f32 {
        0.5 * (self.v2 - self.v1).cross(self.v3 - self.v1).length()
    }

    /// Arithmetic mean of the vertices.
    pub fn centroid(&self) -> Vec3 {
        (self.v1 + self.v2 + self.v3) / 3.0
    }

    /// Sample a uniformly distributed point on the triangle.
    ///
    /// Draws a point in the unit square and folds the upper half back onto
    /// the lower-left triangle. Provided for callers that sample emitters
    /// directly; the path integrator only reaches lights by hitting them.
    pub fn sample_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let mut r1: f32 = rng.gen();
        let mut r2: f32 = rng.gen();

        if r1 + r2 > 1.0 {
            r1 = 1.0 - r1;
            r2 = 1.0 - r2;
        }

        let a = 1.0 - r1 - r2;
        self.v1 * a + self.v2 * r1 + self.v3 * r2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Color {
        Color::splat(0.5)
    }

    #[test]
    fn test_normal_follows_winding() {
        // Counter-clockwise seen from +z
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            grey(),
        )
        .unwrap();
        assert!((tri.normal() - Vec3::Z).length() < 1e-6);

        // Swapping two vertices flips it
        let flipped = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            grey(),
        )
        .unwrap();
        assert!((flipped.normal() + Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_normal_points_away_from_reference_point() {
        // Wall at x = 1 wound counter-clockwise when viewed from outside (+x)
        let tri = Triangle::new(
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 2.0, 1.0),
            grey(),
        )
        .unwrap();
        let interior = Vec3::new(0.0, 1.0, 0.0);
        assert!(tri.normal().dot(interior - tri.centroid()) < 0.0);
    }

    #[test]
    fn test_degenerate_triangle_rejected() {
        let collinear = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 2.0, 2.0),
            grey(),
        );
        assert_eq!(collinear.unwrap_err(), MathError::ZeroLength);

        let non_finite = Triangle::new(
            Vec3::new(f32::NAN, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            grey(),
        );
        assert!(matches!(non_finite, Err(MathError::NonFinite(..))));
    }

    #[test]
    fn test_emission_and_role() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, grey()).unwrap();
        assert!(!tri.is_emissive());
        assert_eq!(tri.emitted(), Color::ZERO);
        assert!(!tri.is_camera_occluder());

        let light = tri
            .with_emission(Color::new(17.0, 12.0, 4.0))
            .with_camera_occluder(true);
        assert!(light.is_emissive());
        assert_eq!(light.emission(), Some(Color::new(17.0, 12.0, 4.0)));
        assert!(light.is_camera_occluder());
    }

    #[test]
    fn test_area_and_centroid() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            grey(),
        )
        .unwrap();
        assert!((tri.area() - 2.0).abs() < 1e-6);
        assert!((tri.centroid() - Vec3::new(2.0 / 3.0, 2.0 / 3.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_sample_point_inside_triangle() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            grey(),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let mut mean = Vec3::ZERO;
        let n = 20_000;
        for _ in 0..n {
            let p = tri.sample_point(&mut rng);
            assert!(p.x >= 0.0 && p.y >= 0.0 && p.x + p.y <= 1.0 + 1e-6);
            assert_eq!(p.z, 0.0);
            mean += p;
        }
        mean /= n as f32;

        // Uniform sampling converges on the centroid
        assert!((mean - tri.centroid()).length() < 0.01);
    }
}
