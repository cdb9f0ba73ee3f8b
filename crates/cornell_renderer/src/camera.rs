//! Camera for ray generation.
//!
//! A fixed pinhole camera looking down -z. Pixel (0, 0) is the top-left
//! corner of the image.

use cornell_math::{checked_normalize, MathError, Ray, Vec3};
use rand::{Rng, RngCore};

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    position: Vec3,
    vfov: f32, // Vertical field of view in degrees

    // Cached computed values
    scale: f32,
    aspect: f32,
}

impl Camera {
    /// Default camera position, just outside the front wall of the stock box.
    pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 1.0, 2.3);
    /// Default vertical field of view in degrees.
    pub const DEFAULT_FOV: f32 = 80.0;

    /// Create a camera for an image of the given size.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        let mut camera = Self {
            image_width,
            image_height,
            position: Self::DEFAULT_POSITION,
            vfov: Self::DEFAULT_FOV,
            scale: 0.0,
            aspect: 0.0,
        };
        camera.update();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self.update();
        self
    }

    fn update(&mut self) {
        self.scale = (self.vfov * 0.5).to_radians().tan();
        self.aspect = self.image_width as f32 / self.image_height as f32;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// tan(vfov / 2)
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Generate a ray through pixel (x, y) with a random offset inside the
    /// pixel for anti-aliasing.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Result<Ray, MathError> {
        let jx: f32 = rng.gen();
        let jy: f32 = rng.gen();
        self.ray_through(x as f32 + jx, y as f32 + jy)
    }

    /// Generate the ray through a continuous image-plane position, in pixels.
    pub fn ray_through(&self, px: f32, py: f32) -> Result<Ray, MathError> {
        let ndc_x = 2.0 * (px / self.image_width as f32) - 1.0;
        let ndc_y = 1.0 - 2.0 * (py / self.image_height as f32);

        let direction = Vec3::new(ndc_x * self.aspect * self.scale, ndc_y * self.scale, -1.0);
        Ok(Ray::new(self.position, checked_normalize(direction)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_projection_terms() {
        let camera = Camera::new(200, 100);
        assert!((camera.aspect() - 2.0).abs() < 1e-6);
        assert!((camera.scale() - 40f32.to_radians().tan()).abs() < 1e-6);
        assert_eq!(camera.position(), Vec3::new(0.0, 1.0, 2.3));
    }

    #[test]
    fn test_center_ray_looks_down_negative_z() {
        let camera = Camera::new(100, 100);
        let ray = camera.ray_through(50.0, 50.0).unwrap();
        assert!((ray.direction() - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(ray.origin(), Camera::DEFAULT_POSITION);
    }

    #[test]
    fn test_corner_rays() {
        let camera = Camera::new(100, 50).with_fov(90.0);

        // Top-left corner: x = -aspect * scale, y = +scale
        let ray = camera.ray_through(0.0, 0.0).unwrap();
        let expected = Vec3::new(-2.0, 1.0, -1.0).normalize();
        assert!((ray.direction() - expected).length() < 1e-5);

        // Bottom-right corner
        let ray = camera.ray_through(100.0, 50.0).unwrap();
        let expected = Vec3::new(2.0, -1.0, -1.0).normalize();
        assert!((ray.direction() - expected).length() < 1e-5);
    }

    #[test]
    fn test_jittered_rays_stay_inside_pixel() {
        let camera = Camera::new(4, 4);
        let mut rng = StdRng::seed_from_u64(42);

        let lo = camera.ray_through(1.0, 2.0).unwrap().direction();
        let hi = camera.ray_through(2.0, 3.0).unwrap().direction();

        for _ in 0..100 {
            let d = camera.get_ray(1, 2, &mut rng).unwrap().direction();
            // Compare on the z = -1 image plane
            let (x, y) = (d.x / -d.z, d.y / -d.z);
            assert!(x >= lo.x / -lo.z - 1e-6 && x <= hi.x / -hi.z + 1e-6);
            assert!(y <= lo.y / -lo.z + 1e-6 && y >= hi.y / -hi.z - 1e-6);
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }
}
