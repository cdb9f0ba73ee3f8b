//! The stock Cornell box.
//!
//! A 2 x 2 x 2 room spanning x in [-1, 1], y in [0, 2], z in [-1, 1] with a
//! red left wall, a green right wall, a square area light just below the
//! ceiling, and a short and a tall block standing on the floor. The front
//! wall at z = 1 closes the room for bounce rays but is tagged as a camera
//! occluder so the camera at z = 2.3 can look in.
//!
//! Room surfaces are wound so their normals face the interior. The blocks'
//! winding is mixed: four block triangles (scene indices 16, 24, 27 and 36)
//! have normals pointing into their block. The integrator orients normals
//! against the incoming ray, so these shade like the rest.

use cornell_math::{Color, Vec3};

use crate::error::SceneResult;
use crate::scene::{SceneBuilder, SceneGeometry};

/// Off-white used for floor, ceiling, back and front walls and both blocks.
pub const WHITE: Color = Color::new(0.725, 0.71, 0.68);
/// Right wall.
pub const GREEN: Color = Color::new(0.14, 0.45, 0.091);
/// Left wall.
pub const RED: Color = Color::new(0.63, 0.065, 0.05);
/// Reflectance of the light fixture itself.
pub const LIGHT_ALBEDO: Color = Color::new(0.78, 0.78, 0.78);
/// Radiance emitted by the light.
pub const LIGHT_EMISSION: Color = Color::new(17.0, 12.0, 4.0);

#[inline]
const fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

impl SceneGeometry {
    /// Build the stock enclosure.
    pub fn cornell_box() -> SceneResult<Self> {
        let builder = SceneGeometry::builder().background(Color::ZERO);
        let builder = room(builder);
        let builder = short_block(builder);
        tall_block(builder).build()
    }
}

fn room(b: SceneBuilder) -> SceneBuilder {
    b
        // front wall
        .occluder(v(-1.0, 0.0, 1.0), v(-1.0, 2.0, 1.0), v(1.0, 0.0, 1.0), WHITE)
        .occluder(v(1.0, 0.0, 1.0), v(-1.0, 2.0, 1.0), v(1.0, 2.0, 1.0), WHITE)
        // floor
        .triangle(v(-1.0, 0.0, 1.0), v(1.0, 0.0, -1.0), v(-1.0, 0.0, -1.0), WHITE)
        .triangle(v(-1.0, 0.0, 1.0), v(1.0, 0.0, 1.0), v(1.0, 0.0, -1.0), WHITE)
        // back wall
        .triangle(v(-1.0, 0.0, -1.0), v(1.0, 0.0, -1.0), v(-1.0, 2.0, -1.0), WHITE)
        .triangle(v(1.0, 0.0, -1.0), v(1.0, 2.0, -1.0), v(-1.0, 2.0, -1.0), WHITE)
        // right wall
        .triangle(v(1.0, 0.0, 1.0), v(1.0, 2.0, 1.0), v(1.0, 0.0, -1.0), GREEN)
        .triangle(v(1.0, 0.0, -1.0), v(1.0, 2.0, 1.0), v(1.0, 2.0, -1.0), GREEN)
        // left wall
        .triangle(v(-1.0, 0.0, 1.0), v(-1.0, 2.0, -1.0), v(-1.0, 2.0, 1.0), RED)
        .triangle(v(-1.0, 0.0, 1.0), v(-1.0, 0.0, -1.0), v(-1.0, 2.0, -1.0), RED)
        // ceiling
        .triangle(v(-1.0, 2.0, 1.0), v(-1.0, 2.0, -1.0), v(1.0, 2.0, -1.0), WHITE)
        .triangle(v(-1.0, 2.0, 1.0), v(1.0, 2.0, -1.0), v(1.0, 2.0, 1.0), WHITE)
        // light
        .light(
            v(-0.22, 1.98, 0.22),
            v(-0.22, 1.98, -0.22),
            v(0.22, 1.98, -0.22),
            LIGHT_ALBEDO,
            LIGHT_EMISSION,
        )
        .light(
            v(-0.22, 1.98, 0.22),
            v(0.22, 1.98, -0.22),
            v(0.22, 1.98, 0.22),
            LIGHT_ALBEDO,
            LIGHT_EMISSION,
        )
}

fn short_block(b: SceneBuilder) -> SceneBuilder {
    b
        // top
        .triangle(v(0.53, 0.60, 0.75), v(0.70, 0.60, 0.17), v(0.13, 0.60, 0.00), WHITE)
        .triangle(v(0.53, 0.60, 0.75), v(0.13, 0.60, 0.00), v(-0.05, 0.60, 0.57), WHITE)
        // left
        .triangle(v(-0.05, 0.00, 0.57), v(-0.05, 0.60, 0.57), v(0.13, 0.60, 0.57), WHITE)
        .triangle(v(-0.05, 0.00, 0.57), v(0.13, 0.60, 0.57), v(0.13, 0.00, 0.00), WHITE)
        // front
        .triangle(v(0.53, 0.00, 0.75), v(0.53, 0.60, 0.75), v(-0.05, 0.60, 0.57), WHITE)
        .triangle(v(0.53, 0.00, 0.75), v(-0.05, 0.60, 0.57), v(-0.05, 0.00, 0.57), WHITE)
        // right
        .triangle(v(0.70, 0.00, 0.17), v(0.70, 0.60, 0.17), v(0.53, 0.60, 0.75), WHITE)
        .triangle(v(0.70, 0.00, 0.17), v(0.53, 0.60, 0.75), v(0.53, 0.00, 0.75), WHITE)
        // back
        .triangle(v(0.13, 0.00, 0.00), v(0.13, 0.60, 0.00), v(0.70, 0.60, 0.17), WHITE)
        .triangle(v(0.13, 0.00, 0.00), v(0.70, 0.60, 0.17), v(0.70, 0.00, 0.17), WHITE)
        // bottom
        .triangle(v(0.53, 0.00, 0.75), v(0.70, 0.00, 0.17), v(0.13, 0.00, 0.00), WHITE)
        .triangle(v(0.53, 0.00, 0.75), v(-0.05, 0.00, 0.57), v(0.13, 0.00, 0.00), WHITE)
}

fn tall_block(b: SceneBuilder) -> SceneBuilder {
    b
        // top
        .triangle(v(-0.53, 1.20, 0.09), v(0.04, 1.20, -0.09), v(-0.14, 1.20, -0.67), WHITE)
        .triangle(v(-0.53, 1.20, 0.09), v(-0.71, 1.20, -0.49), v(-0.14, 1.20, -0.67), WHITE)
        // left
        .triangle(v(-0.53, 0.00, 0.09), v(-0.53, 1.20, 0.09), v(-0.71, 1.20, -0.49), WHITE)
        .triangle(v(-0.53, 0.00, 0.09), v(-0.71, 1.20, -0.49), v(-0.71, 0.00, -0.49), WHITE)
        // back
        .triangle(v(-0.71, 0.00, -0.49), v(-0.71, 1.20, -0.49), v(-0.14, 1.20, -0.67), WHITE)
        .triangle(v(-0.71, 0.00, -0.49), v(-0.14, 1.20, -0.67), v(-0.14, 0.00, -0.67), WHITE)
        // right
        .triangle(v(-0.14, 0.00, -0.67), v(-0.14, 1.20, -0.67), v(0.04, 1.20, -0.09), WHITE)
        .triangle(v(-0.14, 0.00, -0.67), v(0.04, 1.20, -0.09), v(0.04, 0.00, -0.09), WHITE)
        // front
        .triangle(v(0.04, 0.00, -0.09), v(0.04, 1.20, -0.09), v(-0.53, 1.20, 0.09), WHITE)
        .triangle(v(0.04, 0.00, -0.09), v(-0.53, 1.20, 0.09), v(-0.53, 0.00, 0.09), WHITE)
        // bottom
        .triangle(v(-0.53, 0.00, 0.09), v(0.04, 0.00, -0.09), v(-0.14, 0.00, -0.67), WHITE)
        .triangle(v(-0.53, 0.00, 0.09), v(-0.71, 0.00, -0.49), v(-0.14, 0.00, -0.67), WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cornell_box_builds() {
        let scene = SceneGeometry::cornell_box().unwrap();
        assert_eq!(scene.len(), 38);
        assert_eq!(scene.background(), Color::ZERO);

        let (min, max) = scene.bounds();
        assert_eq!(min, v(-1.0, 0.0, -1.0));
        assert_eq!(max, v(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_only_front_wall_is_camera_occluder() {
        let scene = SceneGeometry::cornell_box().unwrap();
        let occluders: Vec<_> = scene
            .triangles()
            .iter()
            .filter(|tri| tri.is_camera_occluder())
            .collect();

        assert_eq!(occluders.len(), 2);
        for tri in occluders {
            assert!(tri.vertices().iter().all(|p| p.z == 1.0));
        }
    }

    #[test]
    fn test_single_light_fixture() {
        let scene = SceneGeometry::cornell_box().unwrap();
        let lights: Vec<_> = scene.lights().collect();

        assert_eq!(lights.len(), 2);
        for light in lights {
            assert_eq!(light.emission(), Some(LIGHT_EMISSION));
            // Faces down into the room
            assert!((light.normal() - Vec3::NEG_Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_room_normals_face_interior() {
        let scene = SceneGeometry::cornell_box().unwrap();
        let interior = v(0.0, 1.0, 0.0);

        // Front wall, floor, back, right, left, ceiling and light
        for tri in &scene.triangles()[..14] {
            assert!(
                tri.normal().dot(interior - tri.centroid()) > 0.0,
                "normal {} of triangle at {} faces away from the room",
                tri.normal(),
                tri.centroid()
            );
        }
    }

    #[test]
    fn test_inward_wound_block_triangles() {
        let scene = SceneGeometry::cornell_box().unwrap();
        let tris = scene.triangles();

        let mut inward = Vec::new();
        for block in [14..26, 26..38] {
            let corners: Vec<Vec3> = tris[block.clone()].iter().flat_map(|t| t.vertices()).collect();
            let center = corners.iter().sum::<Vec3>() / corners.len() as f32;

            for i in block {
                if tris[i].normal().dot(tris[i].centroid() - center) < 0.0 {
                    inward.push(i);
                }
            }
        }

        assert_eq!(inward, vec![16, 24, 27, 36]);
    }
}
