//! Scene geometry.
//!
//! A `SceneGeometry` is built once, validated, and then only ever read.
//! Render workers share it behind an `Arc` without any synchronization.

use cornell_math::{Color, Vec3};

use crate::description::{SceneDescription, TriangleDescription};
use crate::error::{SceneError, SceneResult};
use crate::triangle::Triangle;

/// An immutable, ordered triangle list plus the background color.
#[derive(Clone, Debug)]
pub struct SceneGeometry {
    triangles: Vec<Triangle>,
    background: Color,
}

impl SceneGeometry {
    /// Start building a scene.
    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    /// Build and validate a scene from its plain-data description.
    pub fn from_description(description: SceneDescription) -> SceneResult<Self> {
        SceneBuilder {
            background: Color::from_array(description.background),
            triangles: description.triangles,
        }
        .build()
    }

    /// Convert back into plain data.
    pub fn to_description(&self) -> SceneDescription {
        let triangles = self
            .triangles
            .iter()
            .map(|tri| {
                let [v1, v2, v3] = tri.vertices();
                let desc = TriangleDescription::new(v1, v2, v3, tri.albedo())
                    .with_camera_occluder(tri.is_camera_occluder());
                match tri.emission() {
                    Some(emission) => desc.with_emission(emission),
                    None => desc,
                }
            })
            .collect();

        SceneDescription {
            background: self.background.to_array(),
            triangles,
        }
    }

    /// All triangles in insertion order.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Radiance for rays that leave the scene.
    #[inline]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Always false for a built scene; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterate over the emissive triangles.
    pub fn lights(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter().filter(|tri| tri.is_emissive())
    }

    /// Total surface area of the emissive triangles.
    pub fn light_area(&self) -> f32 {
        self.lights().map(Triangle::area).sum()
    }

    /// Radiant flux leaving the lights per channel: pi times radiance times
    /// area, summed over every emissive triangle.
    pub fn light_power(&self) -> Color {
        self.lights()
            .map(|tri| tri.emitted() * (std::f32::consts::PI * tri.area()))
            .sum()
    }

    /// Component-wise min and max over every vertex.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.triangles
            .iter()
            .flat_map(|tri| tri.vertices())
            .fold((Vec3::INFINITY, Vec3::NEG_INFINITY), |(min, max), v| {
                (min.min(v), max.max(v))
            })
    }
}

/// Accumulates triangle descriptions and validates them on `build`.
#[derive(Clone, Debug, Default)]
pub struct SceneBuilder {
    background: Color,
    triangles: Vec<TriangleDescription>,
}

impl SceneBuilder {
    /// Set the background color (defaults to black).
    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Add a plain diffuse triangle.
    pub fn triangle(self, v1: Vec3, v2: Vec3, v3: Vec3, albedo: Color) -> Self {
        self.push(TriangleDescription::new(v1, v2, v3, albedo))
    }

    /// Add an emissive triangle.
    pub fn light(self, v1: Vec3, v2: Vec3, v3: Vec3, albedo: Color, emission: Color) -> Self {
        self.push(TriangleDescription::new(v1, v2, v3, albedo).with_emission(emission))
    }

    /// Add a diffuse triangle that primary camera rays pass through.
    pub fn occluder(self, v1: Vec3, v2: Vec3, v3: Vec3, albedo: Color) -> Self {
        self.push(TriangleDescription::new(v1, v2, v3, albedo).with_camera_occluder(true))
    }

    /// Add an arbitrary description.
    pub fn push(mut self, triangle: TriangleDescription) -> Self {
        self.triangles.push(triangle);
        self
    }

    /// Validate every triangle and freeze the scene.
    pub fn build(self) -> SceneResult<SceneGeometry> {
        if self.triangles.is_empty() {
            return Err(SceneError::Empty);
        }
        if !self.background.is_finite() || self.background.min_element() < 0.0 {
            return Err(SceneError::InvalidBackground);
        }

        let triangles = self
            .triangles
            .into_iter()
            .enumerate()
            .map(|(index, desc)| build_triangle(index, desc))
            .collect::<SceneResult<Vec<_>>>()?;

        let scene = SceneGeometry {
            triangles,
            background: self.background,
        };

        let (min, max) = scene.bounds();
        log::info!(
            "Built scene: {} triangles ({} emissive), bounds {} .. {}",
            scene.len(),
            scene.lights().count(),
            min,
            max
        );
        log::info!(
            "Light area {:.4}, power {}",
            scene.light_area(),
            scene.light_power()
        );

        Ok(scene)
    }
}

fn build_triangle(index: usize, desc: TriangleDescription) -> SceneResult<Triangle> {
    let [v1, v2, v3] = desc.vertices.map(Vec3::from_array);
    if !(v1.is_finite() && v2.is_finite() && v3.is_finite()) {
        return Err(SceneError::NonFinite(index));
    }

    let albedo = Color::from_array(desc.albedo);
    if !albedo.is_finite() || albedo.min_element() < 0.0 {
        return Err(SceneError::InvalidAlbedo {
            index,
            r: albedo.x,
            g: albedo.y,
            b: albedo.z,
        });
    }
    if albedo.max_element() > 1.0 {
        log::warn!(
            "Triangle {} has albedo {} above 1; paths through it only end at the depth limit",
            index,
            albedo
        );
    }

    let mut triangle = Triangle::new(v1, v2, v3, albedo)
        .map_err(|source| SceneError::DegenerateTriangle { index, source })?
        .with_camera_occluder(desc.camera_occluder);

    if let Some(emission) = desc.emission.map(Color::from_array) {
        if !emission.is_finite() || emission.min_element() < 0.0 {
            return Err(SceneError::InvalidEmission(index));
        }
        triangle = triangle.with_emission(emission);
    }

    Ok(triangle)
}
