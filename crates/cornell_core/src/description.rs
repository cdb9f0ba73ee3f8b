//! Serializable scene descriptions.
//!
//! A description is the plain-data form of a [`SceneGeometry`](crate::SceneGeometry):
//! arrays instead of vectors, no derived fields. It is what the JSON scene
//! files deserialize into and what the scene builder accumulates before
//! validation.

use std::path::Path;

use cornell_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::SceneResult;

/// One triangle of a scene description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangleDescription {
    /// Vertex positions in winding order
    pub vertices: [[f32; 3]; 3],

    /// Diffuse reflectance (RGB, 0-1 by convention)
    pub albedo: [f32; 3],

    /// Emitted radiance; absent for non-lights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emission: Option<[f32; 3]>,

    /// Hidden from primary camera rays
    #[serde(default)]
    pub camera_occluder: bool,
}

impl TriangleDescription {
    /// Create a plain diffuse triangle description.
    pub fn new(v1: Vec3, v2: Vec3, v3: Vec3, albedo: Color) -> Self {
        Self {
            vertices: [v1.to_array(), v2.to_array(), v3.to_array()],
            albedo: albedo.to_array(),
            emission: None,
            camera_occluder: false,
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = Some(emission.to_array());
        self
    }

    pub fn with_camera_occluder(mut self, camera_occluder: bool) -> Self {
        self.camera_occluder = camera_occluder;
        self
    }
}

/// A complete enclosure: background plus an ordered triangle list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Radiance returned by rays that escape the scene
    #[serde(default)]
    pub background: [f32; 3],

    pub triangles: Vec<TriangleDescription>,
}

impl SceneDescription {
    /// Parse a description from a JSON string.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON description file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
