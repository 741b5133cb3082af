use cgmath::{perspective, Deg, Matrix4};

use crate::config::EngineConfig;

/// Perspective projection with a fixed vertical field of view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y: Deg<f32>,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Projection {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            fov_y: Deg(config.fov_y_degrees),
            z_near: config.z_near,
            z_far: config.z_far,
        }
    }

    /// OpenGL-convention projection matrix (clip z in [-1, 1])
    pub fn matrix(&self, aspect_ratio: f32) -> Matrix4<f32> {
        perspective(self.fov_y, aspect_ratio, self.z_near, self.z_far)
    }
}
