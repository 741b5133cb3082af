//! Engine configuration
//!
//! Paths to asset roots plus the fixed projection parameters. Values come from
//! an optional JSON file; every missing key falls back to its default.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{error::SceneError, gfx::lights::MAX_POINT_LIGHTS};

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV_VAR: &str = "SCENE3D_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root directory holding one sub-directory per model
    pub models_dir: PathBuf,
    /// Directory scene descriptions are resolved against
    pub scenes_dir: PathBuf,
    /// Texture used whenever a material texture cannot be resolved
    pub default_texture: PathBuf,
    /// Vertical field of view of the perspective projection
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Point lights beyond this count are dropped
    pub max_point_lights: usize,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("assets/models"),
            scenes_dir: PathBuf::from("assets/scenes"),
            default_texture: PathBuf::from("assets/textures/default.png"),
            fov_y_degrees: 45.0,
            z_near: 0.1,
            z_far: 100.0,
            max_point_lights: MAX_POINT_LIGHTS,
            window_width: 1200,
            window_height: 800,
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SceneError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| SceneError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(config.validated())
    }

    /// Loads the file named by `SCENE3D_CONFIG`, or returns the defaults
    pub fn from_env_or_default() -> Result<Self, SceneError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::info!("Loading engine configuration from {:?}", path);
                Self::load(PathBuf::from(path))
            }
            None => Ok(Self::default()),
        }
    }

    /// Clamps values the renderer cannot honour
    pub fn validated(mut self) -> Self {
        if self.max_point_lights > MAX_POINT_LIGHTS {
            log::warn!(
                "max_point_lights {} exceeds shader capacity, clamping to {}",
                self.max_point_lights,
                MAX_POINT_LIGHTS
            );
            self.max_point_lights = MAX_POINT_LIGHTS;
        }
        if self.z_near <= 0.0 || self.z_far <= self.z_near {
            log::warn!(
                "invalid clip planes near={} far={}, using defaults",
                self.z_near,
                self.z_far
            );
            let defaults = Self::default();
            self.z_near = defaults.z_near;
            self.z_far = defaults.z_far;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "models_dir": "custom/models", "fov_y_degrees": 60.0 }"#)
                .unwrap();
        assert_eq!(config.models_dir, PathBuf::from("custom/models"));
        assert_eq!(config.fov_y_degrees, 60.0);
        assert_eq!(config.max_point_lights, MAX_POINT_LIGHTS);
        assert_eq!(config.z_far, 100.0);
    }

    #[test]
    fn test_validated_clamps_point_lights() {
        let config = EngineConfig {
            max_point_lights: 12,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.max_point_lights, MAX_POINT_LIGHTS);
    }

    #[test]
    fn test_validated_fixes_clip_planes() {
        let config = EngineConfig {
            z_near: 10.0,
            z_far: 1.0,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.z_near, 0.1);
        assert_eq!(config.z_far, 100.0);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let result = EngineConfig::load("does/not/exist.json");
        assert!(matches!(result, Err(SceneError::Config { .. })));
    }
}
