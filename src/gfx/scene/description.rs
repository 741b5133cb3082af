//! Typed form of a scene description document
//!
//! The top-level document is checked field by field so a missing or malformed
//! required field names itself in the error. Individual instance and light
//! entries are decoded one at a time: a broken entry is kept as an `Err` and
//! skipped by the loader instead of failing the whole scene.

use std::path::Path;

use cgmath::{Deg, Vector3};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    error::SceneError,
    gfx::lights::{AmbientLight, DirectionalLight, Light, PointLight, SpotLight},
};

/// The only supported value of `sceneType`
pub const SCENE_TYPE_3D: &str = "3D";

/// An entry decoded on its own
pub type Entry<T> = Result<T, serde_json::Error>;

fn one() -> f32 {
    1.0
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstanceDescription {
    pub model: String,
    pub origin: [f32; 3],
    #[serde(default = "one")]
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CameraDescription {
    #[serde(default)]
    pub origin: [f32; 3],
    /// Degrees
    #[serde(default)]
    pub pitch: f32,
    /// Degrees
    #[serde(default)]
    pub yaw: f32,
    #[serde(default = "one")]
    pub move_speed: f32,
    #[serde(default = "one")]
    pub rotation_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LightDescription {
    Ambient {
        color: [f32; 3],
        #[serde(default = "one")]
        intensity: f32,
    },
    Directional {
        color: [f32; 3],
        direction: [f32; 3],
        #[serde(default = "one")]
        intensity: f32,
    },
    Point {
        color: [f32; 3],
        position: [f32; 3],
        attenuation: [f32; 3],
        #[serde(default = "one")]
        intensity: f32,
    },
    #[serde(rename_all = "camelCase")]
    Spot {
        color: [f32; 3],
        attenuation: [f32; 3],
        #[serde(default = "one")]
        intensity: f32,
        /// Degrees
        half_angle: f32,
        #[serde(default)]
        vertical_offset: f32,
        #[serde(default = "enabled")]
        is_on: bool,
    },
}

/// A light entry that parsed but cannot be used
#[derive(Debug, Error, PartialEq)]
pub enum InvalidLight {
    #[error("directional light direction {0:?} has zero length")]
    ZeroDirection([f32; 3]),
}

impl TryFrom<LightDescription> for Light {
    type Error = InvalidLight;

    fn try_from(description: LightDescription) -> Result<Self, InvalidLight> {
        let light = match description {
            LightDescription::Ambient { color, intensity } => Light::Ambient(AmbientLight {
                color: color.into(),
                intensity,
            }),
            LightDescription::Directional {
                color,
                direction,
                intensity,
            } => Light::Directional(
                DirectionalLight::new(color.into(), direction.into(), intensity)
                    .ok_or(InvalidLight::ZeroDirection(direction))?,
            ),
            LightDescription::Point {
                color,
                position,
                attenuation,
                intensity,
            } => Light::Point(PointLight {
                color: color.into(),
                position: position.into(),
                attenuation: attenuation.into(),
                intensity,
            }),
            LightDescription::Spot {
                color,
                attenuation,
                intensity,
                half_angle,
                vertical_offset,
                is_on,
            } => Light::Spot(SpotLight::new(
                color.into(),
                attenuation.into(),
                intensity,
                Deg(half_angle),
                vertical_offset,
                is_on,
            )),
        };
        Ok(light)
    }
}

/// A parsed `"3D"` scene description
#[derive(Debug)]
pub struct SceneDescription {
    /// Model names to load, duplicates removed, first occurrence kept
    pub models: Vec<String>,
    pub instances: Vec<Entry<InstanceDescription>>,
    pub camera: CameraDescription,
    pub lights: Vec<Entry<LightDescription>>,
    pub background_color: Vector3<f32>,
}

impl SceneDescription {
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value = serde_json::from_str(&content).map_err(|source| SceneError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(&document)
    }

    pub fn from_value(document: &Value) -> Result<Self, SceneError> {
        let fields = document.as_object().ok_or(SceneError::MissingField("sceneType"))?;

        let scene_type: String = typed(required(fields, "sceneType")?, "sceneType")?;
        if scene_type != SCENE_TYPE_3D {
            return Err(SceneError::UnsupportedSceneType(scene_type));
        }

        let mut models: Vec<String> = Vec::new();
        for name in typed::<Vec<String>>(required(fields, "models")?, "models")? {
            if !models.contains(&name) {
                models.push(name);
            }
        }

        let instances = typed::<Vec<Value>>(required(fields, "instances")?, "instances")?
            .iter()
            .map(InstanceDescription::deserialize)
            .collect();
        let camera = typed(required(fields, "camera")?, "camera")?;
        let lights = typed::<Vec<Value>>(required(fields, "lights")?, "lights")?
            .iter()
            .map(LightDescription::deserialize)
            .collect();
        let background: [f32; 3] = typed(required(fields, "backgroundColor")?, "backgroundColor")?;

        Ok(Self {
            models,
            instances,
            camera,
            lights,
            background_color: background.into(),
        })
    }
}

fn required<'a>(fields: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, SceneError> {
    fields.get(field).ok_or(SceneError::MissingField(field))
}

fn typed<T: DeserializeOwned>(value: &Value, field: &'static str) -> Result<T, SceneError> {
    T::deserialize(value).map_err(|source| SceneError::MalformedField { field, source })
}
