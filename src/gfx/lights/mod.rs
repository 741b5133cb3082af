//! # Lighting
//!
//! Light kinds are a closed set ([`Light`]); the [`LightManager`] aggregates
//! at most one ambient, one directional and one spot light plus a bounded list
//! of point lights, and uploads them to the shader as a unit.

pub mod light;
pub mod manager;

pub use light::{AmbientLight, DirectionalLight, Light, PointLight, SpotLight, SPOT_TOGGLE_KEY};
pub use manager::LightManager;

/// Capacity of the point light array in the shader
pub const MAX_POINT_LIGHTS: usize = 5;
