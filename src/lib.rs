//! Declarative 3D scene renderer
//!
//! Scenes are described in JSON: which models to load, where to place
//! instances of them, a camera and a set of lights. The loader turns such a
//! description into a [`Scene3D`](gfx::scene::Scene3D) that renders itself once
//! per frame through any [`ShaderProgram`](gfx::shader::ShaderProgram).

pub mod app;
pub mod assets;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gfx;
pub mod input;
pub mod wgpu_utils;

#[cfg(test)]
mod test_support;

pub use app::SceneViewer;
pub use config::EngineConfig;
