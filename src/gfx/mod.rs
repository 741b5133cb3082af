//! # Graphics Module
//!
//! Everything between a parsed scene description and pixels on screen.
//!
//! - **Shader seam** ([`shader`]) - the [`GpuDevice`](shader::GpuDevice) and
//!   [`ShaderProgram`](shader::ShaderProgram) traits every backend implements
//! - **Backends** ([`backend`], [`rendering`]) - a headless recorder and the wgpu renderer
//! - **Camera** ([`camera`]) - first-person fly camera and perspective projection
//! - **Lights** ([`lights`]) - ambient, directional, point and spot lights
//! - **Resources** ([`resources`]) - textures, materials and uniform blocks
//! - **Scene** ([`scene`]) - meshes, models, instances and the scene loader
//! - **Geometry** ([`geometry`]) - procedurally generated primitive shapes

pub mod backend;
pub mod camera;
pub mod geometry;
pub mod lights;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod shader;

pub use rendering::render_engine::RenderEngine;
