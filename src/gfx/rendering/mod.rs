// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The wgpu implementation of the shading program contract.

pub mod pipeline;
pub mod render_engine;

// Re-export main types
pub use pipeline::PipelineConfig;
pub use render_engine::{GpuMesh, GpuTexture, RenderEngine};
