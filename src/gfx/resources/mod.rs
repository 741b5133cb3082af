//! GPU resource management
//!
//! Textures and the materials that reference them, plus the uniform layouts
//! the wgpu backend packs them into.

pub mod frame_uniforms;
pub mod material;
pub mod texture;
pub mod texture_resource;

// Re-export main types
pub use material::Material;
pub use texture::{Texture, TextureCache, TextureSource};
pub use texture_resource::{DepthTarget, TextureResource};
