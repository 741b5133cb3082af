//! # Procedural Geometry Generation
//!
//! Built-in shapes that need no model file. Scene descriptions refer to them
//! with a `primitive:` prefix, e.g. `primitive:cube`.
//!
//! ## Supported Primitives
//!
//! - **Plane**: unit plane in the xz plane, uv tiled 10 times
//! - **Cube**: unit cube sharing its 8 corners, so normals are smoothed
//! - **Pyramid**: square base with apex at y = 0.5

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::mesh::calculate_smooth_normals;

/// Generated geometry ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Fills `normals` with smooth per-vertex normals
    pub fn compute_normals(&mut self) {
        let flat: Vec<f32> = self.vertices.iter().flatten().copied().collect();
        self.normals = calculate_smooth_normals(&flat, &self.indices)
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect();
    }

    /// Interleaves position, uv and normal into the full vertex layout
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertices.len() * 8);
        for (i, position) in self.vertices.iter().enumerate() {
            out.extend_from_slice(position);
            out.extend_from_slice(&self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]));
            out.extend_from_slice(&self.normals.get(i).copied().unwrap_or([0.0, 0.0, 0.0]));
        }
        out
    }
}
