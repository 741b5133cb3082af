//! # Vertex Data Structures
//!
//! Vertex layouts used for mesh uploads. Interleaved `f32` vertex data is
//! described by a [`VertexAttributes`] bit-set; all offsets and the stride are
//! derived from which attributes are present, always in the order
//! position, uv, normal.

use bitflags::bitflags;

bitflags! {
    /// Attributes present in an interleaved vertex
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VertexAttributes: u8 {
        /// 3 floats
        const POSITION = 0b001;
        /// 2 floats
        const UV = 0b010;
        /// 3 floats
        const NORMAL = 0b100;
    }
}

impl VertexAttributes {
    /// Position + uv + normal, the layout models and primitives are built with
    pub const FULL: VertexAttributes = VertexAttributes::all();

    /// Number of floats per vertex
    pub fn size_per_vertex(&self) -> usize {
        let mut size = 0;
        if self.contains(Self::POSITION) {
            size += 3;
        }
        if self.contains(Self::UV) {
            size += 2;
        }
        if self.contains(Self::NORMAL) {
            size += 3;
        }
        size
    }

    /// Stride in bytes
    pub fn stride(&self) -> usize {
        self.size_per_vertex() * std::mem::size_of::<f32>()
    }

    pub fn position_offset(&self) -> usize {
        0
    }

    pub fn uv_offset(&self) -> usize {
        if self.contains(Self::POSITION) {
            3
        } else {
            0
        }
    }

    pub fn normal_offset(&self) -> usize {
        let mut offset = self.uv_offset();
        if self.contains(Self::UV) {
            offset += 2;
        }
        offset
    }

    /// Re-interleaves `vertices` into the full layout.
    ///
    /// Missing uv coordinates become (0, 0) and missing normals become zero.
    pub fn expand_to_full(&self, vertices: &[f32]) -> Vec<f32> {
        let size = self.size_per_vertex();
        if *self == Self::FULL || size == 0 {
            return vertices.to_vec();
        }

        let full = Self::FULL.size_per_vertex();
        let vertex_count = vertices.len() / size;
        let mut out = vec![0.0; vertex_count * full];

        for (src, dst) in vertices.chunks_exact(size).zip(out.chunks_exact_mut(full)) {
            if self.contains(Self::POSITION) {
                dst[0..3].copy_from_slice(&src[0..3]);
            }
            if self.contains(Self::UV) {
                let o = self.uv_offset();
                dst[3..5].copy_from_slice(&src[o..o + 2]);
            }
            if self.contains(Self::NORMAL) {
                let o = self.normal_offset();
                dst[5..8].copy_from_slice(&src[o..o + 3]);
            }
        }

        out
    }
}

/// A fully populated vertex as seen by the GPU pipeline.
///
/// # Memory Layout
///
/// `#[repr(C)]` keeps the field order identical to
/// [`VertexAttributes::FULL`] interleaving, so an expanded `f32` slice can be
/// cast straight into a vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// Texture coordinates [u, v]
    pub uv: [f32; 2],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
}

impl Vertex3D {
    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x3) at shader location 0
    /// - Attribute 1: UV (Float32x2) at shader location 1
    /// - Attribute 2: Normal (Float32x3) at shader location 2
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
