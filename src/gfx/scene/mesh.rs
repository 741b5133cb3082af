use crate::gfx::shader::{GpuDevice, ShaderProgram};

use super::vertex::VertexAttributes;

/// One piece of geometry resident on the GPU.
///
/// Immutable after construction. The device handle owns the vertex and index
/// buffers and frees them when the mesh is dropped.
pub struct Mesh<D: GpuDevice> {
    buffers: D::Mesh,
    attributes: VertexAttributes,
    vertex_count: u32,
    index_count: u32,
}

impl<D: GpuDevice> Mesh<D> {
    /// Uploads interleaved vertices and triangle indices
    pub fn new(
        device: &mut D,
        vertices: &[f32],
        indices: &[u32],
        attributes: VertexAttributes,
    ) -> Self {
        let size = attributes.size_per_vertex().max(1);
        let buffers = device.upload_mesh(vertices, indices, attributes);

        Self {
            buffers,
            attributes,
            vertex_count: (vertices.len() / size) as u32,
            index_count: indices.len() as u32,
        }
    }

    pub fn attributes(&self) -> VertexAttributes {
        self.attributes
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn buffers(&self) -> &D::Mesh {
        &self.buffers
    }
}

impl<D: ShaderProgram> Mesh<D> {
    pub fn render(&self, program: &mut D) {
        program.draw(&self.buffers, self.index_count);
    }
}

/// Computes smooth per-vertex normals.
///
/// Every triangle contributes its normalised face normal to its three
/// vertices; the sums are normalised at the end. `positions` holds 3 floats
/// per vertex; the result has the same length.
pub fn calculate_smooth_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut normals = vec![0.0f32; vertex_count * 3];

    for triangle in indices.chunks_exact(3) {
        let i0 = triangle[0] as usize;
        let i1 = triangle[1] as usize;
        let i2 = triangle[2] as usize;
        if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
            continue;
        }

        let v0 = [positions[i0 * 3], positions[i0 * 3 + 1], positions[i0 * 3 + 2]];
        let v1 = [positions[i1 * 3], positions[i1 * 3 + 1], positions[i1 * 3 + 2]];
        let v2 = [positions[i2 * 3], positions[i2 * 3 + 1], positions[i2 * 3 + 2]];

        let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

        let mut face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];
        let length = (face_normal[0].powi(2) + face_normal[1].powi(2) + face_normal[2].powi(2))
            .sqrt();
        // degenerate triangle
        if length <= f32::EPSILON {
            continue;
        }
        for c in face_normal.iter_mut() {
            *c /= length;
        }

        for &vertex_idx in &[i0, i1, i2] {
            normals[vertex_idx * 3] += face_normal[0];
            normals[vertex_idx * 3 + 1] += face_normal[1];
            normals[vertex_idx * 3 + 2] += face_normal[2];
        }
    }

    for normal in normals.chunks_exact_mut(3) {
        let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
        if length > 0.0 {
            normal[0] /= length;
            normal[1] /= length;
            normal[2] /= length;
        }
    }

    normals
}
