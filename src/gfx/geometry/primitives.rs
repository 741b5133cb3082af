//! # Primitive Shape Generation

use super::GeometryData;

/// Built-in shapes addressable from a scene description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveShape {
    Plane,
    Cube,
    Pyramid,
}

impl PrimitiveShape {
    /// Prefix marking a model name as a built-in shape
    pub const PREFIX: &'static str = "primitive:";

    /// Parses `primitive:<shape>`; plain model names return `None`
    pub fn from_model_name(name: &str) -> Option<Result<Self, String>> {
        let shape = name.strip_prefix(Self::PREFIX)?;
        Some(match shape {
            "plane" => Ok(PrimitiveShape::Plane),
            "cube" => Ok(PrimitiveShape::Cube),
            "pyramid" => Ok(PrimitiveShape::Pyramid),
            other => Err(other.to_string()),
        })
    }

    pub fn generate(&self) -> GeometryData {
        match self {
            PrimitiveShape::Plane => generate_plane(),
            PrimitiveShape::Cube => generate_cube(),
            PrimitiveShape::Pyramid => generate_pyramid(),
        }
    }
}

/// Unit plane in the xz plane facing +y, uv repeated 10 times
pub fn generate_plane() -> GeometryData {
    let mut data = GeometryData::new();
    data.vertices = vec![
        [-0.5, 0.0, -0.5],
        [0.5, 0.0, -0.5],
        [-0.5, 0.0, 0.5],
        [0.5, 0.0, 0.5],
    ];
    data.tex_coords = vec![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [10.0, 10.0]];
    data.indices = vec![0, 2, 1, 1, 2, 3];
    data.compute_normals();
    data
}

/// Unit cube centred at the origin built from its 8 corners
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();
    data.vertices = vec![
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [-0.5, 0.5, -0.5],
        [0.5, 0.5, -0.5],
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [-0.5, 0.5, 0.5],
        [0.5, 0.5, 0.5],
    ];
    data.tex_coords = vec![
        [0.0, 0.0],
        [1.0, 0.0],
        [0.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
        [0.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
    ];
    data.indices = vec![
        0, 2, 1, 1, 2, 3, // back
        1, 3, 7, 5, 1, 7, // right
        4, 5, 7, 4, 7, 6, // front
        0, 4, 2, 6, 2, 4, // left
        2, 6, 3, 3, 6, 7, // top
        0, 1, 4, 1, 5, 4, // bottom
    ];
    data.compute_normals();
    data
}

/// Square-based pyramid standing on the xz plane
pub fn generate_pyramid() -> GeometryData {
    let mut data = GeometryData::new();
    data.vertices = vec![
        [-0.5, 0.0, 0.5],
        [0.5, 0.0, 0.5],
        [-0.5, 0.0, -0.5],
        [0.5, 0.0, -0.5],
        [0.0, 0.5, 0.0],
    ];
    data.tex_coords = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [0.0, 0.0], [0.5, 1.0]];
    data.indices = vec![0, 1, 4, 1, 3, 4, 3, 2, 4, 2, 0, 4];
    data.compute_normals();
    data
}
