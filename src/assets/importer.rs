//! Model file import
//!
//! Wraps `tobj` and flattens its output into plain vertex/index/material
//! records. Nothing here touches the GPU.

use std::path::{Path, PathBuf};

use crate::error::AssetError;

/// One sub-mesh as read from the model file
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    pub name: String,
    /// 3 floats per vertex
    pub positions: Vec<f32>,
    /// 2 floats per vertex, v flipped so that row 0 of the image is v = 0
    pub uvs: Option<Vec<f32>>,
    /// 3 floats per vertex
    pub normals: Option<Vec<f32>>,
    pub indices: Vec<u32>,
    pub material_index: Option<usize>,
}

impl RawMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// One material as read from the material library
#[derive(Debug, Clone, PartialEq)]
pub struct RawMaterial {
    pub name: String,
    pub diffuse_color: [f32; 3],
    pub shininess: f32,
    /// Texture file name relative to the model directory
    pub diffuse_texture: Option<String>,
}

impl Default for RawMaterial {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            diffuse_color: [0.8, 0.8, 0.8],
            shininess: 32.0,
            diffuse_texture: None,
        }
    }
}

/// Everything imported from one model file
#[derive(Debug, Clone, Default)]
pub struct ImportedModel {
    pub meshes: Vec<RawMesh>,
    pub materials: Vec<RawMaterial>,
}

/// Path of the geometry file for a model: `<models_dir>/<name>/<name>.obj`
pub fn model_file_path(models_dir: &Path, name: &str) -> PathBuf {
    models_dir.join(name).join(format!("{}.obj", name))
}

/// Imports an OBJ file together with its MTL library.
///
/// Fails only when the OBJ file itself is missing or unparsable. A missing or
/// broken material library leaves the material list empty.
pub fn import_obj(path: &Path) -> Result<ImportedModel, AssetError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Import {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("No usable material library for {:?}: {}", path, e);
        Vec::new()
    });

    let meshes = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            let vertex_count = mesh.positions.len() / 3;

            let uvs = (mesh.texcoords.len() == vertex_count * 2 && vertex_count > 0).then(|| {
                mesh.texcoords
                    .chunks_exact(2)
                    .flat_map(|uv| [uv[0], 1.0 - uv[1]])
                    .collect()
            });
            let normals = (mesh.normals.len() == mesh.positions.len() && vertex_count > 0)
                .then_some(mesh.normals);

            RawMesh {
                name: model.name,
                positions: mesh.positions,
                uvs,
                normals,
                indices: mesh.indices,
                material_index: mesh.material_id,
            }
        })
        .collect();

    let materials = materials
        .into_iter()
        .map(|mtl| RawMaterial {
            name: mtl.name,
            diffuse_color: mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]),
            shininess: mtl.shininess.unwrap_or(32.0),
            diffuse_texture: mtl.diffuse_texture.filter(|t| !t.trim().is_empty()),
        })
        .collect();

    Ok(ImportedModel { meshes, materials })
}
