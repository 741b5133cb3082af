//! Models: meshes plus the materials they are drawn with

use std::{fmt, path::Path};

use cgmath::{Point3, Vector3};

use crate::{
    assets::{import_obj, model_file_path, ImportedModel, RawMaterial, RawMesh},
    diagnostics::Diagnostics,
    error::AssetError,
    gfx::{
        geometry::PrimitiveShape,
        resources::{material::Material, texture::TextureCache},
        shader::{GpuDevice, ShaderProgram},
    },
};

use super::{
    mesh::{calculate_smooth_normals, Mesh},
    vertex::VertexAttributes,
};

/// Axis-aligned extent of a model's geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    /// Box around a flat list of xyz positions; `None` when there are none
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut points = positions
            .chunks_exact(3)
            .map(|p| Point3::new(p[0], p[1], p[2]));
        let first = points.next()?;
        Some(points.fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |bounds, p| bounds.including(p),
        ))
    }

    fn including(self, p: Point3<f32>) -> Self {
        BoundingBox {
            min: Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            max: Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        }
    }

    pub fn union(self, other: BoundingBox) -> Self {
        self.including(other.min).including(other.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f32> {
        self.min + self.size() * 0.5
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min ({:.3}, {:.3}, {:.3}) max ({:.3}, {:.3}, {:.3})",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

/// A loaded model.
///
/// Every mesh stores the index of the material it is drawn with; that index is
/// always valid for `materials`. Immutable once built.
pub struct Model<D: GpuDevice> {
    name: String,
    meshes: Vec<(Mesh<D>, usize)>,
    materials: Vec<Material<D>>,
    bounding_box: Option<BoundingBox>,
}

impl<D: GpuDevice> Model<D> {
    /// Loads `<models_dir>/<name>/<name>.obj` and its materials
    pub fn load(
        device: &mut D,
        models_dir: &Path,
        name: &str,
        textures: &mut TextureCache<D>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, AssetError> {
        let path = model_file_path(models_dir, name);
        if !path.is_file() {
            return Err(AssetError::ModelNotFound {
                name: name.to_string(),
                path,
            });
        }

        log::info!("Loading model '{}' from {:?}", name, path);
        let imported = import_obj(&path)?;
        let asset_dir = models_dir.join(name);
        Ok(Self::from_imported(
            device,
            name,
            imported,
            &asset_dir,
            textures,
            diagnostics,
        ))
    }

    /// Uploads imported records; textures resolve relative to `asset_dir`
    pub fn from_imported(
        device: &mut D,
        name: &str,
        imported: ImportedModel,
        asset_dir: &Path,
        textures: &mut TextureCache<D>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut materials: Vec<Material<D>> = imported
            .materials
            .iter()
            .map(|raw| {
                let texture = match &raw.diffuse_texture {
                    Some(file) => textures.get_or_load(device, &asset_dir.join(file), diagnostics),
                    None => textures.default_texture(device),
                };
                Material::new(
                    raw.name.clone(),
                    texture,
                    Vector3::from(raw.diffuse_color),
                    raw.shininess,
                )
            })
            .collect();

        let mut fallback_material = None;
        let mut meshes = Vec::with_capacity(imported.meshes.len());
        let mut bounding_box: Option<BoundingBox> = None;

        for raw in &imported.meshes {
            if raw.vertex_count() == 0 || raw.indices.is_empty() {
                log::debug!("Skipping empty mesh '{}' in model '{}'", raw.name, name);
                continue;
            }

            let material_index = match raw.material_index {
                Some(i) if i < materials.len() => i,
                _ => *fallback_material.get_or_insert_with(|| {
                    let default = RawMaterial::default();
                    materials.push(Material::new(
                        default.name,
                        textures.default_texture(device),
                        Vector3::from(default.diffuse_color),
                        default.shininess,
                    ));
                    materials.len() - 1
                }),
            };

            let vertices = interleave(raw);
            meshes.push((
                Mesh::new(device, &vertices, &raw.indices, VertexAttributes::FULL),
                material_index,
            ));

            if let Some(mesh_box) = BoundingBox::from_positions(&raw.positions) {
                bounding_box = Some(match bounding_box {
                    Some(b) => b.union(mesh_box),
                    None => mesh_box,
                });
            }
        }

        log::debug!(
            "Model '{}': {} meshes, {} materials",
            name,
            meshes.len(),
            materials.len()
        );

        Self {
            name: name.to_string(),
            meshes,
            materials,
            bounding_box,
        }
    }

    /// Builds a single-mesh model for a built-in shape with the default texture
    pub fn from_primitive(
        device: &mut D,
        name: &str,
        shape: PrimitiveShape,
        textures: &mut TextureCache<D>,
    ) -> Self {
        let geometry = shape.generate();
        let positions: Vec<f32> = geometry.vertices.iter().flatten().copied().collect();
        let mesh = Mesh::new(
            device,
            &geometry.to_interleaved(),
            &geometry.indices,
            VertexAttributes::FULL,
        );
        let material = Material::new(
            "primitive",
            textures.default_texture(device),
            Vector3::new(1.0, 1.0, 1.0),
            RawMaterial::default().shininess,
        );

        Self {
            name: name.to_string(),
            meshes: vec![(mesh, 0)],
            materials: vec![material],
            bounding_box: BoundingBox::from_positions(&positions),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn meshes(&self) -> impl Iterator<Item = (&Mesh<D>, &Material<D>)> {
        self.meshes
            .iter()
            .filter_map(|(mesh, i)| self.materials.get(*i).map(|m| (mesh, m)))
    }

    pub fn materials(&self) -> &[Material<D>] {
        &self.materials
    }

    /// `None` for a model without any geometry
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }
}

impl<D: ShaderProgram> Model<D> {
    /// Draws every mesh in stored order with its material activated
    pub fn render(&self, program: &mut D) {
        for (mesh, material) in self.meshes() {
            material.activate(program);
            mesh.render(program);
        }
    }
}

/// Interleaves a raw mesh into the full layout, filling in missing attributes
fn interleave(raw: &RawMesh) -> Vec<f32> {
    let vertex_count = raw.vertex_count();
    let computed;
    let normals = match &raw.normals {
        Some(normals) => normals,
        None => {
            computed = calculate_smooth_normals(&raw.positions, &raw.indices);
            &computed
        }
    };

    let mut out = Vec::with_capacity(vertex_count * VertexAttributes::FULL.size_per_vertex());
    for i in 0..vertex_count {
        out.extend_from_slice(&raw.positions[i * 3..i * 3 + 3]);
        match &raw.uvs {
            Some(uvs) => out.extend_from_slice(&uvs[i * 2..i * 2 + 2]),
            None => out.extend_from_slice(&[0.0, 0.0]),
        }
        out.extend_from_slice(&normals[i * 3..i * 3 + 3]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostics::DiagnosticKind,
        gfx::{
            backend::{Command, RecordingBackend},
            shader::Uniform,
        },
        test_support::{AssetDir, BROKEN_OBJ, TRIANGLE_OBJ, UNTEXTURED_MTL},
    };
    use approx::assert_abs_diff_eq;

    fn raw_triangle(material_index: Option<usize>) -> RawMesh {
        RawMesh {
            name: "tri".to_string(),
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0],
            uvs: None,
            normals: None,
            indices: vec![0, 1, 2],
            material_index,
        }
    }

    #[test]
    fn test_load_textured_model() {
        let dir = AssetDir::new("model_load");
        dir.write_triangle_model("tri", true);

        let mut backend = RecordingBackend::new();
        let mut textures = TextureCache::new(dir.path().join("default.png"));
        let mut diagnostics = Diagnostics::new();
        let model = Model::load(
            &mut backend,
            &dir.models_dir(),
            "tri",
            &mut textures,
            &mut diagnostics,
        )
        .unwrap();

        assert_eq!(model.name(), "tri");
        assert_eq!(model.mesh_count(), 1);
        assert_eq!(model.materials().len(), 1);
        assert!(!model.materials()[0].texture().is_default());
        assert!(diagnostics.is_empty());

        let bounds = model.bounding_box().unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, 0.0, -1.0));
        assert_eq!(bounds.max, Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_missing_texture_is_recoverable() {
        let dir = AssetDir::new("model_notex");
        dir.write_triangle_model("tri", false);

        let mut backend = RecordingBackend::new();
        let mut textures = TextureCache::new(dir.path().join("default.png"));
        let mut diagnostics = Diagnostics::new();
        let model = Model::load(
            &mut backend,
            &dir.models_dir(),
            "tri",
            &mut textures,
            &mut diagnostics,
        )
        .unwrap();

        assert!(model.materials()[0].texture().is_default());
        assert_eq!(diagnostics.count(DiagnosticKind::TextureFallback), 1);
    }

    #[test]
    fn test_material_without_texture_uses_default_silently() {
        let dir = AssetDir::new("model_untextured");
        dir.write("models/plain/plain.obj", TRIANGLE_OBJ);
        dir.write("models/plain/tri.mtl", UNTEXTURED_MTL);

        let mut backend = RecordingBackend::new();
        let mut textures = TextureCache::new(dir.path().join("default.png"));
        let mut diagnostics = Diagnostics::new();
        let model = Model::load(
            &mut backend,
            &dir.models_dir(),
            "plain",
            &mut textures,
            &mut diagnostics,
        )
        .unwrap();

        assert_eq!(model.materials().len(), 1);
        assert!(model.materials()[0].texture().is_default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unparsable_geometry_is_import_error() {
        let dir = AssetDir::new("model_broken");
        dir.write("models/broken/broken.obj", BROKEN_OBJ);

        let mut backend = RecordingBackend::new();
        let mut textures = TextureCache::new(dir.path().join("default.png"));
        let mut diagnostics = Diagnostics::new();
        let result = Model::load(
            &mut backend,
            &dir.models_dir(),
            "broken",
            &mut textures,
            &mut diagnostics,
        );

        assert!(matches!(result, Err(AssetError::Import { .. })));
        assert_eq!(backend.stats().meshes_uploaded, 0);
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let dir = AssetDir::new("model_missing");
        let mut backend = RecordingBackend::new();
        let mut textures = TextureCache::new(dir.path().join("default.png"));
        let mut diagnostics = Diagnostics::new();

        let result = Model::load(
            &mut backend,
            &dir.models_dir(),
            "ghost",
            &mut textures,
            &mut diagnostics,
        );
        assert!(matches!(result, Err(AssetError::ModelNotFound { .. })));
        assert_eq!(backend.stats().meshes_uploaded, 0);
    }

    #[test]
    fn test_invalid_material_index_gets_default_material() {
        let mut backend = RecordingBackend::new();
        let mut textures = TextureCache::new("missing/default.png");
        let mut diagnostics = Diagnostics::new();
        let imported = ImportedModel {
            meshes: vec![raw_triangle(Some(3)), raw_triangle(None)],
            materials: Vec::new(),
        };

        let model = Model::from_imported(
            &mut backend,
            "loose",
            imported,
            Path::new("."),
            &mut textures,
            &mut diagnostics,
        );

        // both meshes share the single appended default material
        assert_eq!(model.materials().len(), 1);
        assert_eq!(model.meshes().count(), 2);
    }

    #[test]
    fn test_computed_normals_and_zero_uvs() {
        let raw = raw_triangle(None);
        let vertices = interleave(&raw);
        assert_eq!(vertices.len(), 3 * 8);
        // uv defaults to (0, 0)
        assert_eq!(&vertices[3..5], &[0.0, 0.0]);
        // triangle in the xz plane wound towards +y
        assert_abs_diff_eq!(vertices[6], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_render_activates_material_before_draw() {
        let mut backend = RecordingBackend::new();
        let mut textures = TextureCache::new("missing/default.png");
        let model = Model::from_primitive(&mut backend, "primitive:cube", PrimitiveShape::Cube, &mut textures);

        model.render(&mut backend);
        let commands = backend.commands();
        assert!(matches!(commands[0], Command::BindTexture(_)));
        assert!(matches!(
            commands[1],
            Command::SetUniform(Uniform::MaterialShininess, _)
        ));
        assert!(matches!(
            commands[2],
            Command::SetUniform(Uniform::MaterialDiffuseColor, _)
        ));
        assert_eq!(
            commands[3],
            Command::Draw {
                mesh: 1,
                index_count: 36
            }
        );
    }

    #[test]
    fn test_bounding_box_union() {
        let a = BoundingBox::from_positions(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
        let b = BoundingBox::from_positions(&[-1.0, 0.5, 2.0]).unwrap();
        let u = a.union(b);
        assert_eq!(u.min, Point3::new(-1.0, 0.0, 0.0));
        assert_eq!(u.max, Point3::new(1.0, 1.0, 2.0));
        assert_eq!(u.center(), Point3::new(0.0, 0.5, 1.0));
        assert!(BoundingBox::from_positions(&[]).is_none());
    }
}
