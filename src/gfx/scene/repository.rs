//! Name-keyed store of loaded models
//!
//! The repository is the arena that owns every [`Model`] of a scene. Instances
//! refer to models through a [`ModelId`], so a model is uploaded once however
//! often it is placed.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use crate::{
    config::EngineConfig,
    diagnostics::Diagnostics,
    error::AssetError,
    gfx::{
        geometry::PrimitiveShape,
        resources::texture::TextureCache,
        shader::GpuDevice,
    },
};

use super::model::Model;

/// Index of a model inside its repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(usize);

pub struct ModelRepository<D: GpuDevice> {
    models_dir: PathBuf,
    models: Vec<Model<D>>,
    by_name: HashMap<String, ModelId>,
    failed: HashSet<String>,
    textures: TextureCache<D>,
}

impl<D: GpuDevice> ModelRepository<D> {
    pub fn new(models_dir: impl Into<PathBuf>, default_texture: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            models: Vec::new(),
            by_name: HashMap::new(),
            failed: HashSet::new(),
            textures: TextureCache::new(default_texture),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.models_dir, &config.default_texture)
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Returns the id of `name`, loading it on first request.
    ///
    /// Each name is attempted once: a name that failed before keeps failing
    /// with [`AssetError::PreviouslyFailed`].
    pub fn load(
        &mut self,
        device: &mut D,
        name: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<ModelId, AssetError> {
        if let Some(id) = self.by_name.get(name) {
            return Ok(*id);
        }
        if self.failed.contains(name) {
            return Err(AssetError::PreviouslyFailed(name.to_string()));
        }

        let result = match PrimitiveShape::from_model_name(name) {
            Some(Ok(shape)) => Ok(Model::from_primitive(
                device,
                name,
                shape,
                &mut self.textures,
            )),
            Some(Err(unknown)) => Err(AssetError::UnknownPrimitive(unknown)),
            None => Model::load(
                device,
                &self.models_dir,
                name,
                &mut self.textures,
                diagnostics,
            ),
        };

        match result {
            Ok(model) => {
                let id = ModelId(self.models.len());
                self.models.push(model);
                self.by_name.insert(name.to_string(), id);
                Ok(id)
            }
            Err(e) => {
                self.failed.insert(name.to_string());
                Err(e)
            }
        }
    }

    pub fn id(&self, name: &str) -> Option<ModelId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: ModelId) -> Option<&Model<D>> {
        self.models.get(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<&Model<D>> {
        self.id(name).and_then(|id| self.get(id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Models in load order
    pub fn iter(&self) -> impl Iterator<Item = &Model<D>> {
        self.models.iter()
    }

    pub fn textures(&self) -> &TextureCache<D> {
        &self.textures
    }
}
