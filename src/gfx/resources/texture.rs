//! Textures and the texture cache
//!
//! A [`Texture`] owns one uploaded image. Materials hold textures through `Rc`
//! so that one image file, and the shared default texture, is uploaded once
//! no matter how many materials refer to it.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    assets::ImageData,
    diagnostics::{DiagnosticKind, Diagnostics},
    error::AssetError,
    gfx::shader::{GpuDevice, ShaderProgram},
};

/// Where a texture's pixels came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    File(PathBuf),
    /// The designated default texture
    Default,
}

/// One image resident on the GPU
pub struct Texture<D: GpuDevice> {
    handle: D::Texture,
    source: TextureSource,
    width: u32,
    height: u32,
}

impl<D: GpuDevice> Texture<D> {
    pub fn from_image(device: &mut D, image: &ImageData, source: TextureSource) -> Self {
        Self {
            handle: device.upload_texture(image),
            source,
            width: image.width,
            height: image.height,
        }
    }

    /// Loads and uploads an image file
    pub fn load(device: &mut D, path: &Path) -> Result<Self, AssetError> {
        let image = ImageData::from_file(path)?;
        Ok(Self::from_image(
            device,
            &image,
            TextureSource::File(path.to_path_buf()),
        ))
    }

    /// Loads the default texture, synthesising plain white if its file is unreadable
    pub fn load_default(device: &mut D, path: &Path) -> Self {
        let image = ImageData::from_file(path).unwrap_or_else(|e| {
            log::warn!("Default texture unavailable ({}), using plain white", e);
            ImageData::white()
        });
        Self::from_image(device, &image, TextureSource::Default)
    }

    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    pub fn is_default(&self) -> bool {
        self.source == TextureSource::Default
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn handle(&self) -> &D::Texture {
        &self.handle
    }
}

impl<D: ShaderProgram> Texture<D> {
    /// Binds this texture for the following draw calls
    pub fn bind(&self, program: &mut D) {
        program.bind_texture(&self.handle);
    }
}

/// Deduplicates texture uploads by file path
pub struct TextureCache<D: GpuDevice> {
    default_path: PathBuf,
    default: Option<Rc<Texture<D>>>,
    textures: HashMap<PathBuf, Rc<Texture<D>>>,
}

impl<D: GpuDevice> TextureCache<D> {
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
            default: None,
            textures: HashMap::new(),
        }
    }

    /// The shared default texture, uploaded on first use
    pub fn default_texture(&mut self, device: &mut D) -> Rc<Texture<D>> {
        match &self.default {
            Some(texture) => Rc::clone(texture),
            None => {
                let texture = Rc::new(Texture::load_default(device, &self.default_path));
                self.default = Some(Rc::clone(&texture));
                texture
            }
        }
    }

    /// Returns the texture for `path`, uploading it on first request.
    ///
    /// An unreadable file yields the default texture and records a
    /// [`DiagnosticKind::TextureFallback`]. The file is not retried.
    pub fn get_or_load(
        &mut self,
        device: &mut D,
        path: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Rc<Texture<D>> {
        if let Some(texture) = self.textures.get(path) {
            return Rc::clone(texture);
        }

        let texture = match Texture::load(device, path) {
            Ok(texture) => Rc::new(texture),
            Err(e) => {
                diagnostics.record(
                    DiagnosticKind::TextureFallback,
                    format!("{}; using default texture", e),
                );
                self.default_texture(device)
            }
        };
        self.textures.insert(path.to_path_buf(), Rc::clone(&texture));
        texture
    }

    /// Number of distinct images uploaded through this cache
    pub fn uploaded_count(&self) -> usize {
        let files = self
            .textures
            .values()
            .filter(|t| !t.is_default())
            .count();
        files + usize::from(self.default.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gfx::backend::RecordingBackend, test_support::AssetDir};

    #[test]
    fn test_default_texture_falls_back_to_white() {
        let mut backend = RecordingBackend::new();
        let texture = Texture::load_default(&mut backend, Path::new("missing/default.png"));
        assert!(texture.is_default());
        assert_eq!(texture.size(), (1, 1));
    }

    #[test]
    fn test_cache_uploads_each_file_once() {
        let dir = AssetDir::new("texture_cache");
        let path = dir.write_png("wood.png", [120, 80, 40, 255]);

        let mut backend = RecordingBackend::new();
        let mut diagnostics = Diagnostics::new();
        let mut cache = TextureCache::new(dir.path().join("default.png"));

        let a = cache.get_or_load(&mut backend, &path, &mut diagnostics);
        let b = cache.get_or_load(&mut backend, &path, &mut diagnostics);

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(backend.stats().textures_uploaded, 1);
        assert_eq!(a.source(), &TextureSource::File(path));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_file_uses_shared_default() {
        let dir = AssetDir::new("texture_fallback");
        let mut backend = RecordingBackend::new();
        let mut diagnostics = Diagnostics::new();
        let mut cache = TextureCache::new(dir.path().join("default.png"));

        let a = cache.get_or_load(&mut backend, &dir.path().join("a.png"), &mut diagnostics);
        let b = cache.get_or_load(&mut backend, &dir.path().join("b.png"), &mut diagnostics);

        assert!(a.is_default());
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(backend.stats().textures_uploaded, 1);
        assert_eq!(diagnostics.count(DiagnosticKind::TextureFallback), 2);
        assert_eq!(cache.uploaded_count(), 1);
    }

    #[test]
    fn test_failed_file_is_not_retried() {
        let dir = AssetDir::new("texture_retry");
        let mut backend = RecordingBackend::new();
        let mut diagnostics = Diagnostics::new();
        let mut cache = TextureCache::new(dir.path().join("default.png"));
        let missing = dir.path().join("late.png");

        cache.get_or_load(&mut backend, &missing, &mut diagnostics);
        dir.write_png("late.png", [0, 0, 0, 255]);
        let again = cache.get_or_load(&mut backend, &missing, &mut diagnostics);

        assert!(again.is_default());
        assert_eq!(diagnostics.count(DiagnosticKind::TextureFallback), 1);
    }
}
