//! Error types for scene and asset loading
//!
//! Two levels of failure are kept apart at the type level:
//!
//! - [`SceneError`] is fatal to the whole scene. The loader returns it and no
//!   scene is produced.
//! - [`AssetError`] is fatal to a single model or texture only. The loader
//!   turns it into a [`Diagnostic`](crate::diagnostics::Diagnostic) and keeps going.

use std::path::PathBuf;

use thiserror::Error;

/// Failure that prevents a scene from being built at all
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene description {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene description {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported scene type '{0}' (only \"3D\" is supported)")]
    UnsupportedSceneType(String),

    #[error("scene description is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("scene description field '{field}' is malformed: {source}")]
    MalformedField {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load engine configuration {path}: {message}")]
    Config { path: PathBuf, message: String },
}

/// Failure that drops one asset but leaves the rest of the scene intact
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("model '{name}' not found at {path}")]
    ModelNotFound { name: String, path: PathBuf },

    #[error("failed to import model file {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to load texture {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unknown primitive '{0}'")]
    UnknownPrimitive(String),

    #[error("model '{0}' already failed to load earlier")]
    PreviouslyFailed(String),
}

/// Failure to bring up the wgpu renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}
