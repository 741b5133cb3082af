//! # Scene Management Module
//!
//! Everything between a scene description on disk and the draw calls of a
//! frame.
//!
//! ## Key Components
//!
//! - [`Scene3D`] - owns the shading program, models, instances, camera and lights
//! - [`SceneLoader`] - builds a [`Scene3D`] from a JSON description
//! - [`ModelRepository`] - name-keyed arena of loaded [`Model`]s
//! - [`ModelInstance`] - placement of a shared model
//! - [`Mesh`] and [`VertexAttributes`] - GPU geometry and its layout
//!
//! ## Usage
//!
//! ```no_run
//! use scene3d::{config::EngineConfig, gfx::backend::RecordingBackend};
//! use scene3d::gfx::scene::{Scene, SceneLoader};
//! use scene3d::input::FrameEvents;
//!
//! let loader = SceneLoader::new(EngineConfig::default());
//! let mut scene = loader
//!     .load(RecordingBackend::new(), "example.json".as_ref())
//!     .unwrap();
//! scene.render(&FrameEvents::new());
//! ```

pub mod description;
pub mod instance;
pub mod loader;
pub mod mesh;
pub mod model;
pub mod repository;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use description::SceneDescription;
pub use instance::ModelInstance;
pub use loader::SceneLoader;
pub use mesh::Mesh;
pub use model::{BoundingBox, Model};
pub use repository::{ModelId, ModelRepository};
pub use scene::{Scene, Scene3D};
pub use vertex::{Vertex3D, VertexAttributes};
