//! Shading program backends that do not need a GPU

pub mod recording;

pub use recording::{Command, RecordedMesh, RecordedTexture, RecordingBackend, ResourceStats};
