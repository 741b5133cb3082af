//! Asset file access: model import and image decoding
//!
//! These are the only places that read model and texture files. GPU upload
//! happens later in [`gfx::resources`](crate::gfx::resources) and
//! [`gfx::scene`](crate::gfx::scene).

pub mod image_data;
pub mod importer;

pub use image_data::ImageData;
pub use importer::{import_obj, model_file_path, ImportedModel, RawMaterial, RawMesh};
