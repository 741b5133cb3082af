pub mod fly_camera;
pub mod projection;

// Re-export main types
pub use fly_camera::Camera;
pub use projection::Projection;
