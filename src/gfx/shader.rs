//! Shading program contract
//!
//! The scene never talks to the graphics API directly. It uploads values into
//! well-known uniform slots, binds textures and issues draws through the
//! [`ShaderProgram`] trait, and creates geometry and images through
//! [`GpuDevice`]. The wgpu [`RenderEngine`](crate::gfx::rendering::RenderEngine)
//! and the headless [`RecordingBackend`](crate::gfx::backend::RecordingBackend)
//! both implement it.

use std::{borrow::Cow, fmt};

use cgmath::{Matrix4, Vector3};

use crate::{assets::ImageData, gfx::scene::vertex::VertexAttributes};

/// Creates accelerator-side resources.
///
/// The handle types own their GPU memory and release it when dropped; they are
/// not `Clone`, so ownership of a buffer or image moves exactly once.
pub trait GpuDevice {
    type Mesh;
    type Texture;

    /// Uploads interleaved vertex data laid out according to `attributes`
    fn upload_mesh(
        &mut self,
        vertices: &[f32],
        indices: &[u32],
        attributes: VertexAttributes,
    ) -> Self::Mesh;

    /// Uploads an RGBA8 image
    fn upload_texture(&mut self, image: &ImageData) -> Self::Texture;
}

/// The shading program a scene renders through
pub trait ShaderProgram: GpuDevice {
    /// Makes the program current; starts a frame
    fn activate(&mut self);

    /// Clears colour and depth buffers
    fn clear(&mut self, color: Vector3<f32>);

    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue);

    /// Binds a texture for the following draws
    fn bind_texture(&mut self, texture: &Self::Texture);

    /// Draws `index_count` indices of a mesh with the current uniforms
    fn draw(&mut self, mesh: &Self::Mesh, index_count: u32);

    /// Releases the program; ends a frame
    fn deactivate(&mut self);
}

/// Well-known uniform slots of the scene shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    Model,
    View,
    Projection,
    CameraPosition,

    AmbientColor,
    AmbientIntensity,

    DirectionalColor,
    DirectionalDirection,
    DirectionalIntensity,

    PointLightCount,
    PointColor(usize),
    PointPosition(usize),
    PointAttenuation(usize),
    PointIntensity(usize),

    SpotColor,
    SpotAttenuation,
    SpotIntensity,
    SpotHalfAngleCos,
    SpotVerticalOffset,
    SpotIsOn,

    MaterialShininess,
    MaterialDiffuseColor,
}

impl Uniform {
    /// Slot name as declared in the shader interface
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Uniform::Model => "model".into(),
            Uniform::View => "view".into(),
            Uniform::Projection => "projection".into(),
            Uniform::CameraPosition => "cameraPosition".into(),
            Uniform::AmbientColor => "ambientLight.color".into(),
            Uniform::AmbientIntensity => "ambientLight.intensity".into(),
            Uniform::DirectionalColor => "directionalLight.color".into(),
            Uniform::DirectionalDirection => "directionalLight.direction".into(),
            Uniform::DirectionalIntensity => "directionalLight.intensity".into(),
            Uniform::PointLightCount => "pointLightCount".into(),
            Uniform::PointColor(i) => format!("pointLights[{}].color", i).into(),
            Uniform::PointPosition(i) => format!("pointLights[{}].position", i).into(),
            Uniform::PointAttenuation(i) => format!("pointLights[{}].attenuation", i).into(),
            Uniform::PointIntensity(i) => format!("pointLights[{}].intensity", i).into(),
            Uniform::SpotColor => "spotLight.color".into(),
            Uniform::SpotAttenuation => "spotLight.attenuation".into(),
            Uniform::SpotIntensity => "spotLight.intensity".into(),
            Uniform::SpotHalfAngleCos => "spotLight.halfAngleCos".into(),
            Uniform::SpotVerticalOffset => "spotLight.verticalOffset".into(),
            Uniform::SpotIsOn => "spotLight.isOn".into(),
            Uniform::MaterialShininess => "material.shininess".into(),
            Uniform::MaterialDiffuseColor => "material.diffuseColor".into(),
        }
    }
}

impl fmt::Display for Uniform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Value uploaded into a uniform slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Mat4(Matrix4<f32>),
    Vec3(Vector3<f32>),
    Float(f32),
    Int(i32),
    Bool(bool),
}

impl From<Matrix4<f32>> for UniformValue {
    fn from(value: Matrix4<f32>) -> Self {
        UniformValue::Mat4(value)
    }
}

impl From<Vector3<f32>> for UniformValue {
    fn from(value: Vector3<f32>) -> Self {
        UniformValue::Vec3(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_names() {
        assert_eq!(Uniform::Model.name(), "model");
        assert_eq!(Uniform::CameraPosition.name(), "cameraPosition");
        assert_eq!(Uniform::PointPosition(3).name(), "pointLights[3].position");
        assert_eq!(Uniform::SpotHalfAngleCos.name(), "spotLight.halfAngleCos");
        assert_eq!(Uniform::MaterialDiffuseColor.to_string(), "material.diffuseColor");
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(UniformValue::from(2.0f32), UniformValue::Float(2.0));
        assert_eq!(UniformValue::from(true), UniformValue::Bool(true));
        assert_eq!(
            UniformValue::from(Vector3::new(1.0f32, 2.0, 3.0)),
            UniformValue::Vec3(Vector3::new(1.0, 2.0, 3.0))
        );
    }
}
