//! Material definitions
//!
//! A material is one surface appearance of a model: a diffuse texture plus the
//! scalar/colour parameters the Phong shader reads from its `material` slots.

use std::rc::Rc;

use cgmath::Vector3;

use crate::gfx::shader::{GpuDevice, ShaderProgram, Uniform};

use super::texture::Texture;

/// Surface appearance used by one or more meshes of a model
pub struct Material<D: GpuDevice> {
    pub name: String,
    texture: Rc<Texture<D>>,
    /// Multiplies the texture colour; nominally in [0, 1] but not clamped
    pub diffuse_color: Vector3<f32>,
    /// Specular exponent
    pub shininess: f32,
}

impl<D: GpuDevice> Material<D> {
    pub fn new(
        name: impl Into<String>,
        texture: Rc<Texture<D>>,
        diffuse_color: Vector3<f32>,
        shininess: f32,
    ) -> Self {
        Self {
            name: name.into(),
            texture,
            diffuse_color,
            shininess,
        }
    }

    pub fn texture(&self) -> &Texture<D> {
        &self.texture
    }
}

impl<D: ShaderProgram> Material<D> {
    /// Binds the texture and uploads the material slots
    pub fn activate(&self, program: &mut D) {
        self.texture.bind(program);
        program.set_uniform(Uniform::MaterialShininess, self.shininess.into());
        program.set_uniform(Uniform::MaterialDiffuseColor, self.diffuse_color.into());
    }
}
