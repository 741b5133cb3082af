//! Uniform block layouts of the Phong shader
//!
//! The scene uploads values slot by slot through
//! [`ShaderProgram::set_uniform`](crate::gfx::shader::ShaderProgram::set_uniform).
//! [`ShaderState`] collects them into the two blocks the WGSL program reads:
//! [`FrameUniforms`] (bound once per frame) and [`DrawUniforms`] (one copy per
//! draw call). MUST match the structs in `phong.wgsl` exactly.

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::gfx::{
    lights::MAX_POINT_LIGHTS,
    shader::{Uniform, UniformValue},
};

/// Converts OpenGL clip space (z in [-1, 1]) to wgpu clip space (z in [0, 1])
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AmbientBlock {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalBlock {
    pub color: [f32; 3],
    pub intensity: f32,
    pub direction: [f32; 3],
    _padding: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointBlock {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: [f32; 3],
    _padding1: f32,
    pub attenuation: [f32; 3],
    _padding2: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotBlock {
    pub color: [f32; 3],
    pub intensity: f32,
    pub attenuation: [f32; 3],
    pub half_angle_cos: f32,
    pub vertical_offset: f32,
    pub is_on: u32,
    _padding: [f32; 2],
}

/// Per-frame block, bind group 0
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    /// Already converted to wgpu clip space
    pub projection: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub point_light_count: u32,
    pub ambient: AmbientBlock,
    pub directional: DirectionalBlock,
    pub point_lights: [PointBlock; MAX_POINT_LIGHTS],
    pub spot: SpotBlock,
}
// Total: 64 + 64 + 16 + 16 + 32 + 5 * 48 + 48 = 480 bytes

impl Default for FrameUniforms {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            view: identity,
            projection: identity,
            camera_position: [0.0; 3],
            point_light_count: 0,
            ambient: AmbientBlock::default(),
            directional: DirectionalBlock::default(),
            point_lights: [PointBlock::default(); MAX_POINT_LIGHTS],
            spot: SpotBlock::default(),
        }
    }
}

/// Per-draw block, bind group 1 with a dynamic offset
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`
    pub normal_matrix: [[f32; 4]; 4],
    pub diffuse_color: [f32; 3],
    pub shininess: f32,
}
// Total: 64 + 64 + 16 = 144 bytes

impl Default for DrawUniforms {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            model: identity,
            normal_matrix: identity,
            diffuse_color: [1.0; 3],
            shininess: 32.0,
        }
    }
}

/// CPU copy of everything uploaded so far
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ShaderState {
    pub frame: FrameUniforms,
    pub draw: DrawUniforms,
}

impl ShaderState {
    /// Stores `value` in the field behind `uniform`.
    ///
    /// Returns `false` when the value has the wrong type for the slot or the
    /// slot index is out of range; the state is left unchanged then.
    pub fn apply(&mut self, uniform: Uniform, value: UniformValue) -> bool {
        use UniformValue::*;

        let frame = &mut self.frame;
        let draw = &mut self.draw;
        match (uniform, value) {
            (Uniform::Model, Mat4(m)) => {
                draw.model = m.into();
                draw.normal_matrix = m.invert().map(|inv| inv.transpose()).unwrap_or(m).into();
            }
            (Uniform::View, Mat4(m)) => frame.view = m.into(),
            (Uniform::Projection, Mat4(m)) => frame.projection = (OPENGL_TO_WGPU_MATRIX * m).into(),
            (Uniform::CameraPosition, Vec3(v)) => frame.camera_position = v.into(),

            (Uniform::AmbientColor, Vec3(v)) => frame.ambient.color = v.into(),
            (Uniform::AmbientIntensity, Float(f)) => frame.ambient.intensity = f,

            (Uniform::DirectionalColor, Vec3(v)) => frame.directional.color = v.into(),
            (Uniform::DirectionalDirection, Vec3(v)) => frame.directional.direction = v.into(),
            (Uniform::DirectionalIntensity, Float(f)) => frame.directional.intensity = f,

            (Uniform::PointLightCount, Int(n)) => {
                frame.point_light_count = n.clamp(0, MAX_POINT_LIGHTS as i32) as u32
            }
            (Uniform::PointColor(i), Vec3(v)) if i < MAX_POINT_LIGHTS => {
                frame.point_lights[i].color = v.into()
            }
            (Uniform::PointPosition(i), Vec3(v)) if i < MAX_POINT_LIGHTS => {
                frame.point_lights[i].position = v.into()
            }
            (Uniform::PointAttenuation(i), Vec3(v)) if i < MAX_POINT_LIGHTS => {
                frame.point_lights[i].attenuation = v.into()
            }
            (Uniform::PointIntensity(i), Float(f)) if i < MAX_POINT_LIGHTS => {
                frame.point_lights[i].intensity = f
            }

            (Uniform::SpotColor, Vec3(v)) => frame.spot.color = v.into(),
            (Uniform::SpotAttenuation, Vec3(v)) => frame.spot.attenuation = v.into(),
            (Uniform::SpotIntensity, Float(f)) => frame.spot.intensity = f,
            (Uniform::SpotHalfAngleCos, Float(f)) => frame.spot.half_angle_cos = f,
            (Uniform::SpotVerticalOffset, Float(f)) => frame.spot.vertical_offset = f,
            (Uniform::SpotIsOn, Bool(b)) => frame.spot.is_on = u32::from(b),

            (Uniform::MaterialShininess, Float(f)) => draw.shininess = f,
            (Uniform::MaterialDiffuseColor, Vec3(v)) => draw.diffuse_color = v.into(),

            _ => return false,
        }
        true
    }
}
