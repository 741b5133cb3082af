use cgmath::{Deg, InnerSpace, Vector3};
use winit::keyboard::KeyCode;

use crate::{
    gfx::shader::{ShaderProgram, Uniform},
    input::{FrameEvents, StickyButton},
};

/// Key toggling the spot light
pub const SPOT_TOGGLE_KEY: KeyCode = KeyCode::KeyL;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vector3<f32>,
    pub intensity: f32,
}

impl AmbientLight {
    /// Contributes nothing; uploaded when a scene has no ambient light
    pub const UNLIT: AmbientLight = AmbientLight {
        color: Vector3 { x: 0.0, y: 0.0, z: 0.0 },
        intensity: 0.0,
    };

    pub fn talk_to_shader<P: ShaderProgram>(&self, program: &mut P) {
        program.set_uniform(Uniform::AmbientColor, self.color.into());
        program.set_uniform(Uniform::AmbientIntensity, self.intensity.into());
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Vector3<f32>,
    /// Direction the light travels in, world space
    pub direction: Vector3<f32>,
    pub intensity: f32,
}

impl DirectionalLight {
    pub const UNLIT: DirectionalLight = DirectionalLight {
        color: Vector3 { x: 0.0, y: 0.0, z: 0.0 },
        direction: Vector3 { x: 0.0, y: -1.0, z: 0.0 },
        intensity: 0.0,
    };

    /// Normalises `direction`; `None` if it has no length
    pub fn new(color: Vector3<f32>, direction: Vector3<f32>, intensity: f32) -> Option<Self> {
        let length = direction.magnitude();
        if !length.is_normal() {
            return None;
        }
        Some(Self {
            color,
            direction: direction / length,
            intensity,
        })
    }

    pub fn talk_to_shader<P: ShaderProgram>(&self, program: &mut P) {
        program.set_uniform(Uniform::DirectionalColor, self.color.into());
        program.set_uniform(Uniform::DirectionalDirection, self.direction.into());
        program.set_uniform(Uniform::DirectionalIntensity, self.intensity.into());
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Vector3<f32>,
    pub position: Vector3<f32>,
    /// Quadratic, linear and constant falloff coefficients
    pub attenuation: Vector3<f32>,
    pub intensity: f32,
}

impl PointLight {
    /// Uploads into slot `index` of the point light array
    pub fn talk_to_shader<P: ShaderProgram>(&self, program: &mut P, index: usize) {
        program.set_uniform(Uniform::PointColor(index), self.color.into());
        program.set_uniform(Uniform::PointPosition(index), self.position.into());
        program.set_uniform(Uniform::PointAttenuation(index), self.attenuation.into());
        program.set_uniform(Uniform::PointIntensity(index), self.intensity.into());
    }
}

/// Flashlight attached to the camera, switched with [`SPOT_TOGGLE_KEY`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub color: Vector3<f32>,
    pub attenuation: Vector3<f32>,
    pub intensity: f32,
    half_angle_cos: f32,
    /// Offset of the light below the eye along the camera's up vector
    pub vertical_offset: f32,
    toggle: StickyButton,
}

impl SpotLight {
    pub fn new(
        color: Vector3<f32>,
        attenuation: Vector3<f32>,
        intensity: f32,
        half_angle: Deg<f32>,
        vertical_offset: f32,
        is_on: bool,
    ) -> Self {
        Self {
            color,
            attenuation,
            intensity,
            half_angle_cos: cgmath::Angle::cos(half_angle),
            vertical_offset,
            toggle: StickyButton::new(is_on),
        }
    }

    pub fn half_angle_cos(&self) -> f32 {
        self.half_angle_cos
    }

    pub fn is_on(&self) -> bool {
        self.toggle.is_on()
    }

    pub fn process_events(&mut self, events: &FrameEvents) {
        self.toggle.update(events.key_state(SPOT_TOGGLE_KEY));
    }

    pub fn talk_to_shader<P: ShaderProgram>(&self, program: &mut P) {
        program.set_uniform(Uniform::SpotColor, self.color.into());
        program.set_uniform(Uniform::SpotAttenuation, self.attenuation.into());
        program.set_uniform(Uniform::SpotIntensity, self.intensity.into());
        program.set_uniform(Uniform::SpotHalfAngleCos, self.half_angle_cos.into());
        program.set_uniform(Uniform::SpotVerticalOffset, self.vertical_offset.into());
        program.set_uniform(Uniform::SpotIsOn, self.is_on().into());
    }
}

/// Any light a scene can hold
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient(AmbientLight),
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl Light {
    pub fn kind(&self) -> &'static str {
        match self {
            Light::Ambient(_) => "ambient",
            Light::Directional(_) => "directional",
            Light::Point(_) => "point",
            Light::Spot(_) => "spot",
        }
    }
}
