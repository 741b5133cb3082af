use crate::{
    gfx::shader::{ShaderProgram, Uniform},
    input::FrameEvents,
};

use super::{
    light::{AmbientLight, DirectionalLight, Light, PointLight, SpotLight},
    MAX_POINT_LIGHTS,
};

/// All lights of a scene.
///
/// Point lights beyond the capacity are dropped when added; the manager never
/// uploads more than [`MAX_POINT_LIGHTS`] of them.
#[derive(Debug, Clone)]
pub struct LightManager {
    ambient: Option<AmbientLight>,
    directional: Option<DirectionalLight>,
    point_lights: Vec<PointLight>,
    spot: Option<SpotLight>,
    max_point_lights: usize,
}

impl Default for LightManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LightManager {
    pub fn new() -> Self {
        Self::with_point_light_capacity(MAX_POINT_LIGHTS)
    }

    /// Capacity is clamped to the shader array size
    pub fn with_point_light_capacity(max_point_lights: usize) -> Self {
        Self {
            ambient: None,
            directional: None,
            point_lights: Vec::new(),
            spot: None,
            max_point_lights: max_point_lights.min(MAX_POINT_LIGHTS),
        }
    }

    /// Registers a light. Returns `false` if a point light was dropped for
    /// lack of capacity; other kinds replace any previous light of their kind.
    pub fn add(&mut self, light: Light) -> bool {
        match light {
            Light::Ambient(l) => replace(&mut self.ambient, l, "ambient"),
            Light::Directional(l) => replace(&mut self.directional, l, "directional"),
            Light::Spot(l) => replace(&mut self.spot, l, "spot"),
            Light::Point(l) => {
                if self.point_lights.len() >= self.max_point_lights {
                    log::debug!(
                        "Dropping point light at {:?}: limit of {} reached",
                        l.position,
                        self.max_point_lights
                    );
                    return false;
                }
                self.point_lights.push(l);
            }
        }
        true
    }

    pub fn ambient(&self) -> Option<&AmbientLight> {
        self.ambient.as_ref()
    }

    pub fn directional(&self) -> Option<&DirectionalLight> {
        self.directional.as_ref()
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    /// Number of point lights uploaded each frame
    pub fn point_light_count(&self) -> usize {
        self.point_lights.len()
    }

    pub fn max_point_lights(&self) -> usize {
        self.max_point_lights
    }

    pub fn spot(&self) -> Option<&SpotLight> {
        self.spot.as_ref()
    }

    /// Advances runtime light state such as the spot light switch
    pub fn process_events(&mut self, events: &FrameEvents) {
        if let Some(spot) = &mut self.spot {
            spot.process_events(events);
        }
    }

    /// Uploads ambient, directional, the point array and the spot light, in
    /// that order. Missing lights upload as contributing nothing.
    pub fn talk_to_shader<P: ShaderProgram>(&self, program: &mut P) {
        self.ambient
            .unwrap_or(AmbientLight::UNLIT)
            .talk_to_shader(program);
        self.directional
            .unwrap_or(DirectionalLight::UNLIT)
            .talk_to_shader(program);

        let count = self.point_lights.len().min(self.max_point_lights);
        program.set_uniform(Uniform::PointLightCount, (count as i32).into());
        for (index, light) in self.point_lights.iter().take(count).enumerate() {
            light.talk_to_shader(program, index);
        }

        match &self.spot {
            Some(spot) => spot.talk_to_shader(program),
            None => program.set_uniform(Uniform::SpotIsOn, false.into()),
        }
    }
}

fn replace<T>(slot: &mut Option<T>, light: T, kind: &str) {
    if slot.replace(light).is_some() {
        log::warn!("Scene defines more than one {} light; keeping the last", kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        backend::{Command, RecordingBackend},
        lights::light::SPOT_TOGGLE_KEY,
        shader::UniformValue,
    };
    use cgmath::{Deg, Vector3};

    fn point(x: f32) -> Light {
        Light::Point(PointLight {
            color: Vector3::new(1.0, 1.0, 1.0),
            position: Vector3::new(x, 1.0, 0.0),
            attenuation: Vector3::new(0.0, 0.0, 1.0),
            intensity: 1.0,
        })
    }

    fn spot() -> Light {
        Light::Spot(SpotLight::new(
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.0, 0.1, 1.0),
            2.0,
            Deg(12.5),
            0.1,
            true,
        ))
    }

    #[test]
    fn test_point_lights_are_capped() {
        let mut lights = LightManager::new();
        let accepted = (0..8).filter(|i| lights.add(point(*i as f32))).count();

        assert_eq!(accepted, MAX_POINT_LIGHTS);
        assert_eq!(lights.point_light_count(), MAX_POINT_LIGHTS);

        let mut backend = RecordingBackend::new();
        lights.talk_to_shader(&mut backend);
        assert_eq!(
            backend.last_uniform(Uniform::PointLightCount),
            Some(UniformValue::Int(MAX_POINT_LIGHTS as i32))
        );
        assert_eq!(backend.last_uniform(Uniform::PointPosition(5)), None);
    }

    #[test]
    fn test_configured_capacity_is_clamped() {
        let lights = LightManager::with_point_light_capacity(64);
        assert_eq!(lights.max_point_lights(), MAX_POINT_LIGHTS);

        let mut lights = LightManager::with_point_light_capacity(2);
        assert!(lights.add(point(0.0)));
        assert!(lights.add(point(1.0)));
        assert!(!lights.add(point(2.0)));
    }

    #[test]
    fn test_no_point_lights_uploads_zero_count() {
        let mut backend = RecordingBackend::new();
        LightManager::new().talk_to_shader(&mut backend);
        assert_eq!(
            backend.last_uniform(Uniform::PointLightCount),
            Some(UniformValue::Int(0))
        );
        assert_eq!(
            backend.last_uniform(Uniform::AmbientIntensity),
            Some(UniformValue::Float(0.0))
        );
        assert_eq!(
            backend.last_uniform(Uniform::SpotIsOn),
            Some(UniformValue::Bool(false))
        );
    }

    #[test]
    fn test_upload_order() {
        let mut lights = LightManager::new();
        lights.add(spot());
        lights.add(point(0.0));
        lights.add(Light::Ambient(AmbientLight {
            color: Vector3::new(1.0, 1.0, 1.0),
            intensity: 0.2,
        }));

        let mut backend = RecordingBackend::new();
        lights.talk_to_shader(&mut backend);
        let order: Vec<Uniform> = backend
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::SetUniform(u, _) => Some(*u),
                _ => None,
            })
            .collect();

        assert_eq!(order[0], Uniform::AmbientColor);
        assert_eq!(order[2], Uniform::DirectionalColor);
        assert_eq!(order[5], Uniform::PointLightCount);
        assert_eq!(order[6], Uniform::PointColor(0));
        assert_eq!(order[10], Uniform::SpotColor);
        assert_eq!(order.last(), Some(&Uniform::SpotIsOn));
    }

    #[test]
    fn test_spot_toggle_debounced_across_frames() {
        let mut lights = LightManager::new();
        lights.add(spot());
        let mut events = FrameEvents::new();
        events.set_key_state(SPOT_TOGGLE_KEY, true);

        for _ in 0..10 {
            lights.process_events(&events);
        }
        assert_eq!(lights.spot().map(|s| s.is_on()), Some(false));
    }
}
