use cgmath::Vector3;

use crate::{
    diagnostics::Diagnostics,
    gfx::{
        camera::{Camera, Projection},
        lights::LightManager,
        shader::{ShaderProgram, Uniform},
    },
    input::FrameEvents,
};

use super::{instance::ModelInstance, repository::ModelRepository};

/// Anything the application can render once per frame
pub trait Scene {
    fn render(&mut self, events: &FrameEvents);
}

/// A loaded 3D scene and the program it renders through.
///
/// Fields drop in declaration order: instances go before the models they
/// refer to, and GPU resources go before the program that created them.
pub struct Scene3D<D: ShaderProgram> {
    instances: Vec<ModelInstance>,
    models: ModelRepository<D>,
    camera: Camera,
    lights: LightManager,
    background_color: Vector3<f32>,
    projection: Projection,
    diagnostics: Diagnostics,
    program: D,
}

impl<D: ShaderProgram> Scene3D<D> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        program: D,
        models: ModelRepository<D>,
        instances: Vec<ModelInstance>,
        camera: Camera,
        lights: LightManager,
        background_color: Vector3<f32>,
        projection: Projection,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            instances,
            models,
            camera,
            lights,
            background_color,
            projection,
            diagnostics,
            program,
        }
    }

    pub fn program(&self) -> &D {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut D {
        &mut self.program
    }

    pub fn models(&self) -> &ModelRepository<D> {
        &self.models
    }

    /// Instances in draw order
    pub fn instances(&self) -> &[ModelInstance] {
        &self.instances
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &LightManager {
        &self.lights
    }

    pub fn background_color(&self) -> Vector3<f32> {
        self.background_color
    }

    /// Recoverable problems met while loading
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

impl<D: ShaderProgram> Scene for Scene3D<D> {
    fn render(&mut self, events: &FrameEvents) {
        let program = &mut self.program;
        program.activate();
        program.clear(self.background_color);
        program.set_uniform(
            Uniform::Projection,
            self.projection.matrix(events.aspect_ratio()).into(),
        );

        self.camera.process_events(events);
        self.lights.process_events(events);

        program.set_uniform(Uniform::View, self.camera.view_matrix().into());
        program.set_uniform(Uniform::CameraPosition, self.camera.position().into());
        self.lights.talk_to_shader(program);

        for instance in &self.instances {
            instance.render(&self.models, program);
        }

        program.deactivate();
    }
}
