//! Placements of shared models

use cgmath::{Matrix4, Vector3};

use crate::gfx::shader::{ShaderProgram, Uniform};

use super::repository::{ModelId, ModelRepository};

/// One model placed in the world.
///
/// Holds only the id of its model; the repository that minted the id owns the
/// geometry and must outlive the instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInstance {
    model: ModelId,
    transform: Matrix4<f32>,
}

impl ModelInstance {
    /// `transform = translate(origin) * scale(scale)`
    pub fn new(model: ModelId, origin: Vector3<f32>, scale: f32) -> Self {
        Self {
            model,
            transform: Matrix4::from_translation(origin) * Matrix4::from_scale(scale),
        }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn transform(&self) -> Matrix4<f32> {
        self.transform
    }

    /// Uploads the model matrix and draws the referenced model
    pub fn render<D: ShaderProgram>(&self, models: &ModelRepository<D>, program: &mut D) {
        let Some(model) = models.get(self.model) else {
            log::debug!("Instance refers to unknown model {:?}", self.model);
            return;
        };
        program.set_uniform(Uniform::Model, self.transform.into());
        model.render(program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostics::Diagnostics,
        gfx::{
            backend::{Command, RecordingBackend},
            shader::UniformValue,
        },
    };
    use cgmath::{Point3, Transform};

    #[test]
    fn test_translation_applies_after_scale() {
        let mut backend = RecordingBackend::new();
        let mut repo = ModelRepository::new("missing", "missing/default.png");
        let id = repo
            .load(&mut backend, "primitive:cube", &mut Diagnostics::new())
            .unwrap();

        let instance = ModelInstance::new(id, Vector3::new(10.0, 0.0, -2.0), 2.0);
        let p = instance.transform().transform_point(Point3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Point3::new(12.0, 2.0, 0.0));
    }

    #[test]
    fn test_instances_draw_the_same_mesh() {
        let mut backend = RecordingBackend::new();
        let mut repo = ModelRepository::new("missing", "missing/default.png");
        let id = repo
            .load(&mut backend, "primitive:plane", &mut Diagnostics::new())
            .unwrap();

        let a = ModelInstance::new(id, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let b = ModelInstance::new(id, Vector3::new(5.0, 0.0, 0.0), 3.0);
        a.render(&repo, &mut backend);
        b.render(&repo, &mut backend);

        let draws: Vec<_> = backend
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. }))
            .collect();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0], draws[1]);
        assert_eq!(backend.stats().meshes_uploaded, 1);
        assert_eq!(
            backend.commands()[0],
            Command::SetUniform(Uniform::Model, UniformValue::Mat4(a.transform()))
        );
    }
}
