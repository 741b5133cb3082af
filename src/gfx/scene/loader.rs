//! Builds a [`Scene3D`] from a scene description
//!
//! Only an unreadable description, an unsupported scene type or a broken
//! required field fails the load. Everything below that level (a model that
//! cannot be imported, a malformed instance or light entry, surplus point
//! lights) is recorded in the scene's [`Diagnostics`] and skipped.

use std::path::{Path, PathBuf};

use cgmath::Vector3;

use crate::{
    config::EngineConfig,
    diagnostics::{DiagnosticKind, Diagnostics},
    error::SceneError,
    gfx::{
        camera::{Camera, Projection},
        lights::{Light, LightManager},
        shader::ShaderProgram,
    },
};

use super::{
    description::{CameraDescription, SceneDescription},
    instance::ModelInstance,
    repository::ModelRepository,
    scene::Scene3D,
};

pub struct SceneLoader {
    config: EngineConfig,
}

impl SceneLoader {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Relative paths that do not exist as given are looked up in the scenes directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() && !path.exists() {
            let candidate = self.config.scenes_dir.join(path);
            if candidate.exists() {
                return candidate;
            }
        }
        path.to_path_buf()
    }

    /// Reads, parses and builds the scene at `path`
    pub fn load<D: ShaderProgram>(&self, program: D, path: &Path) -> Result<Scene3D<D>, SceneError> {
        let path = self.resolve(path);
        log::info!("Loading scene {:?}", path);
        let description = SceneDescription::from_file(&path).inspect_err(|e| log::error!("{}", e))?;
        Ok(self.build(program, description))
    }

    /// Builds a scene from an already parsed description
    pub fn build<D: ShaderProgram>(&self, mut program: D, description: SceneDescription) -> Scene3D<D> {
        let mut diagnostics = Diagnostics::new();

        let mut models = ModelRepository::from_config(&self.config);
        for name in &description.models {
            if let Err(e) = models.load(&mut program, name, &mut diagnostics) {
                diagnostics.record(DiagnosticKind::ModelSkipped, format!("model '{}' skipped: {}", name, e));
            }
        }

        let mut instances = Vec::with_capacity(description.instances.len());
        for (index, entry) in description.instances.into_iter().enumerate() {
            let instance = match entry {
                Ok(instance) => instance,
                Err(e) => {
                    diagnostics.record(DiagnosticKind::InstanceSkipped, format!("instance #{}: {}", index, e));
                    continue;
                }
            };
            match models.id(&instance.model) {
                Some(id) => instances.push(ModelInstance::new(id, instance.origin.into(), instance.scale)),
                None => log::debug!(
                    "Dropping instance #{} of unavailable model '{}'",
                    index,
                    instance.model
                ),
            }
        }

        let camera = camera_from(&description.camera);

        let mut lights = LightManager::with_point_light_capacity(self.config.max_point_lights);
        for (index, entry) in description.lights.into_iter().enumerate() {
            let light = entry
                .map_err(|e| e.to_string())
                .and_then(|description| Light::try_from(description).map_err(|e| e.to_string()));
            let light = match light {
                Ok(light) => light,
                Err(e) => {
                    diagnostics.record(DiagnosticKind::LightSkipped, format!("light #{}: {}", index, e));
                    continue;
                }
            };
            if !lights.add(light) {
                diagnostics.record(
                    DiagnosticKind::PointLightCapExceeded,
                    format!(
                        "light #{} dropped: at most {} point lights are supported",
                        index,
                        lights.max_point_lights()
                    ),
                );
            }
        }

        log::info!(
            "Scene ready: {} models, {} instances, {} point lights, {} diagnostics",
            models.len(),
            instances.len(),
            lights.point_light_count(),
            diagnostics.len()
        );

        Scene3D::new(
            program,
            models,
            instances,
            camera,
            lights,
            description.background_color,
            Projection::from_config(&self.config),
            diagnostics,
        )
    }
}

fn camera_from(description: &CameraDescription) -> Camera {
    Camera::new(
        Vector3::from(description.origin),
        description.yaw,
        description.pitch,
        description.move_speed,
        description.rotation_speed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::{backend::RecordingBackend, lights::MAX_POINT_LIGHTS},
        test_support::{AssetDir, BROKEN_OBJ},
    };
    use approx::assert_abs_diff_eq;
    use cgmath::InnerSpace;

    fn loader_for(dir: &AssetDir) -> SceneLoader {
        SceneLoader::new(EngineConfig {
            models_dir: dir.models_dir(),
            scenes_dir: dir.path().join("scenes"),
            default_texture: dir.path().join("default.png"),
            ..EngineConfig::default()
        })
    }

    const PARTIAL_SCENE: &str = r#"{
        "sceneType": "3D",
        "models": ["tri", "ghost"],
        "instances": [
            { "model": "tri", "origin": [0, 0, 0] },
            { "model": "ghost", "origin": [1, 0, 0] },
            { "model": "tri", "origin": [2, 0, 0], "scale": 0.5 }
        ],
        "camera": { "origin": [0, 1, 5], "pitch": 0, "yaw": -90, "move_speed": 2, "rotation_speed": 0.1 },
        "lights": [ { "type": "directional", "color": [1, 1, 1], "direction": [0, -1, 0] } ],
        "backgroundColor": [0, 0, 0]
    }"#;

    #[test]
    fn test_partial_scene_loads_valid_models() {
        let dir = AssetDir::new("loader_partial");
        dir.write_triangle_model("tri", true);
        let path = dir.write("scenes/partial.json", PARTIAL_SCENE);

        let scene = loader_for(&dir)
            .load(RecordingBackend::new(), &path)
            .unwrap();

        assert_eq!(scene.models().len(), 1);
        assert!(scene.models().contains("tri"));
        assert_eq!(scene.instances().len(), 2);
        assert_eq!(scene.diagnostics().len(), 1);
        assert_eq!(scene.diagnostics().count(DiagnosticKind::ModelSkipped), 1);
        assert_eq!(scene.camera().yaw(), -90.0);
        assert_eq!(scene.camera().move_speed, 2.0);
        assert!(scene.lights().directional().is_some());
    }

    #[test]
    fn test_unparsable_model_is_skipped_with_its_instances() {
        let dir = AssetDir::new("loader_broken_model");
        dir.write_triangle_model("tri", true);
        dir.write("models/broken/broken.obj", BROKEN_OBJ);
        let path = dir.write(
            "scenes/broken.json",
            r#"{
                "sceneType": "3D",
                "models": ["broken", "tri"],
                "instances": [
                    { "model": "broken", "origin": [0, 0, 0] },
                    { "model": "tri", "origin": [1, 0, 0] },
                    { "model": "broken", "origin": [2, 0, 0] }
                ],
                "camera": {},
                "lights": [],
                "backgroundColor": [0, 0, 0]
            }"#,
        );

        let scene = loader_for(&dir)
            .load(RecordingBackend::new(), &path)
            .unwrap();

        assert!(!scene.models().contains("broken"));
        assert_eq!(scene.models().len(), 1);
        assert_eq!(scene.instances().len(), 1);
        assert_eq!(scene.diagnostics().len(), 1);
        assert_eq!(scene.diagnostics().count(DiagnosticKind::ModelSkipped), 1);
        assert!(scene.diagnostics().entries()[0].message.contains("broken"));
    }

    #[test]
    fn test_relative_path_resolves_in_scenes_dir() {
        let dir = AssetDir::new("loader_resolve");
        dir.write_triangle_model("tri", true);
        dir.write("scenes/partial.json", PARTIAL_SCENE);

        let scene = loader_for(&dir).load(RecordingBackend::new(), Path::new("partial.json"));
        assert!(scene.is_ok());
    }

    #[test]
    fn test_repeated_model_is_shared() {
        let dir = AssetDir::new("loader_share");
        dir.write_triangle_model("tri", true);
        let path = dir.write(
            "scenes/shared.json",
            r#"{
                "sceneType": "3D",
                "models": ["tri", "tri"],
                "instances": [
                    { "model": "tri", "origin": [0, 0, 0] },
                    { "model": "tri", "origin": [4, 0, 0], "scale": 2 }
                ],
                "camera": {},
                "lights": [],
                "backgroundColor": [0.5, 0.5, 0.5]
            }"#,
        );

        let scene = loader_for(&dir)
            .load(RecordingBackend::new(), &path)
            .unwrap();

        assert_eq!(scene.models().len(), 1);
        assert_eq!(scene.program().stats().meshes_uploaded, 1);
        assert_eq!(scene.program().stats().textures_uploaded, 1);
        let [a, b] = scene.instances() else {
            panic!("expected two instances");
        };
        assert_eq!(a.model(), b.model());
        assert!(scene.diagnostics().is_empty());
    }

    #[test]
    fn test_malformed_entries_and_surplus_lights() {
        let dir = AssetDir::new("loader_entries");
        let point = r#"{ "type": "point", "color": [1, 1, 1], "position": [0, 2, 0], "attenuation": [0.1, 0.1, 1] }"#;
        let lights: Vec<&str> = std::iter::repeat(point).take(MAX_POINT_LIGHTS + 2).collect();
        let document = format!(
            r#"{{
                "sceneType": "3D",
                "models": ["primitive:plane"],
                "instances": [ {{ "model": "primitive:plane" }}, {{ "model": "primitive:plane", "origin": [0, 0, 0] }} ],
                "camera": {{}},
                "lights": [ {{ "type": "ambient" }}, {} ],
                "backgroundColor": [0, 0, 0]
            }}"#,
            lights.join(", ")
        );
        let path = dir.write("scene.json", &document);

        let scene = loader_for(&dir)
            .load(RecordingBackend::new(), &path)
            .unwrap();

        assert_eq!(scene.instances().len(), 1);
        assert_eq!(scene.lights().point_light_count(), MAX_POINT_LIGHTS);
        assert!(scene.lights().ambient().is_none());
        let diagnostics = scene.diagnostics();
        assert_eq!(diagnostics.count(DiagnosticKind::InstanceSkipped), 1);
        assert_eq!(diagnostics.count(DiagnosticKind::LightSkipped), 1);
        assert_eq!(diagnostics.count(DiagnosticKind::PointLightCapExceeded), 2);
    }

    #[test]
    fn test_directional_direction_is_normalised() {
        let dir = AssetDir::new("loader_direction");
        let path = dir.write(
            "scene.json",
            r#"{
                "sceneType": "3D",
                "models": [],
                "instances": [],
                "camera": {},
                "lights": [
                    { "type": "directional", "color": [1, 1, 1], "direction": [0, 0, 0] },
                    { "type": "directional", "color": [1, 1, 1], "direction": [0, -4, 3] }
                ],
                "backgroundColor": [0, 0, 0]
            }"#,
        );

        let scene = loader_for(&dir)
            .load(RecordingBackend::new(), &path)
            .unwrap();

        let direction = scene.lights().directional().unwrap().direction;
        assert_abs_diff_eq!(direction.magnitude(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(direction.y, -0.8, epsilon = 1e-6);
        assert_abs_diff_eq!(direction.z, 0.6, epsilon = 1e-6);
        assert_eq!(scene.diagnostics().count(DiagnosticKind::LightSkipped), 1);
        assert_eq!(scene.diagnostics().len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = AssetDir::new("loader_missing");
        let result = loader_for(&dir).load(RecordingBackend::new(), &dir.path().join("nope.json"));
        assert!(matches!(result, Err(SceneError::Io { .. })));
    }

    #[test]
    fn test_unsupported_scene_type_fails() {
        let dir = AssetDir::new("loader_type");
        let path = dir.write("flat.json", r#"{ "sceneType": "2D" }"#);
        let result = loader_for(&dir).load(RecordingBackend::new(), &path);
        assert!(matches!(result, Err(SceneError::UnsupportedSceneType(_))));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = AssetDir::new("loader_parse");
        let path = dir.write("broken.json", "{ \"sceneType\": ");
        let result = loader_for(&dir).load(RecordingBackend::new(), &path);
        assert!(matches!(result, Err(SceneError::Parse { .. })));
    }
}
