use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use scene3d::{
    gfx::{
        backend::RecordingBackend,
        scene::{Scene, SceneLoader},
    },
    input::FrameEvents,
    EngineConfig, SceneViewer,
};

/// Renders a declarative 3D scene description
#[derive(Debug, Parser)]
#[command(name = "scene-viewer", version, about)]
struct Args {
    /// Load the scene headlessly, render one frame and print a report
    #[arg(long)]
    check: bool,

    /// Scene description; relative names are also looked up in the scenes directory
    #[arg(default_value = "example.json")]
    scene: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = EngineConfig::from_env_or_default().context("invalid engine configuration")?;

    if args.check {
        return check_scene(config, args.scene);
    }
    SceneViewer::new(config, args.scene)?.run()
}

/// Loads the scene headlessly, renders one frame and prints a summary
fn check_scene(config: EngineConfig, scene_path: PathBuf) -> anyhow::Result<()> {
    let loader = SceneLoader::new(config);
    let mut scene = loader.load(RecordingBackend::new(), &scene_path)?;

    for model in scene.models().iter() {
        match model.bounding_box() {
            Some(bounds) => println!(
                "model {}: {} meshes, bounds {}",
                model.name(),
                model.mesh_count(),
                bounds
            ),
            None => println!("model {}: no geometry", model.name()),
        }
    }
    for diagnostic in scene.diagnostics().iter() {
        println!("{}", diagnostic);
    }

    scene.render(&FrameEvents::default());
    println!(
        "{} textures, {} instances, {} point lights, {} draw calls",
        scene.models().textures().uploaded_count(),
        scene.instances().len(),
        scene.lights().point_light_count(),
        scene.program().draw_count()
    );
    Ok(())
}
