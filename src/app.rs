//! Windowed scene viewer
//!
//! Owns the winit event loop. The wgpu renderer and the scene are created on
//! the first `resumed` callback, because a surface needs a live window.

use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    config::EngineConfig,
    gfx::{
        scene::{Scene, Scene3D, SceneLoader},
        RenderEngine,
    },
    input::FrameEvents,
};

pub struct SceneViewer {
    event_loop: EventLoop<()>,
    state: ViewerState,
}

struct ViewerState {
    loader: SceneLoader,
    scene_path: PathBuf,
    window: Option<Arc<Window>>,
    scene: Option<Scene3D<RenderEngine>>,
    events: FrameEvents,
    started: Instant,
    error: Option<anyhow::Error>,
}

impl SceneViewer {
    pub fn new(config: EngineConfig, scene_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        Ok(Self {
            event_loop,
            state: ViewerState {
                loader: SceneLoader::new(config),
                scene_path: scene_path.into(),
                window: None,
                scene: None,
                events: FrameEvents::default(),
                started: Instant::now(),
                error: None,
            },
        })
    }

    /// Runs until the window is closed. Fails if the renderer or the scene
    /// could not be created.
    pub fn run(self) -> anyhow::Result<()> {
        let SceneViewer {
            event_loop,
            mut state,
        } = self;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut state)
            .context("event loop terminated abnormally")?;

        match state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ViewerState {
    fn create_scene(&mut self, window: Arc<Window>) -> anyhow::Result<Scene3D<RenderEngine>> {
        let (width, height) = window.inner_size().into();
        let engine = pollster::block_on(RenderEngine::new(window, width, height))
            .context("failed to initialise the renderer")?;
        self.events.set_framebuffer_size(width, height);

        Ok(self.loader.load(engine, &self.scene_path)?)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for ViewerState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = self.loader.config();
        let attributes = WindowAttributes::default()
            .with_title("Scene Viewer")
            .with_inner_size(PhysicalSize::new(config.window_width, config.window_height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("failed to create window"));
                return;
            }
        };
        self.window = Some(window.clone());

        match self.create_scene(window) {
            Ok(scene) => self.scene = Some(scene),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        ..
                    },
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if key_code == KeyCode::Escape && pressed {
                    event_loop.exit();
                }
                self.events.set_key_state(key_code, pressed);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                scene.program_mut().resize(width, height);
                self.events.set_framebuffer_size(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.events.set_time(self.started.elapsed().as_secs_f32());
                scene.render(&self.events);
                self.events.end_frame();
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.events.add_cursor_delta(dx as f32, dy as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
