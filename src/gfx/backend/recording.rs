//! Headless shading program that records every command it receives.
//!
//! Used to validate scenes without a window (`scene-viewer --check`) and to
//! observe the exact upload/draw sequence of a frame.

use std::{cell::RefCell, rc::Rc};

use cgmath::Vector3;

use crate::{
    assets::ImageData,
    gfx::{
        scene::vertex::VertexAttributes,
        shader::{GpuDevice, ShaderProgram, Uniform, UniformValue},
    },
};

/// One command received by the program
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Activate,
    Clear(Vector3<f32>),
    SetUniform(Uniform, UniformValue),
    BindTexture(u32),
    Draw { mesh: u32, index_count: u32 },
    Deactivate,
}

/// Resource counters shared between the backend and its handles
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResourceStats {
    pub meshes_uploaded: usize,
    pub meshes_released: usize,
    pub textures_uploaded: usize,
    pub textures_released: usize,
}

type SharedStats = Rc<RefCell<ResourceStats>>;

/// Mesh handle; releases itself on drop
#[derive(Debug)]
pub struct RecordedMesh {
    pub id: u32,
    pub attributes: VertexAttributes,
    pub vertex_count: usize,
    pub index_count: usize,
    stats: SharedStats,
}

impl Drop for RecordedMesh {
    fn drop(&mut self) {
        self.stats.borrow_mut().meshes_released += 1;
    }
}

/// Texture handle; ids start at 1, 0 means unbound
#[derive(Debug)]
pub struct RecordedTexture {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    stats: SharedStats,
}

impl Drop for RecordedTexture {
    fn drop(&mut self) {
        self.stats.borrow_mut().textures_released += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<Command>,
    stats: SharedStats,
    next_mesh_id: u32,
    next_texture_id: u32,
    frames: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command received since creation
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn stats(&self) -> ResourceStats {
        *self.stats.borrow()
    }

    /// Completed activate/deactivate pairs
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of draw commands recorded
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. }))
            .count()
    }

    /// Last value uploaded into `uniform`, if any
    pub fn last_uniform(&self, uniform: Uniform) -> Option<UniformValue> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetUniform(u, v) if *u == uniform => Some(*v),
            _ => None,
        })
    }
}

impl GpuDevice for RecordingBackend {
    type Mesh = RecordedMesh;
    type Texture = RecordedTexture;

    fn upload_mesh(
        &mut self,
        vertices: &[f32],
        indices: &[u32],
        attributes: VertexAttributes,
    ) -> RecordedMesh {
        self.next_mesh_id += 1;
        self.stats.borrow_mut().meshes_uploaded += 1;
        RecordedMesh {
            id: self.next_mesh_id,
            attributes,
            vertex_count: vertices.len() / attributes.size_per_vertex().max(1),
            index_count: indices.len(),
            stats: Rc::clone(&self.stats),
        }
    }

    fn upload_texture(&mut self, image: &ImageData) -> RecordedTexture {
        self.next_texture_id += 1;
        self.stats.borrow_mut().textures_uploaded += 1;
        RecordedTexture {
            id: self.next_texture_id,
            width: image.width,
            height: image.height,
            stats: Rc::clone(&self.stats),
        }
    }
}

impl ShaderProgram for RecordingBackend {
    fn activate(&mut self) {
        self.commands.push(Command::Activate);
    }

    fn clear(&mut self, color: Vector3<f32>) {
        self.commands.push(Command::Clear(color));
    }

    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) {
        self.commands.push(Command::SetUniform(uniform, value));
    }

    fn bind_texture(&mut self, texture: &RecordedTexture) {
        self.commands.push(Command::BindTexture(texture.id));
    }

    fn draw(&mut self, mesh: &RecordedMesh, index_count: u32) {
        self.commands.push(Command::Draw {
            mesh: mesh.id,
            index_count,
        });
    }

    fn deactivate(&mut self) {
        self.commands.push(Command::Deactivate);
        self.frames += 1;
    }
}
