//! WGPU-based implementation of the shading program
//!
//! Uniform uploads are collected into a CPU-side [`ShaderState`]. Each draw
//! snapshots the per-draw block into a dynamic uniform buffer together with
//! the bound texture; everything recorded between `activate` and `deactivate`
//! is submitted as one render pass when the frame ends.

use wgpu::util::DeviceExt;

use crate::{
    assets::ImageData,
    error::RenderError,
    gfx::{
        resources::{
            frame_uniforms::{DrawUniforms, FrameUniforms, ShaderState},
            texture_resource::{DepthTarget, TextureResource},
        },
        scene::vertex::VertexAttributes,
        shader::{GpuDevice, ShaderProgram, Uniform, UniformValue},
    },
    wgpu_utils::{binding_types, DynamicUniformBuffer, UniformBuffer},
};

use super::pipeline::PipelineConfig;

/// Vertex and index buffers of one mesh, always in the full vertex layout
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Bind group sampling one uploaded image; it keeps the image alive
pub struct GpuTexture {
    bind_group: wgpu::BindGroup,
}

/// One draw call waiting for the end of the frame
struct PendingDraw {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    texture: wgpu::BindGroup,
    draw_offset: u32,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_target: DepthTarget,
    pipeline: wgpu::RenderPipeline,

    frame_ubo: UniformBuffer<FrameUniforms>,
    frame_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: DynamicUniformBuffer<DrawUniforms>,
    draw_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    fallback_texture: GpuTexture,

    state: ShaderState,
    clear_color: wgpu::Color,
    bound_texture: Option<wgpu::BindGroup>,
    draws: Vec<PendingDraw>,
    frame_open: bool,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_target = DepthTarget::new(&device, config.width, config.height);

        // group 0: per-frame block
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[binding_types::rendering_entry(0, binding_types::uniform())],
        });
        let frame_ubo = UniformBuffer::<FrameUniforms>::new(&device);
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.binding_resource(),
            }],
        });

        // group 1: per-draw block with dynamic offset
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[binding_types::rendering_entry(
                0,
                binding_types::uniform_dynamic(std::mem::size_of::<DrawUniforms>() as u64),
            )],
        });
        let draw_buffer = DynamicUniformBuffer::<DrawUniforms>::new(&device, 256);
        let draw_bind_group = Self::create_draw_bind_group(&device, &draw_layout, &draw_buffer);

        // group 2: material texture
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                binding_types::rendering_entry(0, binding_types::texture_2d()),
                binding_types::rendering_entry(
                    1,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        });
        let fallback_texture =
            Self::create_texture(&device, &queue, &texture_layout, &ImageData::white(), "Fallback Texture");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Phong Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/phong.wgsl").into()),
        });
        let pipeline = PipelineConfig::default()
            .with_label("Phong")
            .with_color_format(format)
            .with_depth_format(DepthTarget::FORMAT)
            .create(&device, &shader, &[&frame_layout, &draw_layout, &texture_layout]);

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_target,
            pipeline,
            frame_ubo,
            frame_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            texture_layout,
            fallback_texture,
            state: ShaderState::default(),
            clear_color: wgpu::Color::BLACK,
            bound_texture: None,
            draws: Vec::new(),
            frame_open: false,
        })
    }

    fn create_draw_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &DynamicUniformBuffer<DrawUniforms>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.binding_resource(),
            }],
        })
    }

    fn create_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        image: &ImageData,
        label: &str,
    ) -> GpuTexture {
        let resource = TextureResource::from_image(device, queue, image, label);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &resource.bind_group_entries(),
        });
        GpuTexture { bind_group }
    }

    /// Resizes the render engine surface and recreates depth buffer
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_target = DepthTarget::new(&self.device, width, height);
    }

    /// Encodes and submits the recorded draws, then presents
    fn submit_frame(&mut self) {
        self.frame_ubo.update_content(&self.queue, self.state.frame);
        if self.draw_buffer.upload(&self.device, &self.queue) {
            self.draw_bind_group =
                Self::create_draw_bind_group(&self.device, &self.draw_layout, &self.draw_buffer);
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                if matches!(e, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) {
                    self.surface.configure(&self.device, &self.config);
                }
                return;
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_target.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            for draw in &self.draws {
                render_pass.set_bind_group(1, &self.draw_bind_group, &[draw.draw_offset]);
                render_pass.set_bind_group(2, &draw.texture, &[]);
                render_pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                render_pass.set_index_buffer(draw.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }
}

impl GpuDevice for RenderEngine {
    type Mesh = GpuMesh;
    type Texture = GpuTexture;

    fn upload_mesh(
        &mut self,
        vertices: &[f32],
        indices: &[u32],
        attributes: VertexAttributes,
    ) -> GpuMesh {
        let full = attributes.expand_to_full(vertices);
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&full),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    fn upload_texture(&mut self, image: &ImageData) -> GpuTexture {
        Self::create_texture(
            &self.device,
            &self.queue,
            &self.texture_layout,
            image,
            "Material Texture",
        )
    }
}

impl ShaderProgram for RenderEngine {
    fn activate(&mut self) {
        self.frame_open = true;
        self.draws.clear();
        self.draw_buffer.clear();
        self.bound_texture = None;
        self.state.draw = DrawUniforms::default();
    }

    fn clear(&mut self, color: cgmath::Vector3<f32>) {
        self.clear_color = wgpu::Color {
            r: f64::from(color.x),
            g: f64::from(color.y),
            b: f64::from(color.z),
            a: 1.0,
        };
    }

    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) {
        if !self.state.apply(uniform, value) {
            log::warn!("Ignoring {:?} for uniform '{}'", value, uniform);
        }
    }

    fn bind_texture(&mut self, texture: &GpuTexture) {
        self.bound_texture = Some(texture.bind_group.clone());
    }

    fn draw(&mut self, mesh: &GpuMesh, index_count: u32) {
        if !self.frame_open {
            log::warn!("Draw issued outside of an active frame; ignored");
            return;
        }
        let draw_offset = self.draw_buffer.push(&self.state.draw);
        let texture = self
            .bound_texture
            .clone()
            .unwrap_or_else(|| self.fallback_texture.bind_group.clone());

        self.draws.push(PendingDraw {
            vertex_buffer: mesh.vertex_buffer.clone(),
            index_buffer: mesh.index_buffer.clone(),
            index_count: index_count.min(mesh.index_count),
            texture,
            draw_offset,
        });
    }

    fn deactivate(&mut self) {
        if !self.frame_open {
            return;
        }
        self.submit_frame();
        self.draws.clear();
        self.frame_open = false;
    }
}
