//! Rendering system with wgpu pipelines and per-frame uniform upload.
//!
//! One shared uniform block feeds four pipelines: particle shell, spectrum
//! rings, deployable markers, and the response overlay backdrop. Host-side
//! frame work is a handful of `write_buffer` calls.

use anyhow::{anyhow, Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use std::f32::consts::TAU;
use std::sync::Arc;
use wgpu::util::DeviceExt;

use crate::particles::ParticleField;
use crate::rings::RingInstance;

/// Number of discs in the deployable marker group
const MARKER_COUNT: usize = 6;

/// Particle shell base opacity
const FIELD_OPACITY: f32 = 0.85;

/// Shared uniform block, mirrored by the `Frame` struct in every shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub volume: f32,
    pub point_size: f32,
    pub viewport_scale: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub deploy_scale: f32,
    pub overlay_opacity: f32,
    pub overlay_y: f32,
    pub overlay_yaw: f32,
    pub accent: [f32; 3],
    pub field_opacity: f32,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            resolution: [1.0, 1.0],
            time: 0.0,
            volume: 0.0,
            point_size: 0.015,
            viewport_scale: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            deploy_scale: 0.0,
            overlay_opacity: 0.0,
            overlay_y: 0.0,
            overlay_yaw: 0.0,
            accent: [0.0, 0.96, 1.0],
            field_opacity: FIELD_OPACITY,
        }
    }
}

/// Per-marker instance data (uploaded once)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct MarkerInstance {
    dir: [f32; 2],
    arc_radius: f32,
    _pad: f32,
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    particle_pipeline: wgpu::RenderPipeline,
    ring_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    particle_buffer: wgpu::Buffer,
    particle_count: u32,
    ring_buffer: wgpu::Buffer,
    ring_count: u32,
    marker_buffer: wgpu::Buffer,
}

impl RenderSystem {
    /// Create the rendering system against a window surface
    pub async fn new(
        window: Arc<winit::window::Window>,
        field: &ParticleField,
        rings: &[RingInstance],
        marker_arc_radius: f32,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance
            .create_surface(window)
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("failed to request device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let particle_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("particles.wgsl").into()),
        });
        let ring_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ring Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("rings.wgsl").into()),
        });
        let overlay_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("overlay.wgsl").into()),
        });

        // Static particle instances: uploaded once, never rewritten
        let particle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Instance Buffer"),
            contents: bytemuck::cast_slice(field.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Ring instances are rewritten every frame
        let ring_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ring Instance Buffer"),
            contents: bytemuck::cast_slice(rings),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let markers: Vec<MarkerInstance> = (0..MARKER_COUNT)
            .map(|i| {
                let angle = i as f32 / MARKER_COUNT as f32 * TAU + TAU / 4.0;
                MarkerInstance {
                    dir: [angle.cos(), angle.sin()],
                    arc_radius: marker_arc_radius,
                    _pad: 0.0,
                }
            })
            .collect();
        let marker_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Marker Instance Buffer"),
            contents: bytemuck::cast_slice(&markers),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[FrameUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let particle_layout = wgpu::VertexBufferLayout {
            array_stride: 32,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 16,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        };
        let ring_layout = wgpu::VertexBufferLayout {
            array_stride: 32,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 16,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        };
        let marker_layout = wgpu::VertexBufferLayout {
            array_stride: 16,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 8,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        };

        let particle_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            "Particle Pipeline",
            &particle_shader,
            "vs_main",
            "fs_main",
            &[particle_layout],
        );
        let ring_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            "Ring Pipeline",
            &ring_shader,
            "vs_main",
            "fs_main",
            &[ring_layout],
        );
        let marker_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            "Marker Pipeline",
            &overlay_shader,
            "vs_marker",
            "fs_marker",
            &[marker_layout],
        );
        let overlay_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            "Overlay Pipeline",
            &overlay_shader,
            "vs_overlay",
            "fs_overlay",
            &[],
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            particle_pipeline,
            ring_pipeline,
            marker_pipeline,
            overlay_pipeline,
            uniform_buffer,
            uniform_bind_group,
            particle_buffer,
            particle_count: field.count(),
            ring_buffer,
            ring_count: rings.len() as u32,
            marker_buffer,
        })
    }

    /// Reconfigure the surface after a window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Current surface size in pixels
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Push this frame's uniform block
    pub fn update_uniforms(&self, uniforms: &FrameUniforms) {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    /// Push this frame's ring instance data
    pub fn update_rings(&self, rings: &[RingInstance]) {
        self.queue
            .write_buffer(&self.ring_buffer, 0, bytemuck::cast_slice(rings));
    }

    /// Render a frame. Hidden elements are skipped entirely, not drawn
    /// transparent.
    pub fn render(&self, markers_visible: bool, overlay_visible: bool) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.004,
                            g: 0.007,
                            b: 0.012,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            render_pass.set_pipeline(&self.particle_pipeline);
            render_pass.set_vertex_buffer(0, self.particle_buffer.slice(..));
            render_pass.draw(0..6, 0..self.particle_count);

            render_pass.set_pipeline(&self.ring_pipeline);
            render_pass.set_vertex_buffer(0, self.ring_buffer.slice(..));
            render_pass.draw(0..6, 0..self.ring_count);

            if markers_visible {
                render_pass.set_pipeline(&self.marker_pipeline);
                render_pass.set_vertex_buffer(0, self.marker_buffer.slice(..));
                render_pass.draw(0..6, 0..MARKER_COUNT as u32);
            }

            if overlay_visible {
                render_pass.set_pipeline(&self.overlay_pipeline);
                render_pass.draw(0..6, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Pipeline builder shared by all four passes: quad-expansion vertices,
/// premultiplied alpha, no depth (draw order is back-to-front by
/// construction).
#[allow(clippy::too_many_arguments)]
fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    label: &str,
    module: &wgpu::ShaderModule,
    vs: &str,
    fs: &str,
    buffers: &[wgpu::VertexBufferLayout],
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some(vs),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some(fs),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_matches_shader_layout() {
        // The WGSL `Frame` struct is 128 bytes with `accent` at offset 112
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 128);
        assert_eq!(std::mem::offset_of!(FrameUniforms, resolution), 64);
        assert_eq!(std::mem::offset_of!(FrameUniforms, accent), 112);
    }

    #[test]
    fn instance_strides_match_vertex_layouts() {
        assert_eq!(std::mem::size_of::<crate::particles::ParticleVertex>(), 32);
        assert_eq!(std::mem::size_of::<RingInstance>(), 32);
        assert_eq!(std::mem::size_of::<MarkerInstance>(), 16);
    }
}
