//! GPU renderer for the particle field
//!
//! One instanced indexed draw of the particle sphere. Draws directly into
//! egui's render pass via CallbackTrait. The instance buffer is uploaded
//! only when the animator marked it dirty since the last prepare.

use bytemuck::{Pod, Zeroable};
use egui_wgpu::wgpu::{self, util::DeviceExt};
use tracing::{debug, error, warn};

use super::mesh::{particle_sphere, MeshVertex};
use crate::core::{InstanceRaw, SharedInstances};

/// Particle tint: #6366f1 at 30% opacity
pub const PARTICLE_TINT: [f32; 4] = [99.0 / 255.0, 102.0 / 255.0, 241.0 / 255.0, 0.3];

/// Uniform buffer layout for the shader
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct FieldUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

impl Default for FieldUniforms {
    fn default() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            tint: PARTICLE_TINT,
        }
    }
}

/// Instances that fit in one vertex buffer of at most `max_buffer_size`
/// bytes, capped at `u32::MAX` for the draw call.
pub fn instance_capacity(requested: usize, max_buffer_size: u64) -> u32 {
    let slot = std::mem::size_of::<InstanceRaw>() as u64;
    let fits = max_buffer_size / slot;
    let requested = u64::try_from(requested).unwrap_or(u64::MAX);
    u32::try_from(requested.min(fits)).unwrap_or(u32::MAX)
}

pub struct FieldRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
}

impl FieldRenderer {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat, instance_count: usize) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("field_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("field_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("field_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("field_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3, // position
                        }],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[
                            wgpu::VertexAttribute {
                                offset: 0,
                                shader_location: 1,
                                format: wgpu::VertexFormat::Float32x4, // model column 0
                            },
                            wgpu::VertexAttribute {
                                offset: 16,
                                shader_location: 2,
                                format: wgpu::VertexFormat::Float32x4, // model column 1
                            },
                            wgpu::VertexAttribute {
                                offset: 32,
                                shader_location: 3,
                                format: wgpu::VertexFormat::Float32x4, // model column 2
                            },
                            wgpu::VertexAttribute {
                                offset: 48,
                                shader_location: 4,
                                format: wgpu::VertexFormat::Float32x4, // model column 3
                            },
                        ],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            // Negative particle scales flip the winding per instance, so back
            // faces are discarded in fs_main instead of culled here
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("field_uniforms"),
            contents: bytemuck::bytes_of(&FieldUniforms::default()),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::UNIFORM,
        });

        let mesh = particle_sphere();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("field_sphere_vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("field_sphere_indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let capacity = instance_capacity(instance_count, device.limits().max_buffer_size);
        if (capacity as usize) < instance_count {
            warn!(
                requested = instance_count,
                capacity,
                "Instance buffer exceeds device limits, drawing a prefix of the pool"
            );
        }

        // At least one slot so the buffer is never zero-sized
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("field_instances"),
            size: u64::from(capacity.max(1)) * std::mem::size_of::<InstanceRaw>() as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::VERTEX,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("field_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        debug!(capacity, indices = mesh.indices.len(), "Field renderer created");

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            instance_buffer,
            instance_count: capacity,
        }
    }

    /// Upload the uniforms, and the instance transforms if they changed.
    pub fn upload_data(&mut self, queue: &wgpu::Queue, instances: &SharedInstances, uniforms: &FieldUniforms) {
        {
            let mut instances = instances.lock();
            if instances.take_dirty() {
                let count = self.instance_count as usize;
                if instances.len() < count {
                    error!(
                        expected = count,
                        got = instances.len(),
                        "Instance buffer shrank after mount, skipping upload"
                    );
                } else if count > 0 {
                    let bytes = count * std::mem::size_of::<InstanceRaw>();
                    queue.write_buffer(&self.instance_buffer, 0, &instances.as_bytes()[..bytes]);
                }
            }
        }
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'static>) {
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }
}

/// Callback for egui integration
pub struct FieldCallback {
    pub instances: SharedInstances,
    pub uniforms: FieldUniforms,
}

impl egui_wgpu::CallbackTrait for FieldCallback {
    fn prepare(
        &self,
        _device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        _encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        match callback_resources.get_mut::<FieldRenderer>() {
            Some(renderer) => renderer.upload_data(queue, &self.instances, &self.uniforms),
            None => error!("Field renderer not registered"),
        }
        vec![]
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &egui_wgpu::CallbackResources,
    ) {
        if let Some(renderer) = callback_resources.get::<FieldRenderer>() {
            renderer.draw(render_pass);
        }
    }
}
