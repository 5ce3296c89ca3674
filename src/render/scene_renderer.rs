//! 3D line + triangle renderer for a frame's `DrawList`.
//!
//! One shader, two pipelines:
//! - a `LineList` pipeline for text strokes and particle trails
//! - a `TriangleList` pipeline (u32 indices) for particle cores
//!
//! Both use alpha blending with a `Less` depth test. Geometry is rebuilt on the CPU every
//! frame and streamed into reusable buffers that only grow.
//!
//! Notes / current limitations:
//! - One uniform block per frame (camera + lights); no per-object transforms.
//! - Lines are drawn before triangles; within each list the driver's order is kept.

use std::{borrow::Cow, mem};

use crate::config::LightingConfig;
use crate::render::gpu::{DEPTH_FORMAT, Gpu};
use crate::render::primitives::{GpuVertex, SceneUniforms};
use crate::scene::{Camera3D, DrawList};

fn round_up_to(v: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (v + (align - 1)) & !(align - 1)
}

/// A GPU buffer that is reallocated (never shrunk) when an upload does not fit.
struct StreamBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: wgpu::Buffer,
    capacity_bytes: u64,
}

impl StreamBuffer {
    fn new(gpu: &Gpu, label: &'static str, usage: wgpu::BufferUsages) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST;
        let capacity_bytes = 4096u64;
        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity_bytes,
            usage,
            mapped_at_creation: false,
        });
        Self {
            label,
            usage,
            buffer,
            capacity_bytes,
        }
    }

    /// Upload `raw` at offset 0, growing first if needed.
    ///
    /// `Queue::write_buffer` sizes must respect `COPY_BUFFER_ALIGNMENT`, so the upload is
    /// padded; callers slice only `..raw.len()` when drawing.
    fn upload(&mut self, gpu: &Gpu, raw: &[u8]) {
        let bytes = raw.len() as u64;
        let upload = round_up_to(bytes, wgpu::COPY_BUFFER_ALIGNMENT);

        if upload > self.capacity_bytes {
            // Grow to next power-ish to reduce realloc frequency.
            let new_size = upload.next_power_of_two().max(4096);
            log::debug!("{}: growing to {} bytes", self.label, new_size);
            self.buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: new_size,
                usage: self.usage,
                mapped_at_creation: false,
            });
            self.capacity_bytes = new_size;
        }

        if upload == bytes {
            gpu.queue.write_buffer(&self.buffer, 0, raw);
        } else {
            let mut padded = Vec::<u8>::with_capacity(upload as usize);
            padded.extend_from_slice(raw);
            padded.resize(upload as usize, 0);
            gpu.queue.write_buffer(&self.buffer, 0, &padded);
        }
    }
}

pub struct SceneRenderer {
    line_pipeline: wgpu::RenderPipeline,
    triangle_pipeline: wgpu::RenderPipeline,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    line_vertices: StreamBuffer,
    mesh_vertices: StreamBuffer,
    mesh_indices: StreamBuffer,

    // CPU staging reused across frames.
    line_staging: Vec<GpuVertex>,
    mesh_staging: Vec<GpuVertex>,

    lighting: LightingConfig,
}

impl SceneRenderer {
    /// Create the pipelines and empty stream buffers.
    ///
    /// Targets `gpu.surface_format.add_srgb_suffix()` and `DEPTH_FORMAT`.
    pub fn new(gpu: &Gpu, lighting: LightingConfig) -> anyhow::Result<Self> {
        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Scene Shader"),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!(
                    "shaders/scene.wgsl"
                ))),
            });

        let uniform_size = wgpu::BufferSize::new(mem::size_of::<SceneUniforms>() as u64)
            .ok_or_else(|| anyhow::anyhow!("scene uniforms have zero size"))?;

        let uniform_bind_group_layout =
            gpu.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Scene Uniform BGL"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(uniform_size),
                        },
                        count: None,
                    }],
                });

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: uniform_size.get(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Uniform BG"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                immediate_size: 0,
            });

        let make_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            gpu.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(label),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &[GpuVertex::layout()],
                        compilation_options: Default::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: gpu.surface_format.add_srgb_suffix(),
                            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: Default::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: true,
                        depth_compare: wgpu::CompareFunction::Less,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),
                    multisample: wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                })
        };

        let line_pipeline = make_pipeline("Scene Line Pipeline", wgpu::PrimitiveTopology::LineList);
        let triangle_pipeline =
            make_pipeline("Scene Triangle Pipeline", wgpu::PrimitiveTopology::TriangleList);

        Ok(Self {
            line_pipeline,
            triangle_pipeline,
            uniform_buffer,
            uniform_bind_group,
            line_vertices: StreamBuffer::new(
                gpu,
                "Scene Line Vertices",
                wgpu::BufferUsages::VERTEX,
            ),
            mesh_vertices: StreamBuffer::new(
                gpu,
                "Scene Mesh Vertices",
                wgpu::BufferUsages::VERTEX,
            ),
            mesh_indices: StreamBuffer::new(gpu, "Scene Mesh Indices", wgpu::BufferUsages::INDEX),
            line_staging: Vec::new(),
            mesh_staging: Vec::new(),
            lighting,
        })
    }

    /// Upload this frame's uniforms and geometry.
    ///
    /// Must be called before `draw` and outside the render pass (queue writes are applied
    /// at submit, ahead of the pass).
    pub fn prepare(&mut self, gpu: &Gpu, camera: &Camera3D, list: &DrawList) {
        let uniforms = SceneUniforms::new(
            camera,
            gpu.aspect(),
            &self.lighting,
            list.dynamic_light.as_ref(),
        );
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        self.line_staging.clear();
        self.line_staging.extend(list.lines.iter().map(GpuVertex::from));
        self.mesh_staging.clear();
        self.mesh_staging
            .extend(list.triangles.vertices.iter().map(GpuVertex::from));

        if !self.line_staging.is_empty() {
            self.line_vertices
                .upload(gpu, bytemuck::cast_slice(&self.line_staging));
        }
        if !self.mesh_staging.is_empty() && !list.triangles.indices.is_empty() {
            self.mesh_vertices
                .upload(gpu, bytemuck::cast_slice(&self.mesh_staging));
            self.mesh_indices
                .upload(gpu, bytemuck::cast_slice(&list.triangles.indices));
        }
    }

    /// Record draws for the geometry uploaded by the last `prepare`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, list: &DrawList) {
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);

        let line_count = list.lines.len() as u32;
        if line_count >= 2 {
            let bytes = (list.lines.len() * mem::size_of::<GpuVertex>()) as u64;
            pass.set_pipeline(&self.line_pipeline);
            pass.set_vertex_buffer(0, self.line_vertices.buffer.slice(..bytes));
            pass.draw(0..line_count, 0..1);
        }

        let index_count = list.triangles.indices.len() as u32;
        if index_count > 0 && !list.triangles.vertices.is_empty() {
            let vb_bytes = (list.triangles.vertices.len() * mem::size_of::<GpuVertex>()) as u64;
            let ib_bytes = (list.triangles.indices.len() * mem::size_of::<u32>()) as u64;
            pass.set_pipeline(&self.triangle_pipeline);
            pass.set_vertex_buffer(0, self.mesh_vertices.buffer.slice(..vb_bytes));
            pass.set_index_buffer(
                self.mesh_indices.buffer.slice(..ib_bytes),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(0..index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::round_up_to;

    #[test]
    fn uploads_are_padded_to_copy_alignment() {
        assert_eq!(round_up_to(0, 4), 0);
        assert_eq!(round_up_to(1, 4), 4);
        assert_eq!(round_up_to(44, 4), 44);
        assert_eq!(round_up_to(45, 4), 48);
    }
}
