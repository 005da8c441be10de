//! wgpu backend for the `Canvas` draw calls
//!
//! Draw calls are tessellated on the CPU into one triangle list and one line
//! list, uploaded once per frame and drawn with two pipelines sharing a shader.

use std::f32::consts::TAU;

use common::{create_uniform_buffer, create_vertex_buffer, Camera2D, CameraUniform, GraphicsContext, Vertex};
use glam::Vec2;

use crate::entity::Rgba;
use crate::presentation::Canvas;

/// Side of the square used for single points, in pixels
const POINT_SIZE: f32 = 2.0;

/// Segments used to approximate a circle of the given radius
fn circle_segments(radius: f32) -> usize {
    ((radius * 1.5) as usize).clamp(8, 64)
}

fn circle_point(center: Vec2, radius: f32, i: usize, segments: usize) -> Vec2 {
    center + Vec2::from_angle(TAU * i as f32 / segments as f32) * radius
}

/// CPU-side geometry for one frame
#[derive(Debug, Default)]
pub struct ShapeBatch {
    pub triangles: Vec<Vertex>,
    pub lines: Vec<Vertex>,
}

impl ShapeBatch {
    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
    }

    fn push_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        for p in [a, b, c] {
            self.triangles.push(Vertex::new(p.to_array(), color));
        }
    }
}

impl Canvas for ShapeBatch {
    fn line(&mut self, a: Vec2, b: Vec2, color: Rgba) {
        let color = color.to_array();
        self.lines.push(Vertex::new(a.to_array(), color));
        self.lines.push(Vertex::new(b.to_array(), color));
    }

    fn point(&mut self, at: Vec2, color: Rgba) {
        let h = POINT_SIZE / 2.0;
        let corners = [
            at + Vec2::new(-h, -h),
            at + Vec2::new(h, -h),
            at + Vec2::new(h, h),
            at + Vec2::new(-h, h),
        ];
        self.fill_polygon(&corners, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let color = color.to_array();
        let segments = circle_segments(radius);
        for i in 0..segments {
            let a = circle_point(center, radius, i, segments);
            let b = circle_point(center, radius, i + 1, segments);
            self.push_triangle(center, a, b, color);
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let segments = circle_segments(radius);
        for i in 0..segments {
            let a = circle_point(center, radius, i, segments);
            let b = circle_point(center, radius, i + 1, segments);
            self.line(a, b, color);
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        let color = color.to_array();
        if let Some((&first, rest)) = points.split_first() {
            for pair in rest.windows(2) {
                self.push_triangle(first, pair[0], pair[1], color);
            }
        }
    }
}

/// Vertex buffer that grows to fit the largest frame seen so far
struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
}

impl DynamicBuffer {
    fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let zeroed = vec![Vertex::new([0.0; 2], [0.0; 4]); capacity.max(1)];
        Self {
            buffer: create_vertex_buffer(device, &zeroed),
            capacity: zeroed.len(),
            len: 0,
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[Vertex]) {
        if vertices.len() > self.capacity {
            self.buffer = create_vertex_buffer(device, vertices);
            self.capacity = vertices.len();
        } else if !vertices.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.len = vertices.len() as u32;
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[Vertex::LAYOUT],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
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
    })
}

pub struct Renderer {
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    triangles: DynamicBuffer,
    lines: DynamicBuffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    clear_color: wgpu::Color,
}

impl Renderer {
    pub fn new(ctx: &GraphicsContext, camera: &Camera2D, background: Rgba) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shape Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shapes.wgsl").into()),
        });

        let camera_buffer = create_uniform_buffer(device, &CameraUniform::from_camera_2d(camera));

        let camera_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shape Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let format = ctx.config.format;
        let triangle_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            wgpu::PrimitiveTopology::TriangleList,
            "Triangle Pipeline",
        );
        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            wgpu::PrimitiveTopology::LineList,
            "Line Pipeline",
        );

        let [r, g, b, a] = background.to_array();

        Self {
            triangle_pipeline,
            line_pipeline,
            triangles: DynamicBuffer::new(device, 16 * 1024),
            lines: DynamicBuffer::new(device, 16 * 1024),
            camera_buffer,
            camera_bind_group,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera2D) {
        let uniform = CameraUniform::from_camera_2d(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, batch: &ShapeBatch) {
        self.triangles.upload(device, queue, &batch.triangles);
        self.lines.upload(device, queue, &batch.lines);
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        if self.triangles.len > 0 {
            render_pass.set_pipeline(&self.triangle_pipeline);
            render_pass.set_vertex_buffer(0, self.triangles.buffer.slice(..));
            render_pass.draw(0..self.triangles.len, 0..1);
        }
        if self.lines.len > 0 {
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_vertex_buffer(0, self.lines.buffer.slice(..));
            render_pass.draw(0..self.lines.len, 0..1);
        }
    }
}
