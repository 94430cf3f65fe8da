// ============================================================================
// sprites.rs — Sketchbook
// 2D drawing for the arcade demos: instanced point sprites (dots, stars,
// player, snake cells), filled polygons (asteroids) and coloured triangles.
// ============================================================================

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::app::Gpu;
use crate::pipeline::{
    additive_blend, bg_buffer, bgl_uniform, create_overlay_pipeline, load_shader, uniform_buffer,
};

// ======================== Point Sprites ========================

/// One point: clip-space position and RGB colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl PointInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3];

    pub fn new(position: Vec2, color: [f32; 3]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointShape {
    #[default]
    Round,
    Square,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct PointUniforms {
    viewport: [f32; 2],
    point_size: f32,
    shape: u32,
}

/// Offsets of the 3×3 tiling that makes wrap-around seamless.
pub const TILE_OFFSETS: [f32; 3] = [-2.0, 0.0, 2.0];

/// Translate `points`, optionally repeating them at every tile offset.
pub fn tile_instances(points: &[PointInstance], translation: Vec2, tiled: bool) -> Vec<PointInstance> {
    let offsets: &[f32] = if tiled { &TILE_OFFSETS } else { &[0.0] };
    let mut out = Vec::with_capacity(points.len() * offsets.len() * offsets.len());
    for &dy in offsets {
        for &dx in offsets {
            let shift = translation + Vec2::new(dx, dy);
            out.extend(points.iter().map(|p| PointInstance {
                position: (Vec2::from_array(p.position) + shift).to_array(),
                color: p.color,
            }));
        }
    }
    out
}

/// Shared additive-blended point pipeline.
pub struct PointPipeline {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
}

impl PointPipeline {
    pub fn new(gpu: &Gpu) -> Self {
        let device = &gpu.device;
        let shader = load_shader(device, "points", include_str!("shaders/points.wgsl"));
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("points_bgl"),
            entries: &[bgl_uniform(0, false)],
        });
        let pipeline = create_overlay_pipeline(
            device,
            "points",
            &[&bgl],
            &shader,
            &[PointInstance::layout()],
            gpu.surface_format,
            additive_blend(),
        );
        Self { pipeline, bgl }
    }

    /// A batch of points sharing one size and shape.
    pub fn batch(&self, gpu: &Gpu, point_size: f32, shape: PointShape, capacity: usize) -> PointBatch {
        let uniforms = PointUniforms {
            viewport: gpu.viewport().to_array(),
            point_size,
            shape: shape_index(shape),
        };
        let uniforms_buffer = uniform_buffer(&gpu.device, "points_uniforms", &uniforms);
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("points_bg"),
            layout: &self.bgl,
            entries: &[bg_buffer(0, &uniforms_buffer)],
        });
        let capacity = capacity.max(1);
        PointBatch {
            instances: instance_buffer(&gpu.device, capacity),
            capacity,
            count: 0,
            uniforms_buffer,
            bind_group,
            point_size,
            shape,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, batch: &PointBatch) {
        if batch.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &batch.bind_group, &[]);
        pass.set_vertex_buffer(0, batch.instances.slice(..));
        pass.draw(0..6, 0..batch.count);
    }
}

/// Instance buffer plus uniforms for one group of points.
pub struct PointBatch {
    instances: wgpu::Buffer,
    capacity: usize,
    count: u32,
    uniforms_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    point_size: f32,
    shape: PointShape,
}

impl PointBatch {
    pub fn set_point_size(&mut self, point_size: f32) {
        self.point_size = point_size;
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Replace the batch contents for this frame.
    pub fn upload(&mut self, gpu: &Gpu, points: &[PointInstance], translation: Vec2, tiled: bool) {
        let instances = tile_instances(points, translation, tiled);
        if instances.len() > self.capacity {
            self.capacity = instances.len().next_power_of_two();
            self.instances = instance_buffer(&gpu.device, self.capacity);
        }
        if !instances.is_empty() {
            gpu.queue
                .write_buffer(&self.instances, 0, bytemuck::cast_slice(&instances));
        }
        self.count = instances.len() as u32;

        let uniforms = PointUniforms {
            viewport: gpu.viewport().to_array(),
            point_size: self.point_size,
            shape: shape_index(self.shape),
        };
        gpu.queue
            .write_buffer(&self.uniforms_buffer, 0, bytemuck::bytes_of(&uniforms));
    }
}

fn shape_index(shape: PointShape) -> u32 {
    match shape {
        PointShape::Round => 0,
        PointShape::Square => 1,
    }
}

fn instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("point_instances"),
        size: (capacity * std::mem::size_of::<PointInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

// ======================== Polygons ========================

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PolygonUniforms {
    pub color: [f32; 4],
    pub translation: [f32; 2],
    pub scale: f32,
    pub rotation: f32,
}

/// Triangle list of a fan around the centroid of a closed outline.
pub fn fan_triangles(outline: &[Vec2]) -> Vec<[f32; 2]> {
    if outline.len() < 3 {
        return Vec::new();
    }
    let center = outline.iter().copied().sum::<Vec2>() / outline.len() as f32;
    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for (i, &a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        vertices.push(center.to_array());
        vertices.push(a.to_array());
        vertices.push(b.to_array());
    }
    vertices
}

pub struct PolygonPipeline {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
}

impl PolygonPipeline {
    pub fn new(gpu: &Gpu) -> Self {
        let device = &gpu.device;
        let shader = load_shader(device, "polygon", include_str!("shaders/polygon.wgsl"));
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("polygon_bgl"),
            entries: &[bgl_uniform(0, false)],
        });
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x2],
        };
        let pipeline = create_overlay_pipeline(
            device,
            "polygon",
            &[&bgl],
            &shader,
            &[vertex_layout],
            gpu.surface_format,
            wgpu::BlendState::ALPHA_BLENDING,
        );
        Self { pipeline, bgl }
    }

    /// Upload the outline of one polygon. Returns `None` for fewer than
    /// three points.
    pub fn shape(&self, gpu: &Gpu, outline: &[Vec2]) -> Option<PolygonShape> {
        use wgpu::util::DeviceExt;

        let vertices = fan_triangles(outline);
        if vertices.is_empty() {
            return None;
        }
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("polygon_vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let uniforms_buffer =
            uniform_buffer(&gpu.device, "polygon_uniforms", &PolygonUniforms::default());
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("polygon_bg"),
            layout: &self.bgl,
            entries: &[bg_buffer(0, &uniforms_buffer)],
        });
        Some(PolygonShape {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            uniforms_buffer,
            bind_group,
        })
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, shape: &PolygonShape) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &shape.bind_group, &[]);
        pass.set_vertex_buffer(0, shape.vertex_buffer.slice(..));
        pass.draw(0..shape.vertex_count, 0..1);
    }
}

pub struct PolygonShape {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    uniforms_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl PolygonShape {
    pub fn update(&self, queue: &wgpu::Queue, uniforms: &PolygonUniforms) {
        queue.write_buffer(&self.uniforms_buffer, 0, bytemuck::bytes_of(uniforms));
    }
}

// ======================== Coloured Triangles ========================

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ColorVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Growable vertex buffer of coloured triangles.
pub struct TrianglePipeline {
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

impl TrianglePipeline {
    pub fn new(gpu: &Gpu, capacity: usize) -> Self {
        let device = &gpu.device;
        let shader = load_shader(device, "triangles", include_str!("shaders/triangles.wgsl"));
        let pipeline = create_overlay_pipeline(
            device,
            "triangles",
            &[],
            &shader,
            &[ColorVertex::layout()],
            gpu.surface_format,
            wgpu::BlendState::ALPHA_BLENDING,
        );
        let capacity = capacity.max(3);
        Self {
            pipeline,
            vertices: triangle_buffer(device, capacity),
            capacity,
            count: 0,
        }
    }

    pub fn upload(&mut self, gpu: &Gpu, vertices: &[ColorVertex]) {
        if vertices.len() > self.capacity {
            self.capacity = vertices.len().next_power_of_two();
            self.vertices = triangle_buffer(&gpu.device, self.capacity);
        }
        if !vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.vertices, 0, bytemuck::cast_slice(vertices));
        }
        self.count = vertices.len() as u32;
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.draw(0..self.count, 0..1);
    }
}

fn triangle_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("triangle_vertices"),
        size: (capacity * std::mem::size_of::<ColorVertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_layouts_have_expected_strides() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 20);
        assert_eq!(std::mem::size_of::<PointUniforms>(), 16);
        assert_eq!(std::mem::size_of::<PolygonUniforms>(), 32);
        assert_eq!(std::mem::size_of::<ColorVertex>(), 24);
    }

    #[test]
    fn tiling_repeats_points_nine_times() {
        let points = [PointInstance::new(Vec2::new(0.5, -0.5), [1.0, 0.0, 0.0])];
        let tiled = tile_instances(&points, Vec2::new(0.25, 0.0), true);
        assert_eq!(tiled.len(), 9);
        assert!(tiled.iter().any(|p| p.position == [0.75, -0.5]));
        assert!(tiled.iter().any(|p| p.position == [-1.25, -2.5]));
        assert!(tiled.iter().any(|p| p.position == [2.75, 1.5]));
        assert!(tiled.iter().all(|p| p.color == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn untiled_points_are_only_translated() {
        let points = [
            PointInstance::new(Vec2::ZERO, [1.0; 3]),
            PointInstance::new(Vec2::ONE, [1.0; 3]),
        ];
        let moved = tile_instances(&points, Vec2::new(0.25, 0.5), false);
        assert_eq!(moved.len(), 2);
        assert_eq!(moved[0].position, [0.25, 0.5]);
        assert_eq!(moved[1].position, [1.25, 1.5]);
    }

    #[test]
    fn fan_covers_every_edge() {
        let square = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        let vertices = fan_triangles(&square);
        assert_eq!(vertices.len(), 12);
        assert_eq!(vertices[0], [0.0, 0.0]);
        assert_eq!(vertices[11], [-1.0, -1.0]);
    }

    #[test]
    fn degenerate_outline_has_no_triangles() {
        assert!(fan_triangles(&[Vec2::ZERO, Vec2::X]).is_empty());
    }
}
