// ============================================================================
// pipeline.rs — Sketchbook
// Render pipeline creation, bind-group-layout helpers, the depth target and
// the cached mesh pipelines (depth / normal / phong / texture shading).
// ============================================================================

use std::collections::HashMap;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::app::Gpu;
use crate::mesh::{GpuMesh, MeshVertex};
use crate::texture::Texture;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// ======================== Depth Target ========================

/// Depth buffer matching the surface size. Rebuilt on resize.
pub struct DepthTarget {
    pub view: wgpu::TextureView,
}

impl DepthTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
        }
    }
}

// ======================== Helpers ========================

pub fn load_shader(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

pub fn bgl_uniform(binding: u32, has_dynamic_offset: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn bgl_texture(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub fn bgl_sampler(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

pub fn bg_buffer(binding: u32, buffer: &wgpu::Buffer) -> wgpu::BindGroupEntry<'_> {
    wgpu::BindGroupEntry {
        binding,
        resource: buffer.as_entire_binding(),
    }
}

pub fn uniform_buffer<T: Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// `src + dst` on every channel.
pub fn additive_blend() -> wgpu::BlendState {
    let add = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: add,
        alpha: add,
    }
}

/// Depth state for the main pass. 2D overlays neither test nor write depth.
pub fn depth_state(depth_test: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: depth_test,
        depth_compare: if depth_test {
            wgpu::CompareFunction::Less
        } else {
            wgpu::CompareFunction::Always
        },
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Flat 2D pipeline drawing into the main pass (no depth test).
pub fn create_overlay_pipeline(
    device: &wgpu::Device,
    name: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    module: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{name}_pipeline_layout")),
        bind_group_layouts,
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{name}_pipeline")),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: Some(depth_state(false)),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

// ======================== Mesh Shading ========================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Shading {
    Depth,
    Normal,
    #[default]
    Phong,
    Texture,
}

impl Shading {
    /// Selectable in the model viewer.
    pub const VIEWER: [Shading; 3] = [Shading::Depth, Shading::Normal, Shading::Phong];

    pub fn name(self) -> &'static str {
        match self {
            Shading::Depth => "depth",
            Shading::Normal => "normal",
            Shading::Phong => "phong",
            Shading::Texture => "texture",
        }
    }

    fn entry_point(self) -> &'static str {
        match self {
            Shading::Depth => "fs_depth",
            Shading::Normal => "fs_normal",
            Shading::Phong => "fs_phong",
            Shading::Texture => "fs_texture",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FrontFace {
    #[default]
    Ccw,
    Cw,
}

impl FrontFace {
    pub fn name(self) -> &'static str {
        match self {
            FrontFace::Ccw => "CCW",
            FrontFace::Cw => "CW",
        }
    }

    fn to_wgpu(self) -> wgpu::FrontFace {
        match self {
            FrontFace::Ccw => wgpu::FrontFace::Ccw,
            FrontFace::Cw => wgpu::FrontFace::Cw,
        }
    }
}

/// Everything that selects a distinct mesh pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub shading: Shading,
    pub cull_back: bool,
    pub front_face: FrontFace,
}

impl PipelineKey {
    pub fn new(shading: Shading) -> Self {
        Self {
            shading,
            ..Default::default()
        }
    }
}

/// How the texture shader derives texture coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MappingMode {
    #[default]
    Triplanar,
    Cylindrical,
    Spherical,
    FromMesh,
}

impl MappingMode {
    pub const ALL: [MappingMode; 4] = [
        MappingMode::Triplanar,
        MappingMode::Cylindrical,
        MappingMode::Spherical,
        MappingMode::FromMesh,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MappingMode::Triplanar => "Triplanar",
            MappingMode::Cylindrical => "Cylindrical",
            MappingMode::Spherical => "Spherical",
            MappingMode::FromMesh => "From mesh",
        }
    }

    fn index(self) -> u32 {
        match self {
            MappingMode::Triplanar => 0,
            MappingMode::Cylindrical => 1,
            MappingMode::Spherical => 2,
            MappingMode::FromMesh => 3,
        }
    }
}

/// Light intensities and direction (world space, w = 0).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub light_dir: Vec4,
    pub ia: Vec4,
    pub id: Vec4,
    pub is: Vec4,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            light_dir: Vec4::new(-1.0, -1.0, -1.0, 0.0),
            ia: Vec4::ONE,
            id: Vec4::ONE,
            is: Vec4::ONE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ka: Vec4,
    pub kd: Vec4,
    pub ks: Vec4,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ka: Vec4::new(0.1, 0.1, 0.1, 1.0),
            kd: Vec4::new(0.7, 0.7, 0.7, 1.0),
            ks: Vec4::ONE,
            shininess: 25.0,
        }
    }
}

/// Per-draw uniforms shared by all mesh fragment programs.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub light_dir: [f32; 4],
    pub ia: [f32; 4],
    pub id: [f32; 4],
    pub is: [f32; 4],
    pub ka: [f32; 4],
    pub kd: [f32; 4],
    pub ks: [f32; 4],
    pub shininess: f32,
    pub mapping_mode: u32,
    pub _pad: [u32; 2],
}

impl MeshUniforms {
    pub fn new(model: Mat4, view: Mat4, proj: Mat4) -> Self {
        let lighting = Lighting::default();
        let material = Material::default();
        Self {
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            normal_matrix: normal_matrix(view * model).to_cols_array_2d(),
            color: [1.0; 4],
            light_dir: lighting.light_dir.to_array(),
            ia: lighting.ia.to_array(),
            id: lighting.id.to_array(),
            is: lighting.is.to_array(),
            ka: material.ka.to_array(),
            kd: material.kd.to_array(),
            ks: material.ks.to_array(),
            shininess: material.shininess,
            mapping_mode: MappingMode::default().index(),
            _pad: [0; 2],
        }
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color.to_array();
        self
    }

    pub fn with_lighting(mut self, lighting: &Lighting) -> Self {
        self.light_dir = lighting.light_dir.to_array();
        self.ia = lighting.ia.to_array();
        self.id = lighting.id.to_array();
        self.is = lighting.is.to_array();
        self
    }

    pub fn with_material(mut self, material: &Material) -> Self {
        self.ka = material.ka.to_array();
        self.kd = material.kd.to_array();
        self.ks = material.ks.to_array();
        self.shininess = material.shininess;
        self
    }

    pub fn with_mapping(mut self, mode: MappingMode) -> Self {
        self.mapping_mode = mode.index();
        self
    }
}

/// Inverse transpose of the upper 3×3 of the model-view matrix.
pub fn normal_matrix(model_view: Mat4) -> Mat4 {
    let m = Mat3::from_mat4(model_view);
    if m.determinant().abs() < f32::EPSILON {
        return Mat4::IDENTITY;
    }
    Mat4::from_mat3(m.inverse().transpose())
}

// ======================== Mesh Renderer ========================

/// Mesh pipelines created on first use per [`PipelineKey`], one uniform
/// buffer with a slot per draw (dynamic offsets), and a white texture for
/// untextured draws.
pub struct MeshRenderer {
    shader: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
    texture_bgl: wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: u32,
    white_bind_group: wgpu::BindGroup,
}

impl MeshRenderer {
    /// `capacity` is the number of draws per frame.
    pub fn new(gpu: &Gpu, capacity: u32) -> Self {
        let device = &gpu.device;
        let capacity = capacity.max(1);
        let shader = load_shader(device, "mesh", include_str!("shaders/mesh.wgsl"));

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh_uniform_bgl"),
            entries: &[bgl_uniform(0, true)],
        });
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh_texture_bgl"),
            entries: &[bgl_texture(0), bgl_sampler(1)],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&uniform_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });

        let uniform_size = std::mem::size_of::<MeshUniforms>() as u64;
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = uniform_size.div_ceil(alignment) * alignment;
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh_uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_uniform_bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: NonZeroU64::new(uniform_size),
                }),
            }],
        });

        let white = Texture::white(device, &gpu.queue);
        let white_bind_group = texture_bind_group_with(device, &texture_bgl, &white);

        Self {
            shader,
            layout,
            texture_bgl,
            surface_format: gpu.surface_format,
            pipelines: HashMap::new(),
            uniform_buffer,
            uniform_bind_group,
            stride,
            capacity,
            white_bind_group,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Create the pipeline for `key` unless it is already cached.
    pub fn ensure_pipeline(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        log::debug!("Creating mesh pipeline {:?}", key);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("mesh_{}_pipeline", key.shading.name())),
            layout: Some(&self.layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some(key.shading.entry_point()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: key.front_face.to_wgpu(),
                cull_mode: key.cull_back.then_some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(depth_state(true)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        self.pipelines.insert(key, pipeline);
    }

    /// Upload the uniforms of draw number `slot`.
    pub fn write(&self, queue: &wgpu::Queue, slot: u32, uniforms: &MeshUniforms) {
        if slot >= self.capacity {
            log::warn!("Mesh uniform slot {} out of range ({})", slot, self.capacity);
            return;
        }
        queue.write_buffer(
            &self.uniform_buffer,
            slot as u64 * self.stride,
            bytemuck::bytes_of(uniforms),
        );
    }

    pub fn texture_bind_group(&self, device: &wgpu::Device, texture: &Texture) -> wgpu::BindGroup {
        texture_bind_group_with(device, &self.texture_bgl, texture)
    }

    /// Draw `mesh` with the pipeline for `key` and the uniforms in `slot`.
    /// The pipeline must have been created with [`Self::ensure_pipeline`].
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        key: PipelineKey,
        slot: u32,
        mesh: &GpuMesh,
        texture: Option<&wgpu::BindGroup>,
        triangles: Option<u32>,
    ) {
        let Some(pipeline) = self.pipelines.get(&key) else {
            return;
        };
        if slot >= self.capacity {
            return;
        }
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[(slot as u64 * self.stride) as u32]);
        pass.set_bind_group(1, texture.unwrap_or(&self.white_bind_group), &[]);
        mesh.draw(pass, triangles);
    }
}

fn texture_bind_group_with(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("mesh_texture_bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn mesh_uniforms_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<MeshUniforms>(), 400);
        assert_eq!(std::mem::size_of::<MeshUniforms>() % 16, 0);
    }

    #[test]
    fn normal_matrix_of_rotation_is_the_rotation() {
        let rotation = Mat4::from_rotation_y(0.7);
        let n = normal_matrix(rotation);
        assert!(n.abs_diff_eq(rotation, 1e-5));
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let n = normal_matrix(Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)));
        let v = n.transform_vector3(Vec3::X);
        assert!((v.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn singular_model_view_falls_back_to_identity() {
        assert_eq!(normal_matrix(Mat4::from_scale(Vec3::ZERO)), Mat4::IDENTITY);
    }

    #[test]
    fn default_uniforms_use_default_light_and_material() {
        let u = MeshUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY);
        assert_eq!(u.light_dir, [-1.0, -1.0, -1.0, 0.0]);
        assert_eq!(u.kd, [0.7, 0.7, 0.7, 1.0]);
        assert_eq!(u.shininess, 25.0);
        assert_eq!(u.mapping_mode, 0);

        let textured = u.with_mapping(MappingMode::FromMesh);
        assert_eq!(textured.mapping_mode, 3);
    }

    #[test]
    fn pipeline_keys_distinguish_culling() {
        let mut key = PipelineKey::new(Shading::Phong);
        let plain = key;
        key.cull_back = true;
        assert_ne!(plain, key);
        assert_eq!(plain.front_face, FrontFace::Ccw);
    }
}
