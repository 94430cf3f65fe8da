// ============================================================================
// mesh.rs — Sketchbook
// Triangle meshes: OBJ loading via tobj, normalization, vertex normals and
// the GPU vertex/index buffers drawn by the mesh pipelines.
// ============================================================================

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::error::AssetError;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side indexed triangle list.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub has_texcoords: bool,
}

impl MeshData {
    /// Load and triangulate every object of an `.obj` file into one mesh.
    /// Normals are computed when the file does not provide them for every
    /// vertex.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        if !path.is_file() {
            return Err(AssetError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        let (models, _materials) =
            tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|source| AssetError::Obj {
                path: path.to_path_buf(),
                source,
            })?;

        let mesh = Self::from_models(&models);
        if mesh.indices.is_empty() {
            return Err(AssetError::EmptyMesh(path.to_path_buf()));
        }
        log::info!(
            "Loaded {:?}: {} vertices, {} triangles",
            path,
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    pub fn from_models(models: &[tobj::Model]) -> Self {
        let mut mesh = MeshData {
            has_texcoords: !models.is_empty(),
            ..Default::default()
        };
        let mut all_normals = true;

        for model in models {
            let m = &model.mesh;
            let base = mesh.vertices.len() as u32;
            let count = m.positions.len() / 3;
            let has_normals = m.normals.len() == m.positions.len();
            let has_texcoords = m.texcoords.len() / 2 == count;
            all_normals &= has_normals;
            mesh.has_texcoords &= has_texcoords;

            for i in 0..count {
                let normal = if has_normals {
                    [m.normals[3 * i], m.normals[3 * i + 1], m.normals[3 * i + 2]]
                } else {
                    [0.0; 3]
                };
                let texcoord = if has_texcoords {
                    [m.texcoords[2 * i], m.texcoords[2 * i + 1]]
                } else {
                    [0.0; 2]
                };
                mesh.vertices.push(MeshVertex {
                    position: [m.positions[3 * i], m.positions[3 * i + 1], m.positions[3 * i + 2]],
                    normal,
                    texcoord,
                });
            }
            mesh.indices.extend(m.indices.iter().map(|&i| base + i));
        }

        if !all_normals {
            mesh.compute_normals();
        }
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Center on the origin and scale uniformly so the longest side of the
    /// bounding box spans [-1, 1].
    pub fn normalize(&mut self) {
        if self.vertices.is_empty() {
            return;
        }
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in &self.vertices {
            let p = Vec3::from_array(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        let center = (min + max) * 0.5;
        let longest = (max - min).max_element();
        let scale = if longest > f32::EPSILON { 2.0 / longest } else { 1.0 };
        for v in &mut self.vertices {
            v.position = ((Vec3::from_array(v.position) - center) * scale).to_array();
        }
    }

    /// Area-weighted vertex normals from the triangle list.
    pub fn compute_normals(&mut self) {
        let mut sums = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from_array(self.vertices[a].position);
            let pb = Vec3::from_array(self.vertices[b].position);
            let pc = Vec3::from_array(self.vertices[c].position);
            let face = (pb - pa).cross(pc - pa);
            sums[a] += face;
            sums[b] += face;
            sums[c] += face;
        }
        for (v, sum) in self.vertices.iter_mut().zip(sums) {
            let n = sum.normalize_or_zero();
            v.normal = if n == Vec3::ZERO { Vec3::Y } else { n }.to_array();
        }
    }
}

/// Vertex and index buffers of a loaded mesh.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    triangle_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            triangle_count: mesh.triangle_count() as u32,
        }
    }

    pub fn triangle_count(&self) -> u32 {
        self.triangle_count
    }

    /// Draw the first `triangles` triangles (all of them when `None`).
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, triangles: Option<u32>) {
        let triangles = triangles.unwrap_or(self.triangle_count).min(self.triangle_count);
        if triangles == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..triangles * 3, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const PYRAMID: &str = "\
v 0 0 0
v 4 0 0
v 0 4 0
v 0 0 4
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sketchbook-mesh-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_obj_and_computes_normals() {
        let path = write_fixture("pyramid.obj", PYRAMID);
        let mesh = MeshData::load(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
        assert!(!mesh.has_texcoords);
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4, "normal {n:?} is not unit");
        }
    }

    #[test]
    fn normalize_fits_unit_cube() {
        let path = write_fixture("pyramid_norm.obj", PYRAMID);
        let mut mesh = MeshData::load(&path).unwrap();
        mesh.normalize();

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in &mesh.vertices {
            min = min.min(Vec3::from_array(v.position));
            max = max.max(Vec3::from_array(v.position));
        }
        assert!((max.x - 1.0).abs() < 1e-5);
        assert!((min.x + 1.0).abs() < 1e-5);
        assert!(((min + max) * 0.5).length() < 1e-5);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MeshData::load(Path::new("/nonexistent/teapot.obj")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn file_without_faces_is_empty_mesh() {
        let path = write_fixture("points.obj", "v 0 0 0\nv 1 0 0\n");
        let err = MeshData::load(&path).unwrap_err();
        assert!(matches!(err, AssetError::EmptyMesh(_)));
    }

    #[test]
    fn degenerate_triangles_get_fallback_normal() {
        let mut mesh = MeshData {
            vertices: vec![MeshVertex::default(); 3],
            indices: vec![0, 1, 2],
            has_texcoords: false,
        };
        mesh.compute_normals();
        assert_eq!(mesh.vertices[0].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn quads_are_triangulated() {
        let path = write_fixture(
            "quad.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\nf 1/1 2/2 3/3 4/4\n",
        );
        let mesh = MeshData::load(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.has_texcoords);
    }
}
