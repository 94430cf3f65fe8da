// ============================================================================
// assets.rs — Sketchbook
// The fixed assets directory: meshes (.obj) and textures (.png).
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AssetError;
use crate::mesh::MeshData;

#[derive(Clone, Debug)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Load an `.obj` from the assets directory, normalized to [-1, 1]³.
    pub fn load_mesh(&self, name: &str) -> Result<MeshData, AssetError> {
        let mut mesh = MeshData::load(&self.path(name))?;
        mesh.normalize();
        Ok(mesh)
    }

    /// File names of the `.obj` models in the assets directory, sorted.
    pub fn list_models(&self) -> Result<Vec<String>, AssetError> {
        let entries = fs::read_dir(&self.root).map_err(|source| AssetError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"))
            })
            .filter_map(|path| path.file_name()?.to_str().map(str::to_owned))
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_models_are_listed() {
        let assets = Assets::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"));
        let models = assets.list_models().unwrap();
        assert!(models.contains(&"box.obj".to_string()));
        assert!(models.contains(&"geosphere.obj".to_string()));
        assert!(models.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let assets = Assets::new("/nonexistent/sketchbook/assets");
        assert!(matches!(assets.list_models(), Err(AssetError::Io { .. })));
    }

    #[test]
    fn bundled_mesh_loads_normalized() {
        let assets = Assets::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"));
        let mesh = assets.load_mesh("torus.obj").unwrap();
        assert!(mesh.triangle_count() > 0);
        for v in &mesh.vertices {
            assert!(v.position.iter().all(|c| c.abs() <= 1.0 + 1e-4));
        }
    }
}
