// ============================================================================
// error.rs — Sketchbook
// Error types for asset loading and demo start-up.
// ============================================================================

use std::path::PathBuf;

/// Failure to read or decode a file from the assets directory.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse model {path:?}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("cannot decode image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("model {0:?} contains no triangles")]
    EmptyMesh(PathBuf),
}

/// Anything that stops a demo from starting.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("GPU initialization failed: {0}")]
    Gpu(String),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_error_names_the_file() {
        let err = AssetError::EmptyMesh(PathBuf::from("assets/empty.obj"));
        assert!(err.to_string().contains("empty.obj"));
    }

    #[test]
    fn io_error_keeps_source() {
        let err = AssetError::Io {
            path: PathBuf::from("missing.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn asset_error_converts_into_demo_error() {
        let demo: DemoError = AssetError::EmptyMesh(PathBuf::from("x.obj")).into();
        assert!(matches!(demo, DemoError::Asset(_)));
        assert!(demo.to_string().contains("x.obj"));
    }
}
