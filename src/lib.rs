// ============================================================================
// lib.rs — Sketchbook
// Shared harness for the demo binaries: window + GPU + egui frame loop,
// sprite and mesh pipelines, asset loading, and the demos themselves.
// ============================================================================

pub mod app;
pub mod assets;
pub mod camera;
pub mod capture;
pub mod config;
pub mod demos;
pub mod error;
pub mod game;
pub mod input;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod sprites;
pub mod texture;
pub mod timer;
pub mod trackball;

pub use app::{run, Demo, Gpu};
pub use assets::Assets;
pub use config::{AppConfig, WindowSettings};
pub use error::{AssetError, DemoError};
pub use input::DemoEvent;

/// Install the `env_logger` backend. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"),
    )
    .init();
}
