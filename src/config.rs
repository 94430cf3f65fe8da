// ============================================================================
// config.rs — Sketchbook
// Window settings per demo and process-wide configuration (asset and
// screenshot directories, optional `sketchbook.json` overrides).
// ============================================================================

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const ASSETS_ENV: &str = "SKETCHBOOK_ASSETS";
pub const SCREENSHOTS_ENV: &str = "SKETCHBOOK_SCREENSHOTS";
pub const OVERRIDES_FILE: &str = "sketchbook.json";

/// Window the demo asks for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub show_fps: bool,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Sketchbook".to_string(),
            width: 600,
            height: 600,
            resizable: true,
            show_fps: false,
            vsync: true,
        }
    }
}

impl WindowSettings {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_fps(mut self, show_fps: bool) -> Self {
        self.show_fps = show_fps;
        self
    }
}

/// User overrides read from `sketchbook.json`. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettingsOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub vsync: Option<bool>,
    pub show_fps: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {0:?}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("invalid settings in {0:?}: {1}")]
    Json(PathBuf, #[source] serde_json::Error),
}

/// Where the demo reads assets from and writes screenshots to.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub assets_dir: PathBuf,
    pub screenshot_dir: PathBuf,
    pub overrides: SettingsOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            screenshot_dir: PathBuf::from("screenshots"),
            overrides: SettingsOverrides::default(),
        }
    }
}

impl AppConfig {
    /// Configuration from the environment and `./sketchbook.json`.
    pub fn load() -> Self {
        Self::from_sources(
            std::env::var_os(ASSETS_ENV),
            std::env::var_os(SCREENSHOTS_ENV),
            Path::new(OVERRIDES_FILE),
        )
    }

    pub fn from_sources(
        assets: Option<OsString>,
        screenshots: Option<OsString>,
        overrides_path: &Path,
    ) -> Self {
        let mut config = Self::default();
        if let Some(dir) = assets.filter(|d| !d.is_empty()) {
            config.assets_dir = PathBuf::from(dir);
        }
        if let Some(dir) = screenshots.filter(|d| !d.is_empty()) {
            config.screenshot_dir = PathBuf::from(dir);
        }
        match read_overrides(overrides_path) {
            Ok(Some(overrides)) => {
                log::info!("Loaded window overrides from {:?}", overrides_path);
                config.overrides = overrides;
            }
            Ok(None) => {}
            Err(err) => log::warn!("Ignoring settings file: {}", err),
        }
        config
    }

    /// Demo defaults with the user's overrides applied on top.
    pub fn apply(&self, mut settings: WindowSettings) -> WindowSettings {
        if let Some(width) = self.overrides.width {
            settings.width = width.max(1);
        }
        if let Some(height) = self.overrides.height {
            settings.height = height.max(1);
        }
        if let Some(vsync) = self.overrides.vsync {
            settings.vsync = vsync;
        }
        if let Some(show_fps) = self.overrides.show_fps {
            settings.show_fps = show_fps;
        }
        settings
    }
}

/// `Ok(None)` when the file does not exist.
pub fn read_overrides(path: &Path) -> Result<Option<SettingsOverrides>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ConfigError::Io(path.to_path_buf(), err)),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|err| ConfigError::Json(path.to_path_buf(), err))
}

fn default_assets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sketchbook-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn defaults_point_at_bundled_assets() {
        let config = AppConfig::from_sources(None, None, Path::new("/nonexistent/sketchbook.json"));
        assert!(config.assets_dir.ends_with("assets"));
        assert_eq!(config.screenshot_dir, PathBuf::from("screenshots"));
        assert_eq!(config.overrides, SettingsOverrides::default());
    }

    #[test]
    fn environment_directories_win() {
        let config = AppConfig::from_sources(
            Some(OsString::from("/tmp/my-assets")),
            Some(OsString::from("/tmp/shots")),
            Path::new("/nonexistent/sketchbook.json"),
        );
        assert_eq!(config.assets_dir, PathBuf::from("/tmp/my-assets"));
        assert_eq!(config.screenshot_dir, PathBuf::from("/tmp/shots"));
    }

    #[test]
    fn empty_environment_values_are_ignored() {
        let config = AppConfig::from_sources(
            Some(OsString::new()),
            None,
            Path::new("/nonexistent/sketchbook.json"),
        );
        assert!(config.assets_dir.ends_with("assets"));
    }

    #[test]
    fn overrides_file_is_applied() {
        let path = scratch("overrides.json");
        fs::write(&path, r#"{ "width": 800, "vsync": false }"#).unwrap();

        let config = AppConfig::from_sources(None, None, &path);
        let settings = config.apply(WindowSettings::new("Snake", 600, 600));
        assert_eq!(settings.width, 800);
        assert_eq!(settings.height, 600);
        assert!(!settings.vsync);
        assert_eq!(settings.title, "Snake");
    }

    #[test]
    fn malformed_overrides_fall_back_to_defaults() {
        let path = scratch("broken.json");
        fs::write(&path, "{ width: ").unwrap();

        assert!(matches!(read_overrides(&path), Err(ConfigError::Json(..))));
        let config = AppConfig::from_sources(None, None, &path);
        assert_eq!(config.overrides, SettingsOverrides::default());
    }

    #[test]
    fn window_settings_builder() {
        let settings = WindowSettings::new("Tic-Tac-Toe", 330, 500).with_fps(true);
        assert_eq!((settings.width, settings.height), (330, 500));
        assert!(settings.show_fps);
        assert!(settings.resizable);
    }
}
