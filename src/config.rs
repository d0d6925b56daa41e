//! Renderer configuration
//!
//! Uses RON (Rusty Object Notation). Every field has a default, so a config
//! file only needs the values it overrides.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

use crate::rasterizer::{Color, CullMode, HEIGHT, WIDTH};

/// Config file looked up in the working directory at startup
pub const CONFIG_PATH: &str = "softraster.ron";

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Window collaborator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "3D Renderer".to_string(),
            width: WIDTH,
            height: HEIGHT,
            resizable: true,
        }
    }
}

/// Camera and animation parameters for the spinning cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub clear_color: Color,
    pub cull_mode: CullMode,
    /// Uniform model scale
    pub scale: f32,
    /// Model translation along -Z, in view units
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    pub fov_y_degrees: f32,
    /// Radians per second for the ZX rotation
    pub rotation_rate: f32,
    /// XY rotation speed relative to the ZX rotation
    pub secondary_rate: f32,
    pub wireframe: bool,
    pub wireframe_color: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::BACKGROUND,
            cull_mode: CullMode::Clockwise,
            scale: 0.5,
            distance: 5.0,
            near: 0.01,
            far: 10.0,
            fov_y_degrees: 60.0,
            rotation_rate: 1.0,
            secondary_rate: 1.61,
            wireframe: false,
            wireframe_color: Color::WHITE,
        }
    }
}

/// Where user-triggered exports land
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub tga_path: PathBuf,
    pub png_path: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tga_path: PathBuf::from("test.tga"),
            png_path: PathBuf::from("screenshot.png"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub window: WindowConfig,
    pub scene: SceneConfig,
    pub capture: CaptureConfig,
    /// `env_logger` filter; `RUST_LOG` is used when unset
    pub log_filter: Option<String>,
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Parse a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<RenderConfig, ConfigError> {
    Ok(ron::from_str(s)?)
}

/// Save a config to a RON file (for producing a template)
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load `path` if it exists, falling back to defaults.
///
/// Returns the config plus the error that forced a fallback, so the caller can
/// report it once logging is up.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> (RenderConfig, Option<ConfigError>) {
    let path = path.as_ref();
    if !path.exists() {
        return (RenderConfig::default(), None);
    }
    match load_config(path) {
        Ok(config) => (config, None),
        Err(e) => (RenderConfig::default(), Some(e)),
    }
}
