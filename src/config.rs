//! Configuration file support.
//!
//! Settings load from `./facelift.toml`, then from the user config
//! directory (`facelift/config.toml`), and command-line arguments merge
//! over whatever the file provided.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::EnhanceOptions;

// ============================================================
// Constants
// ============================================================

/// Config file looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "facelift.toml";

/// Config file path under the user config directory
const USER_CONFIG_FILE: &str = "facelift/config.toml";

/// Default detector model file name (SeetaFace frontal)
pub const DEFAULT_DETECTOR_MODEL: &str = "seeta_fd_frontal_v1.0.bin";

// ============================================================
// Error Types
// ============================================================

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ============================================================
// Config
// ============================================================

/// Tool configuration, file-backed with CLI overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Unsharp-mask sharpen amount
    pub sharpen: f32,
    /// Requested super-resolution scale factor
    pub sr_scale: f32,
    /// SeetaFace detector model path
    pub detector_model: PathBuf,
    /// Super-resolution model path; bicubic-only when absent
    pub sr_model: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sharpen: 1.0,
            sr_scale: 2.0,
            detector_model: PathBuf::from(DEFAULT_DETECTOR_MODEL),
            sr_model: None,
        }
    }
}

impl Config {
    /// Load from the standard locations, or defaults when no file exists.
    pub fn load() -> Result<Self> {
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from_path(local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join(USER_CONFIG_FILE);
            if user.exists() {
                return Self::load_from_path(&user);
            }
        }

        Ok(Self::default())
    }

    /// Load from an explicit path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Merge CLI arguments over file values. CLI takes precedence.
    pub fn merge_with_cli(&self, overrides: &CliOverrides) -> Config {
        Config {
            sharpen: overrides.sharpen.unwrap_or(self.sharpen),
            sr_scale: overrides.sr_scale.unwrap_or(self.sr_scale),
            detector_model: overrides
                .detector_model
                .clone()
                .unwrap_or_else(|| self.detector_model.clone()),
            sr_model: overrides.sr_model.clone().or_else(|| self.sr_model.clone()),
        }
    }

    /// Pipeline options derived from this config.
    pub fn enhance_options(&self) -> EnhanceOptions {
        EnhanceOptions::builder()
            .sharpen_amount(self.sharpen)
            .sr_scale(self.sr_scale)
            .build()
    }
}

/// Values explicitly set on the command line.
///
/// `None` means "not given"; the config file value stands.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub sharpen: Option<f32>,
    pub sr_scale: Option<f32>,
    pub detector_model: Option<PathBuf>,
    pub sr_model: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}
