//! Configuration module for SerialVis-RS
//!
//! This module handles:
//! - The user-edited configuration file (`config.toml`): serial link,
//!   channels, routing and display settings
//! - UI session state (`ui_session.json`), written automatically on exit
//!
//! # App Data Location
//!
//! Both files live in the platform data directory under
//! `dev.serialvis.serialvis-rs`:
//!
//! - **Linux**: `~/.local/share/dev.serialvis.serialvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.serialvis.serialvis-rs/`
//! - **Windows**: `%APPDATA%\dev.serialvis.serialvis-rs\`
//!
//! A config path given on the command line takes precedence.

pub mod settings;
pub mod ui_session;

pub use settings::*;
pub use ui_session::{UiSessionState, WindowState, UI_SESSION_FILE};

use crate::error::{Result, SerialVisError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.serialvis.serialvis-rs";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        SerialVisError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            SerialVisError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the default config file
pub fn default_config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== App Config ====================

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Serial link
    #[serde(default)]
    pub serial: SerialConfig,

    /// Pipeline and channels
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Display
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| SerialVisError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SerialVisError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` (or the default location), returning defaults on any
    /// error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Self::default(),
            },
        };

        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Write as TOML to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SerialVisError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| SerialVisError::Config(format!("Failed to write config: {}", e)))
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let capture = &self.capture;

        if capture.capacity_presets.is_empty() {
            return Err(SerialVisError::Config(
                "capacity_presets must not be empty".to_string(),
            ));
        }
        if capture.capacity_presets.contains(&0) || capture.default_capacity == 0 {
            return Err(SerialVisError::InvalidCapacity(0));
        }
        if capture.preset_index(capture.default_capacity).is_none() {
            return Err(SerialVisError::Config(format!(
                "default_capacity {} is not one of the capacity presets",
                capture.default_capacity
            )));
        }

        let mut seen = HashSet::new();
        for channel in &capture.channels {
            if channel.tag.trim().is_empty() {
                return Err(SerialVisError::Config("channel tag must not be empty".to_string()));
            }
            if !seen.insert(channel.tag.as_str()) {
                return Err(SerialVisError::DuplicateTag(channel.tag.clone()));
            }
        }

        if self.serial.baud_rate == 0 {
            return Err(SerialVisError::Config("baud_rate must be positive".to_string()));
        }
        if self.serial.max_line_len == 0 {
            return Err(SerialVisError::Config("max_line_len must be positive".to_string()));
        }

        Ok(())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::RoutingMode;

    #[test]
    fn test_default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn test_parse_full_document() {
        let config = AppConfig::from_toml_str(
            r#"
            [serial]
            port = "/dev/ttyUSB0"
            baud_rate = 500000

            [capture]
            routing = "position"
            allowed_tags = ["T", "V", "I", "P"]

            [[capture.channels]]
            tag = "T"
            color = [255, 0, 0, 255]

            [[capture.channels]]
            tag = "V"

            [ui]
            layout = "grid"
            "#,
        )
        .unwrap();

        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 500_000);
        assert_eq!(config.capture.routing, RoutingMode::ByPosition);
        assert_eq!(config.capture.channels.len(), 2);
        assert_eq!(config.capture.channels[0].color, Some([255, 0, 0, 255]));
        assert_eq!(config.capture.default_capacity, 1000);
        assert_eq!(config.ui.layout, PlotLayout::Grid);
    }

    #[test]
    fn test_duplicate_channel_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
            [[capture.channels]]
            tag = "T"
            [[capture.channels]]
            tag = "T"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SerialVisError::DuplicateTag(_)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = AppConfig::from_toml_str("[capture]\ncapacity_presets = [0, 10]\ndefault_capacity = 10")
            .unwrap_err();
        assert!(matches!(err, SerialVisError::InvalidCapacity(0)));
    }

    #[test]
    fn test_default_capacity_must_be_a_preset() {
        assert!(AppConfig::from_toml_str("[capture]\ndefault_capacity = 1234").is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[serial\nport=").unwrap_err();
        assert!(matches!(err, SerialVisError::Config(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.serial.port = "COM7".to_string();
        config.capture.export_limit = Some(50_000);
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_load_or_default_swallows_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "not = [valid").unwrap();
        assert_eq!(AppConfig::load_or_default(Some(&path)), AppConfig::default());
    }
}
