//! UI session state persistence
//!
//! Session state is "where I was": window size, the last buffer capacity
//! picked in the toolbar and the last export directory. It is written
//! automatically on exit and is never meant to be edited by hand, unlike
//! `config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{app_data_dir, ensure_app_data_dir};
use crate::error::{Result, SerialVisError};

/// UI session state filename
pub const UI_SESSION_FILE: &str = "ui_session.json";

/// UI session state persisted between app launches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSessionState {
    /// Version for migration
    #[serde(default = "default_version")]
    pub version: u32,

    /// Window state
    #[serde(default)]
    pub window: WindowState,

    /// Capacity selected when the app last closed
    #[serde(default)]
    pub capacity: Option<usize>,

    /// Directory of the last successful export
    #[serde(default)]
    pub last_export_dir: Option<PathBuf>,
}

fn default_version() -> u32 {
    1
}

impl Default for UiSessionState {
    fn default() -> Self {
        Self {
            version: 1,
            window: WindowState::default(),
            capacity: None,
            last_export_dir: None,
        }
    }
}

impl UiSessionState {
    /// Load UI session state from default location
    pub fn load() -> Self {
        match app_data_dir() {
            Some(dir) => Self::load_from(dir.join(UI_SESSION_FILE)),
            None => Self::default(),
        }
    }

    /// Load from an explicit path, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => {
                    tracing::info!("Loaded UI session state from {:?}", path);
                    state
                }
                Err(e) => {
                    tracing::warn!("Failed to parse UI session state: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read UI session state: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save UI session state to default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(UI_SESSION_FILE))
    }

    /// Save to an explicit path
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            SerialVisError::Serialization(format!("Failed to serialize UI session: {}", e))
        })?;

        std::fs::write(path, content)
            .map_err(|e| SerialVisError::Config(format!("Failed to write UI session: {}", e)))?;

        tracing::debug!("Saved UI session state to {:?}", path);
        Ok(())
    }

    /// Remember the directory of an exported file
    pub fn remember_export(&mut self, exported_file: &Path) {
        self.last_export_dir = exported_file.parent().map(Path::to_path_buf);
    }
}

/// Window size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    /// Inner size (width, height) in points
    #[serde(default = "default_window_size")]
    pub size: (f32, f32),
}

fn default_window_size() -> (f32, f32) {
    (800.0, 600.0)
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            size: default_window_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(UI_SESSION_FILE);

        let mut state = UiSessionState {
            capacity: Some(7000),
            ..Default::default()
        };
        state.remember_export(&dir.path().join("capture.csv"));
        state.save_to(&path).unwrap();

        let loaded = UiSessionState::load_from(&path);
        assert_eq!(loaded, state);
        assert_eq!(loaded.last_export_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(UI_SESSION_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(UiSessionState::load_from(&path), UiSessionState::default());
    }

    #[test]
    fn test_old_file_without_new_fields() {
        let state: UiSessionState = serde_json::from_str(r#"{"version":1}"#).unwrap();
        assert_eq!(state.capacity, None);
        assert_eq!(state.window.size, (800.0, 600.0));
    }
}
