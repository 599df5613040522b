//! Composer configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[serde(default)]` on every section means a config file only needs the
//! keys it wants to change; everything else falls back to
//! `Default::default()`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::canvas::Device;

/// Main composer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editing session settings
    pub editor: EditorConfig,

    /// Document store settings
    pub store: StoreConfig,

    /// Export and preview settings
    pub export: ExportConfig,

    /// Keyboard settings
    pub keyboard: KeyboardConfig,
}

impl Config {
    /// Loads config from the default location.
    pub fn load() -> Self {
        Self::load_from_default_path().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default config: {}", e);
            Self::default()
        })
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("composer").join("config.toml"))
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the documents directory, honoring the store override.
    pub fn documents_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.store.directory {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(data_dir.join("composer").join("documents"))
    }
}

/// Editing session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo snapshots, unbounded if unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,

    /// Device preview the canvas opens with
    pub default_device: Device,

    /// How long a notification toast stays up (ms)
    pub toast_duration_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            default_device: Device::Desktop,
            toast_duration_ms: 2500,
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Overrides `<data dir>/composer/documents`
    pub directory: Option<PathBuf>,
}

/// Export and preview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Tags placed in the `<head>` of the preview page
    pub stylesheets: Vec<String>,

    /// Body width of the preview page (px)
    pub max_width_px: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            stylesheets: vec![
                r#"<link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap" rel="stylesheet">"#.to_string(),
                r#"<link href="https://fonts.googleapis.com/css2?family=Material+Symbols+Outlined:wght,FILL@100..700,0..1&display=swap" rel="stylesheet">"#.to_string(),
                r#"<script src="https://cdn.tailwindcss.com"></script>"#.to_string(),
            ],
            max_width_px: 800,
        }
    }
}

/// Keyboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Custom key bindings, `"ctrl+s" = "composer.save"`
    pub bindings: HashMap<String, String>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.history_limit, None);
        assert_eq!(config.editor.default_device, Device::Desktop);
        assert_eq!(config.export.max_width_px, 800);
        assert_eq!(config.export.stylesheets.len(), 3);
        assert!(config.keyboard.bindings.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.editor.history_limit, config.editor.history_limit);
        assert_eq!(parsed.export.stylesheets, config.export.stylesheets);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [editor]
            default_device = "mobile"
            history_limit = 50

            [keyboard.bindings]
            "ctrl+d" = "composer.duplicate"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.editor.default_device, Device::Mobile);
        assert_eq!(parsed.editor.history_limit, Some(50));
        assert_eq!(parsed.editor.toast_duration_ms, 2500);
        assert_eq!(
            parsed.keyboard.bindings.get("ctrl+d").map(String::as_str),
            Some("composer.duplicate")
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\ndirectory = \"/tmp/docs\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.documents_dir().unwrap(), PathBuf::from("/tmp/docs"));
    }

    #[test]
    fn test_load_from_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor\nhistory_limit = ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
