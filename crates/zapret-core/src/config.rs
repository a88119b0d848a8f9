//! Application configuration and state persistence

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result};
use crate::layout::InstallLayout;

/// Config file name inside the app directory
pub const CONFIG_FILE: &str = "zapret_gui_config.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// UI theme name
    pub theme: String,
    /// Check for a newer release on startup
    pub check_updates: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            check_updates: true,
        }
    }
}

impl AppConfig {
    /// Keys accepted by [`get`](Self::get) and [`set`](Self::set)
    pub const KEYS: &'static [&'static str] = &["theme", "check_updates"];

    /// Get config file path
    pub fn config_path(layout: &InstallLayout) -> PathBuf {
        layout.app_dir().join(CONFIG_FILE)
    }

    /// Load configuration from file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|s| serde_json::from_str(&s).map_err(Error::from))
        {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring unreadable config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a value as a string
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "theme" => Ok(self.theme.clone()),
            "check_updates" => Ok(self.check_updates.to_string()),
            _ => Err(Error::UnknownConfigKey {
                key: key.to_string(),
            }),
        }
    }

    /// Update a value from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "theme" => {
                if !matches!(value, "dark" | "light" | "auto") {
                    return Err(Error::config_value(key, "expected dark, light or auto"));
                }
                self.theme = value.to_string();
            }
            "check_updates" => {
                self.check_updates = value
                    .parse()
                    .map_err(|_| Error::config_value(key, "expected true or false"))?;
            }
            _ => {
                return Err(Error::UnknownConfigKey {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing_or_broken() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        assert_eq!(AppConfig::load(&path), AppConfig::default());

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load(&path), AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"theme": "light"}"#).unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.theme, "light");
        assert!(config.check_updates);
    }

    #[test]
    fn test_set_and_save() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("app").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.set("check_updates", "false").unwrap();
        config.set("theme", "light").unwrap();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path);
        assert_eq!(loaded.get("check_updates").unwrap(), "false");
        assert_eq!(loaded.get("theme").unwrap(), "light");
    }

    #[test]
    fn test_invalid_values() {
        let mut config = AppConfig::default();
        assert!(config.set("theme", "purple").is_err());
        assert!(config.set("check_updates", "maybe").is_err());
        assert!(matches!(
            config.set("nope", "x"),
            Err(Error::UnknownConfigKey { .. })
        ));
    }
}
