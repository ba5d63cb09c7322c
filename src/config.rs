//! User settings handling
//!
//! Manages settings from ~/.config/xo-gallery/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;
use crate::state::gallery::SortCriteria;

/// User settings from ~/.config/xo-gallery/settings.json
///
/// Every field has a default so partial files keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Generator output directory to browse
    pub output_dir: Option<PathBuf>,
    /// Last chosen grid order
    pub sort: SortCriteria,
    /// Seconds between automatic rescans
    pub refresh_interval_secs: u64,
    /// Hours a cached listing stays usable
    pub cache_max_age_hours: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: None,
            sort: SortCriteria::default(),
            refresh_interval_secs: 10,
            cache_max_age_hours: 24,
        }
    }
}

impl Settings {
    /// Get the path to the user settings file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Get the path to the xo-gallery config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("xo-gallery")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`; a missing or broken file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    debug!(path = %path.display(), "loaded user settings");
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings.json: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings.json: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        debug!(path = %path.display(), "saved user settings");
        Ok(())
    }

    /// Rescan period, never shorter than one second
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_hours * 60 * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.refresh_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            output_dir: Some(PathBuf::from("/tmp/output")),
            sort: SortCriteria::NameAsc,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_partial_and_broken_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(&path, r#"{ "sort": "type" }"#).unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(settings.sort, SortCriteria::Type);
        assert_eq!(settings.cache_max_age(), Duration::from_secs(24 * 60 * 60));

        fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_refresh_interval_floor() {
        let settings = Settings {
            refresh_interval_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.refresh_interval(), Duration::from_secs(1));
    }
}
