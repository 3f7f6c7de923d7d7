use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ui::theme::ThemeMode;
use crate::visibility::{DEFAULT_MARGIN, DEFAULT_THRESHOLD};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    pub version: u32,
    pub theme: ThemeMode,
    /// Logical pixels around the window within which tiles count as visible.
    #[serde(default = "default_margin")]
    pub proximity_margin: f32,
    /// Fraction of a tile that must be inside the margin before it mounts.
    #[serde(default = "default_threshold")]
    pub visibility_threshold: f32,
    #[serde(default = "default_true")]
    pub allow_fullscreen: bool,
    /// Decoded frames wider than this are scaled down.
    #[serde(default = "default_decode_width")]
    pub max_decode_width: u32,
}

fn default_margin() -> f32 {
    DEFAULT_MARGIN
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_true() -> bool {
    true
}

fn default_decode_width() -> u32 {
    1280
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            version: 1,
            theme: ThemeMode::detect(),
            proximity_margin: DEFAULT_MARGIN,
            visibility_threshold: DEFAULT_THRESHOLD,
            allow_fullscreen: true,
            max_decode_width: default_decode_width(),
        }
    }
}

impl SettingsConfig {
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("showreel").join("settings.json"))
    }

    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str::<Self>(&json)
                .map(Self::sanitized)
                .unwrap_or_else(|e| {
                    log::warn!("Ignoring invalid settings {}: {e}", path.display());
                    Self::default()
                }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) {
        let Some(path) = Self::path() else {
            return;
        };
        if let Err(e) = self.save_to(&path) {
            log::warn!("Failed to save settings: {e:#}");
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    fn sanitized(mut self) -> Self {
        if !self.proximity_margin.is_finite() || self.proximity_margin < 0.0 {
            self.proximity_margin = DEFAULT_MARGIN;
        }
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            self.visibility_threshold = DEFAULT_THRESHOLD;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_lazy_load_policy() {
        let s = SettingsConfig::default();
        assert!((s.proximity_margin - 100.0).abs() < 1e-6);
        assert!((s.visibility_threshold - 0.1).abs() < 1e-6);
        assert!(s.allow_fullscreen);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = SettingsConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(s.version, 1);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut s = SettingsConfig::default();
        s.theme = ThemeMode::Light;
        s.proximity_margin = 250.0;
        s.allow_fullscreen = false;
        s.save_to(&path).unwrap();

        let loaded = SettingsConfig::load_from(&path);
        assert_eq!(loaded.theme, ThemeMode::Light);
        assert!((loaded.proximity_margin - 250.0).abs() < 1e-6);
        assert!(!loaded.allow_fullscreen);
    }

    #[test]
    fn older_files_get_new_fields_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"version":1,"theme":"Dark"}"#).unwrap();
        let s = SettingsConfig::load_from(&path);
        assert!((s.visibility_threshold - 0.1).abs() < 1e-6);
        assert_eq!(s.max_decode_width, 1280);
    }

    #[test]
    fn out_of_range_values_are_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"version":1,"theme":"Dark","proximity_margin":-5,"visibility_threshold":3}"#,
        )
        .unwrap();
        let s = SettingsConfig::load_from(&path);
        assert!((s.proximity_margin - 100.0).abs() < 1e-6);
        assert!((s.visibility_threshold - 0.1).abs() < 1e-6);
    }

    #[test]
    fn invalid_json_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(SettingsConfig::load_from(&path).version, 1);
    }
}
