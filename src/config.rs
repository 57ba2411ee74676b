use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::smoothing::SmoothingMode;

/// Scale factors mapping the detector's wrist landmark into scene space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandSpace {
    pub x_scale: f32,
    pub y_scale: f32,
    pub z_scale: f32,
}

impl Default for HandSpace {
    fn default() -> Self {
        Self {
            x_scale: 10.0,
            y_scale: 8.0,
            z_scale: 5.0,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Gestures
    pub hold_threshold_ms: u64,
    pub extension_margin: f32,
    pub thumb_threshold: f32,
    pub dropout_grace_frames: u32,

    // Motion
    pub smoothing_factor: f32,
    pub smoothing_mode: SmoothingMode,
    pub rest_height: f32,
    pub base_scale: f32,
    pub hand_space: HandSpace,

    // Runtime
    pub frame_rate: u32,
    pub clip_dir: String,
    pub socket_path: String,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hold_threshold_ms: 3000,
            extension_margin: 0.05,
            thumb_threshold: 0.08,
            dropout_grace_frames: 0,
            smoothing_factor: 0.15,
            smoothing_mode: SmoothingMode::PerFrame,
            rest_height: -2.0,
            base_scale: 1.0,
            hand_space: HandSpace::default(),
            frame_rate: 60,
            clip_dir: dirs::data_dir()
                .unwrap_or_default()
                .join("handpuppet/clips")
                .to_string_lossy()
                .to_string(),
            socket_path: String::new(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                // Graceful degradation: log warning and use defaults
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn hold_threshold(&self) -> Duration {
        Duration::from_millis(self.hold_threshold_ms)
    }

    /// Tick period derived from the configured frame rate
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }

    /// Resolved IPC socket path
    pub fn socket_path(&self) -> PathBuf {
        if self.socket_path.is_empty() {
            crate::ipc::socket_path()
        } else {
            PathBuf::from(&self.socket_path)
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("handpuppet")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.hold_threshold_ms, 3000);
        assert_eq!(config.smoothing_factor, 0.15);
        assert_eq!(config.rest_height, -2.0);
        assert_eq!(config.smoothing_mode, SmoothingMode::PerFrame);
        assert_eq!(config.dropout_grace_frames, 0);
        assert_eq!(config.hand_space, HandSpace::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).expect("Failed to serialize");
        let restored: Config = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(config.hold_threshold_ms, restored.hold_threshold_ms);
        assert_eq!(config.clip_dir, restored.clip_dir);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let restored: Config =
            serde_json::from_str(r#"{"hold_threshold_ms": 1500}"#).expect("Failed to parse");
        assert_eq!(restored.hold_threshold(), Duration::from_millis(1500));
        assert_eq!(restored.frame_rate, 60);
    }

    #[test]
    fn test_config_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not valid json").unwrap();

        let config = Config::load_from(&path).expect("load should degrade gracefully");
        assert_eq!(config.hold_threshold_ms, 3000);
        assert!(!path.exists());
        assert!(dir.path().join("config.json.corrupt").exists());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested/config.json");

        let config = Config {
            frame_rate: 30,
            ..Config::default()
        };
        config.save_to(&path).expect("Failed to save");

        let loaded = Config::load_from(&path).expect("Failed to load");
        assert_eq!(loaded.frame_rate, 30);
        assert_eq!(loaded.frame_period(), Duration::from_secs_f64(1.0 / 30.0));
    }
}
