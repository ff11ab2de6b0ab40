// ═══════════════════════════════════════════════════════════════════════════════
// 📦 config.rs - Application Configuration
// ═══════════════════════════════════════════════════════════════════════════════
// JSON configuration with defaults for every section.
// ملف إعدادات JSON مع قيم افتراضية لكل قسم
// ═══════════════════════════════════════════════════════════════════════════════

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::admin::DEFAULT_PASSWORD;
use crate::controller::{Timing, DEFAULT_SHUTOFF_SECS, DEFAULT_WARNING_SECS};
use crate::detectors::Thresholds;
use crate::error::{Error, Result};
use crate::sources::SerialSettings;
use crate::summary::DEFAULT_SUMMARY_DAYS;

/// Default config file name / اسم ملف الإعدادات الافتراضي
pub const DEFAULT_CONFIG_PATH: &str = "presence_config.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub controller: ControllerConfig,
    pub detection: Thresholds,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub serial: SerialSettings,
    pub ui: UiConfig,
}

/// Timeout thresholds in seconds / عتبات المهلة بالثواني
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub warning_after_secs: f64,
    pub shutoff_after_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Appliance activity log (CSV)
    pub log_file: PathBuf,
    /// Diagnostic log written by tracing
    pub diagnostics_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub default_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_ms: u64,
    pub summary_days: usize,
    pub live_log_rows: usize,
    /// Points kept in the detection feed chart
    pub feed_points: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            warning_after_secs: DEFAULT_WARNING_SECS,
            shutoff_after_secs: DEFAULT_SHUTOFF_SECS,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("appliance_logs.csv"),
            diagnostics_file: PathBuf::from("presence.log"),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            default_password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            summary_days: DEFAULT_SUMMARY_DAYS,
            live_log_rows: 10,
            feed_points: 120,
        }
    }
}

impl AppConfig {
    /// Load the config, writing defaults back when the file is missing.
    ///
    /// A file that fails to parse is left untouched and defaults are used.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path)?;
            match serde_json::from_str::<AppConfig>(&content) {
                Ok(c) => {
                    info!(path = %path.display(), "loaded configuration");
                    c
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "bad configuration, using defaults");
                    Self::default()
                }
            }
        } else {
            info!(path = %path.display(), "configuration not found, creating default");
            let config = Self::default();
            config.save(path)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.controller;
        if !(c.warning_after_secs >= 0.0 && c.warning_after_secs < c.shutoff_after_secs) {
            return Err(Error::InvalidConfig(format!(
                "warning_after_secs ({}) must be below shutoff_after_secs ({})",
                c.warning_after_secs, c.shutoff_after_secs
            )));
        }
        if self.ui.tick_ms == 0 {
            return Err(Error::InvalidConfig("tick_ms must be positive".to_string()));
        }
        if self.admin.default_password.is_empty() {
            return Err(Error::InvalidConfig(
                "default_password must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timing(&self) -> Timing {
        Timing::from_secs(
            self.controller.warning_after_secs,
            self.controller.shutoff_after_secs,
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presence_config.json");

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
        assert_eq!(config.timing(), Timing::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{ "controller": { "warning_after_secs": 3.0 }, "ui": { "tick_ms": 100 } }"#)
            .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.controller.warning_after_secs, 3.0);
        assert_eq!(config.controller.shutoff_after_secs, DEFAULT_SHUTOFF_SECS);
        assert_eq!(config.ui.tick_ms, 100);
        assert_eq!(config.detection.motion_pixels, 5000);
    }

    #[test]
    fn test_broken_file_uses_defaults_and_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, "{ not json").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.controller.warning_after_secs = 20.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = AppConfig::default();
        config.ui.tick_ms = 0;
        assert!(config.validate().is_err());
    }
}
