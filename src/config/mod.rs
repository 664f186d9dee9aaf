// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// Log level
    pub log_level: String,

    /// Enable demo mode (simulated camera that always grants access)
    pub demo_mode: bool,

    /// Remote alert endpoint
    pub reporting: ReportingConfig,

    /// Stats refresh ticker
    pub ticker: TickerConfig,

    /// Local alert cue
    pub alerts: AlertConfig,

    /// Notification banners
    pub notifications: NotificationConfig,

    /// Camera permission probe
    pub permission: PermissionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "DrowseWatch".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            demo_mode: false,
            reporting: ReportingConfig::default(),
            ticker: TickerConfig::default(),
            alerts: AlertConfig::default(),
            notifications: NotificationConfig::default(),
            permission: PermissionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("drowsewatch"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Remote alert endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Scheme, host and port of the hosting site
    pub base_url: String,

    /// Path of the alert endpoint
    pub alert_path: String,

    /// Cookie holding the anti-forgery token
    pub csrf_cookie: String,

    /// Header the token is forwarded in
    pub csrf_header: String,

    /// Raw `Cookie` header contents handed over by the hosting page
    pub cookies: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            alert_path: "/api/drowsiness-alert/".to_string(),
            csrf_cookie: "csrftoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            cookies: None,
            timeout_secs: 10,
        }
    }
}

impl ReportingConfig {
    /// Full URL of the alert endpoint
    pub fn alert_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.alert_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Stats refresh ticker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Refresh period in milliseconds
    pub interval_ms: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

impl TickerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Local alert cue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Play the audible cue
    pub sound_enabled: bool,

    /// Tone frequency in Hz
    pub tone_frequency_hz: f32,

    /// Tone length in milliseconds
    pub tone_duration_ms: u64,

    /// Gain at tone start
    pub tone_start_gain: f32,

    /// Gain at tone end
    pub tone_end_gain: f32,

    /// How long the visual alert stays up
    pub visual_duration_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            tone_frequency_hz: 800.0,
            tone_duration_ms: 500,
            tone_start_gain: 0.3,
            tone_end_gain: 0.01,
            visual_duration_ms: 3000,
        }
    }
}

/// Notification banner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Lifetime of banners that do not specify one
    pub default_duration_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 5000,
        }
    }
}

/// Camera permission probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    /// Capture device node probed before a session starts
    pub device_path: PathBuf,

    /// Give up waiting for the device after this many milliseconds
    pub timeout_ms: Option<u64>,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from("/dev/video0"),
            timeout_ms: None,
        }
    }
}

impl PermissionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_endpoint_contract() {
        let config = Config::default();
        assert_eq!(
            config.reporting.alert_url(),
            "http://127.0.0.1:8000/api/drowsiness-alert/"
        );
        assert_eq!(config.reporting.csrf_cookie, "csrftoken");
        assert_eq!(config.ticker.interval(), Duration::from_secs(1));
        assert_eq!(config.alerts.visual_duration_ms, 3000);
    }

    #[test]
    fn test_alert_url_joins_slashes() {
        let reporting = ReportingConfig {
            base_url: "https://example.org/".to_string(),
            alert_path: "api/drowsiness-alert/".to_string(),
            ..ReportingConfig::default()
        };
        assert_eq!(reporting.alert_url(), "https://example.org/api/drowsiness-alert/");
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.app_name, created.app_name);
        assert_eq!(loaded.reporting.timeout_secs, 10);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "demo_mode = true\n[ticker]\ninterval_ms = 250\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.demo_mode);
        assert_eq!(config.ticker.interval_ms, 250);
        assert_eq!(config.alerts.tone_frequency_hz, 800.0);
    }
}
