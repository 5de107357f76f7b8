use crate::domain::AutoConnect;
use crate::domain::mindmap::DEFAULT_AUTO_CONNECT_DISTANCE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// User configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// One of trace, debug, info, warn, error, off
    pub log_level: String,
    /// Connect nodes automatically when placed near each other
    pub auto_connect: bool,
    /// Center-to-center distance used by auto-connect
    pub auto_connect_distance: f64,
    /// Desktop notification when a pomodoro session ends
    pub notifications: bool,
    /// How long status messages stay visible
    pub toast_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            auto_connect: true,
            auto_connect_distance: DEFAULT_AUTO_CONNECT_DISTANCE,
            notifications: true,
            toast_seconds: 4,
        }
    }
}

impl Config {
    pub fn auto_connect_settings(&self) -> AutoConnect {
        AutoConnect {
            enabled: self.auto_connect,
            distance: self.auto_connect_distance,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.auto_connect_distance.is_finite() || self.auto_connect_distance <= 0.0 {
            anyhow::bail!(
                "auto_connect_distance must be a positive number, got {}",
                self.auto_connect_distance
            );
        }
        Ok(())
    }
}

/// Path to config.json inside the data directory
pub fn config_file(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Load configuration; a missing file yields the defaults
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to config.json
pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}
