//! Application configuration

use anyhow::{Context, Result};
use dwmstat_core::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_MIN_TIME, DEFAULT_PADDING, DEFAULT_SEPARATOR, DEFAULT_SOCKET_PATH,
};
use dwmstat_types::{
    BatteryModuleConfig, DateModuleConfig, ExternalModuleConfig, ModuleConfig, SinkConfig,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{BarFormat, SchedulerConfig};

/// Current version of the config format
pub const CONFIG_VERSION: u32 = 1;

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// Placed between two module outputs
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Placed before the first and after the last output
    #[serde(default = "default_padding")]
    pub padding: String,
    /// Module updates collected before the bar is redrawn
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Longest wait for a batch to fill, in milliseconds
    #[serde(default = "default_min_time_ms")]
    pub min_time_ms: u64,
    /// Unix socket on which signals are accepted
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    #[serde(default)]
    pub sink: SinkConfig,
    /// Modules in display order
    #[serde(default = "default_modules")]
    pub modules: Vec<ModuleConfig>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_padding() -> String {
    DEFAULT_PADDING.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_min_time_ms() -> u64 {
    DEFAULT_MIN_TIME.as_millis() as u64
}

fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}

/// Date, battery and a signal-driven volume script
fn default_modules() -> Vec<ModuleConfig> {
    vec![
        ModuleConfig::Date(DateModuleConfig::default()),
        ModuleConfig::Battery(BatteryModuleConfig::for_device("BAT1")),
        ModuleConfig::External(ExternalModuleConfig::master_volume()),
    ]
}

impl AppConfig {
    /// Load configuration from disk, falling back to the defaults when no
    /// config file exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            log::info!("No config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)?;
        Ok(config_path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "dwmstat", "dwmstat")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;

        if config.version > CONFIG_VERSION {
            log::warn!(
                "Config {:?} has version {}, newer than supported version {}",
                path,
                config.version,
                CONFIG_VERSION
            );
        }
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    pub fn min_time(&self) -> Duration {
        Duration::from_millis(self.min_time_ms)
    }

    /// Scheduler settings described by this config
    pub fn to_scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            format: BarFormat::new(self.separator.clone(), self.padding.clone()),
            batch_size: self.batch_size,
            min_time: self.min_time(),
            ..SchedulerConfig::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            separator: default_separator(),
            padding: default_padding(),
            batch_size: default_batch_size(),
            min_time_ms: default_min_time_ms(),
            socket_path: default_socket_path(),
            sink: SinkConfig::default(),
            modules: default_modules(),
        }
    }
}
