//! Battery module configuration types.

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleConfig;

fn default_device() -> String {
    "BAT1".to_string()
}

fn default_power_supply_dir() -> String {
    "/sys/class/power_supply".to_string()
}

/// Battery module configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryModuleConfig {
    #[serde(flatten)]
    pub schedule: ScheduleConfig,
    /// Device directory name under the power supply class, e.g. `BAT0`
    #[serde(default = "default_device")]
    pub device: String,
    #[serde(default = "default_power_supply_dir")]
    pub power_supply_dir: String,
}

impl BatteryModuleConfig {
    pub fn for_device(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Self::default()
        }
    }
}

impl Default for BatteryModuleConfig {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            device: default_device(),
            power_supply_dir: default_power_supply_dir(),
        }
    }
}
