//! Battery module implementation
//!
//! Reads capacity and charging status of one battery from the kernel's
//! power supply class in sysfs.

use anyhow::{Context, Result};
use dwmstat_core::constants::*;
use dwmstat_core::{Module, ModuleMetadata, Schedule};
use dwmstat_types::BatteryModuleConfig;
use std::path::PathBuf;
use std::time::Duration;

const STAT_FULL: &str = "Full";
const STAT_CHARGING: &str = "Charging";

/// Battery module
///
/// Displays the percentage capacity of the battery and whether it is
/// charging or full.
pub struct BatteryModule {
    metadata: ModuleMetadata,
    schedule: Schedule,
    device_dir: PathBuf,
}

impl BatteryModule {
    pub fn new(config: BatteryModuleConfig) -> Self {
        let metadata = ModuleMetadata {
            id: "battery".to_string(),
            description: "Battery capacity and charging status".to_string(),
            default_interval: Some(Duration::from_secs(30)),
        };
        let schedule = Schedule::resolve(&config.schedule, "battery", metadata.default_interval);
        let device_dir = PathBuf::from(&config.power_supply_dir).join(&config.device);

        Self {
            metadata,
            schedule,
            device_dir,
        }
    }

    /// Read `(capacity, status)` from sysfs, both trimmed
    fn read_state(&self) -> Result<(String, String)> {
        let capacity_path = self.device_dir.join("capacity");
        let status_path = self.device_dir.join("status");
        let capacity = std::fs::read_to_string(&capacity_path)
            .with_context(|| format!("reading {:?}", capacity_path))?;
        let status = std::fs::read_to_string(&status_path)
            .with_context(|| format!("reading {:?}", status_path))?;
        Ok((capacity.trim().to_string(), status.trim().to_string()))
    }
}

impl Module for BatteryModule {
    fn metadata(&self) -> &ModuleMetadata {
        &self.metadata
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn execute(&mut self) -> String {
        match self.read_state() {
            Ok((capacity, status)) => {
                format!("{} {}%", battery_icon(&capacity, &status), capacity)
            }
            Err(e) => {
                log::error!("{}: {:#}", BAT_MOD_ERR, e);
                BAT_MOD_ERR.to_string()
            }
        }
    }
}

/// Pick an icon for the battery from its capacity and status
///
/// An unparsable capacity counts as empty.
pub fn battery_icon(capacity: &str, status: &str) -> &'static str {
    let capacity: i64 = capacity.parse().unwrap_or(0);

    if status == STAT_CHARGING {
        return match capacity {
            0..=20 => ICO_BAT_C20,
            21..=40 => ICO_BAT_C40,
            41..=60 => ICO_BAT_C60,
            61..=80 => ICO_BAT_C80,
            _ => ICO_BAT_C90,
        };
    }
    if status == STAT_FULL {
        return ICO_BAT_FULL;
    }

    match capacity {
        0..=5 => ICO_BAT_00,
        6..=10 => ICO_BAT_10,
        11..=20 => ICO_BAT_20,
        21..=30 => ICO_BAT_30,
        31..=40 => ICO_BAT_40,
        41..=50 => ICO_BAT_50,
        51..=60 => ICO_BAT_60,
        61..=70 => ICO_BAT_70,
        71..=80 => ICO_BAT_80,
        81..=90 => ICO_BAT_90,
        _ => ICO_BAT_100,
    }
}
