//! Memory module configuration types.

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleConfig;

/// What the memory module shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MemoryField {
    /// Used RAM as a percentage of total
    #[default]
    Percent,
    /// Used and total RAM in GiB
    Used,
    /// Used swap as a percentage of total swap
    SwapPercent,
}

/// Memory module configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryModuleConfig {
    #[serde(flatten)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub field: MemoryField,
}
