//! CPU module configuration types.

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleConfig;

/// CPU usage module configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuModuleConfig {
    #[serde(flatten)]
    pub schedule: ScheduleConfig,
    /// Digits after the decimal point
    #[serde(default)]
    pub precision: usize,
}
