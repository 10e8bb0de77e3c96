//! Module configuration types for all built-in modules.

pub mod battery;
pub mod cpu;
pub mod date;
pub mod external;
pub mod memory;
pub mod static_text;

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleConfig;

// Re-export all module config types for convenience
pub use battery::BatteryModuleConfig;
pub use cpu::CpuModuleConfig;
pub use date::DateModuleConfig;
pub use external::{ExternalKind, ExternalModuleConfig, PostProcess};
pub use memory::{MemoryField, MemoryModuleConfig};
pub use static_text::StaticTextModuleConfig;

/// Type-safe enum for all module configurations.
/// Uses serde tag for JSON serialization: {"module_type": "date", ...}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "module_type")]
pub enum ModuleConfig {
    #[serde(rename = "date")]
    Date(DateModuleConfig),

    #[serde(rename = "battery")]
    Battery(BatteryModuleConfig),

    #[serde(rename = "memory")]
    Memory(MemoryModuleConfig),

    #[serde(rename = "cpu")]
    Cpu(CpuModuleConfig),

    #[serde(rename = "external")]
    External(ExternalModuleConfig),

    #[serde(rename = "static_text")]
    StaticText(StaticTextModuleConfig),
}

impl ModuleConfig {
    /// Get the module type ID string
    pub fn module_type(&self) -> &'static str {
        match self {
            ModuleConfig::Date(_) => "date",
            ModuleConfig::Battery(_) => "battery",
            ModuleConfig::Memory(_) => "memory",
            ModuleConfig::Cpu(_) => "cpu",
            ModuleConfig::External(_) => "external",
            ModuleConfig::StaticText(_) => "static_text",
        }
    }

    /// Scheduling overrides shared by every variant
    pub fn schedule(&self) -> &ScheduleConfig {
        match self {
            ModuleConfig::Date(c) => &c.schedule,
            ModuleConfig::Battery(c) => &c.schedule,
            ModuleConfig::Memory(c) => &c.schedule,
            ModuleConfig::Cpu(c) => &c.schedule,
            ModuleConfig::External(c) => &c.schedule,
            ModuleConfig::StaticText(c) => &c.schedule,
        }
    }
}
