//! dwmstat-types: Shared data types for the dwmstat status bar.
//!
//! This crate contains pure configuration types (module configs, schedule
//! overrides, sink selection) that are shared across all dwmstat crates.
//! They carry no behaviour beyond serde defaults and small helpers.

pub mod module_configs;
pub mod schedule;
pub mod sink;

// Re-export commonly used types at the crate root for convenience
pub use module_configs::{
    BatteryModuleConfig, CpuModuleConfig, DateModuleConfig, ExternalKind, ExternalModuleConfig,
    MemoryModuleConfig, ModuleConfig, PostProcess, StaticTextModuleConfig,
};
pub use schedule::{interval_from_ms, ScheduleConfig};
pub use sink::SinkConfig;
