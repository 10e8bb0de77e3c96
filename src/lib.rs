//! dwmstat: An update scheduler for the dwm status bar
//!
//! This library provides the core functionality for dwmstat, including:
//! - Per-module workers running on an interval or on demand
//! - Batched redraws of the composed status line
//! - A Unix socket listener forcing individual modules to update
//! - Configuration management

pub mod config;
pub mod core;

// Re-export commonly used types
pub use crate::core::{Module, Scheduler, SchedulerConfig};
pub use config::AppConfig;

use anyhow::{Context, Result};

/// Build the configured modules, in display order
pub fn build_modules(config: &AppConfig) -> Result<Vec<core::BoxedModule>> {
    let registry = dwmstat_sources::builtin_registry();
    registry
        .create_modules(&config.modules)
        .context("Failed to create modules")
}

/// One line describing a module's schedule
pub fn describe_module(module: &dyn Module) -> String {
    let interval = match module.update_interval() {
        Some(interval) => format!("every {}ms", interval.as_millis()),
        None => "on signal only".to_string(),
    };
    match module.signal() {
        Some(signal) => format!(
            "{} ({}): {}, signal '{}'",
            module.name(),
            module.metadata().id,
            interval,
            signal
        ),
        None => format!("{} ({}): {}", module.name(), module.metadata().id, interval),
    }
}
