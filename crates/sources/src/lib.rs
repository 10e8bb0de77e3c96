//! dwmstat-sources: Built-in modules for the dwmstat status bar.
//!
//! Direct system probes (date, battery, memory, cpu, static text) and the
//! external command module.

mod battery;
mod cpu;
mod date;
mod external;
mod memory;
mod static_text;

pub use battery::{battery_icon, BatteryModule};
pub use cpu::CpuModule;
pub use date::DateModule;
pub use external::{post_process, ExternalModule};
pub use memory::{MemoryModule, MemorySnapshot};
pub use static_text::StaticTextModule;

use anyhow::{bail, Result};
use dwmstat_core::{BoxedModule, ModuleConfig, Registry};

/// Register all built-in modules with a registry
pub fn register_all(registry: &mut Registry) {
    registry.register_module("date", |config| match config {
        ModuleConfig::Date(c) => Ok(Box::new(DateModule::new(c.clone())?)),
        other => mismatched("date", other),
    });

    registry.register_module("battery", |config| match config {
        ModuleConfig::Battery(c) => Ok(Box::new(BatteryModule::new(c.clone()))),
        other => mismatched("battery", other),
    });

    registry.register_module("memory", |config| match config {
        ModuleConfig::Memory(c) => Ok(Box::new(MemoryModule::new(c.clone()))),
        other => mismatched("memory", other),
    });

    registry.register_module("cpu", |config| match config {
        ModuleConfig::Cpu(c) => Ok(Box::new(CpuModule::new(c.clone()))),
        other => mismatched("cpu", other),
    });

    registry.register_module("external", |config| match config {
        ModuleConfig::External(c) => Ok(Box::new(ExternalModule::new(c.clone()))),
        other => mismatched("external", other),
    });

    registry.register_module("static_text", |config| match config {
        ModuleConfig::StaticText(c) => Ok(Box::new(StaticTextModule::new(c.clone()))),
        other => mismatched("static_text", other),
    });
}

/// Registry with every built-in module registered
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    register_all(&mut registry);
    registry
}

fn mismatched(expected: &str, config: &ModuleConfig) -> Result<BoxedModule> {
    bail!(
        "Factory for '{}' received a '{}' config",
        expected,
        config.module_type()
    )
}
