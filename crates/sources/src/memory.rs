//! Memory (RAM) module implementation

use dwmstat_core::constants::ICO_RES_RAM;
use dwmstat_core::{Module, ModuleMetadata, Schedule};
use dwmstat_types::module_configs::MemoryField;
use dwmstat_types::MemoryModuleConfig;
use once_cell::sync::Lazy;
use std::sync::Mutex;
use std::time::Duration;
use sysinfo::System;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Shared sysinfo::System instance for all MemoryModule instances.
/// Several memory modules on one bar refresh the same counters.
static SHARED_MEMORY_SYSTEM: Lazy<Mutex<System>> = Lazy::new(|| {
    log::info!("Creating shared Memory sysinfo::System instance");
    Mutex::new(System::new())
});

/// Raw memory counters, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub total_memory: u64,
    pub used_memory: u64,
    pub total_swap: u64,
    pub used_swap: u64,
}

/// Memory module
///
/// Shows RAM or swap usage read directly through `sysinfo`.
pub struct MemoryModule {
    metadata: ModuleMetadata,
    schedule: Schedule,
    field: MemoryField,
}

impl MemoryModule {
    pub fn new(config: MemoryModuleConfig) -> Self {
        let metadata = ModuleMetadata {
            id: "memory".to_string(),
            description: "System memory (RAM) and swap usage".to_string(),
            default_interval: Some(Duration::from_secs(5)),
        };
        let schedule = Schedule::resolve(&config.schedule, "memory", metadata.default_interval);

        Self {
            metadata,
            schedule,
            field: config.field,
        }
    }

    fn snapshot() -> MemorySnapshot {
        // Recover from a poisoned mutex - the counters are refreshed anyway
        let mut system = SHARED_MEMORY_SYSTEM.lock().unwrap_or_else(|poisoned| {
            log::warn!("Shared memory system mutex was poisoned, recovering");
            poisoned.into_inner()
        });
        system.refresh_memory();

        MemorySnapshot {
            total_memory: system.total_memory(),
            used_memory: system.used_memory(),
            total_swap: system.total_swap(),
            used_swap: system.used_swap(),
        }
    }
}

fn percent(used: u64, total: u64) -> u64 {
    if total > 0 {
        used.saturating_mul(100) / total
    } else {
        0
    }
}

/// Render a snapshot for the configured field
pub fn format_memory(field: MemoryField, snapshot: &MemorySnapshot) -> String {
    match field {
        MemoryField::Percent => format!(
            "{} {}%",
            ICO_RES_RAM,
            percent(snapshot.used_memory, snapshot.total_memory)
        ),
        MemoryField::Used => format!(
            "{} {:.1}/{:.1}G",
            ICO_RES_RAM,
            snapshot.used_memory as f64 / BYTES_PER_GIB,
            snapshot.total_memory as f64 / BYTES_PER_GIB
        ),
        MemoryField::SwapPercent => format!(
            "{} swap {}%",
            ICO_RES_RAM,
            percent(snapshot.used_swap, snapshot.total_swap)
        ),
    }
}

impl Module for MemoryModule {
    fn metadata(&self) -> &ModuleMetadata {
        &self.metadata
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn execute(&mut self) -> String {
        format_memory(self.field, &Self::snapshot())
    }
}
