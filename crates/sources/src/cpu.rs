//! CPU usage module implementation

use dwmstat_core::constants::ICO_RES_CPU;
use dwmstat_core::{Module, ModuleMetadata, Schedule};
use dwmstat_types::CpuModuleConfig;
use std::time::Duration;
use sysinfo::{CpuRefreshKind, RefreshKind, System};

/// CPU module
///
/// Shows global CPU usage. Usage is computed by sysinfo from the difference
/// between two refreshes, so the reading covers the time since the previous
/// execution.
pub struct CpuModule {
    metadata: ModuleMetadata,
    schedule: Schedule,
    system: System,
    precision: usize,
}

impl CpuModule {
    pub fn new(config: CpuModuleConfig) -> Self {
        let metadata = ModuleMetadata {
            id: "cpu".to_string(),
            description: "Global CPU usage".to_string(),
            default_interval: Some(Duration::from_secs(5)),
        };
        let schedule = Schedule::resolve(&config.schedule, "cpu", metadata.default_interval);

        // Initialize system with CPU refresh configuration
        let system = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::new().with_cpu_usage()),
        );

        Self {
            metadata,
            schedule,
            system,
            precision: config.precision,
        }
    }
}

/// Render a usage percentage
pub fn format_cpu(usage: f32, precision: usize) -> String {
    format!("{} {:.*}%", ICO_RES_CPU, precision, usage)
}

impl Module for CpuModule {
    fn metadata(&self) -> &ModuleMetadata {
        &self.metadata
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn execute(&mut self) -> String {
        self.system.refresh_cpu_usage();
        let usage = self.system.global_cpu_usage();
        log::trace!("CPU usage: {:.2}%", usage);
        format_cpu(usage, self.precision)
    }
}
