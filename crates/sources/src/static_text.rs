//! Static text module implementation
//!
//! Provides a fixed label, useful as a separator-like decoration or as a
//! placeholder that other tooling rewrites in the config.

use dwmstat_core::{Module, ModuleMetadata, Schedule};
use dwmstat_types::StaticTextModuleConfig;

/// Static text module
///
/// Signal-only by default: the text never changes on its own.
pub struct StaticTextModule {
    metadata: ModuleMetadata,
    schedule: Schedule,
    text: String,
}

impl StaticTextModule {
    pub fn new(config: StaticTextModuleConfig) -> Self {
        let metadata = ModuleMetadata {
            id: "static_text".to_string(),
            description: "Configurable static text".to_string(),
            default_interval: None,
        };
        let schedule =
            Schedule::resolve(&config.schedule, "static_text", metadata.default_interval);

        Self {
            metadata,
            schedule,
            text: config.text,
        }
    }
}

impl Module for StaticTextModule {
    fn metadata(&self) -> &ModuleMetadata {
        &self.metadata
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn execute(&mut self) -> String {
        self.text.clone()
    }
}
