//! Module trait and related types

use dwmstat_types::{interval_from_ms, ScheduleConfig};
use std::time::Duration;

/// Metadata about a module type
#[derive(Debug, Clone)]
pub struct ModuleMetadata {
    /// Identifier of the module type (matches the config tag)
    pub id: String,
    /// Description of what this module shows
    pub description: String,
    /// Update interval used when the config does not override it.
    /// `None` means the module only runs when signalled.
    pub default_interval: Option<Duration>,
}

/// Resolved scheduling parameters of one configured module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Unique name, used as the signal lookup key
    pub name: String,
    /// Periodic interval, `None` for signal-only modules
    pub interval: Option<Duration>,
    /// Extra signal id the module answers to
    pub signal: Option<String>,
}

impl Schedule {
    /// Merge config overrides over a module's defaults
    pub fn resolve(
        config: &ScheduleConfig,
        default_name: &str,
        default_interval: Option<Duration>,
    ) -> Self {
        Self {
            name: config
                .name
                .clone()
                .unwrap_or_else(|| default_name.to_string()),
            interval: config
                .update_interval_ms
                .map_or(default_interval, interval_from_ms),
            signal: config.signal.clone(),
        }
    }
}

/// Trait for all status bar modules
///
/// A module produces one short display string each time it is executed.
/// Implementations either probe the system directly or run an external
/// command.
pub trait Module: Send {
    /// Get metadata about this module type
    fn metadata(&self) -> &ModuleMetadata;

    /// Get the resolved schedule of this instance
    fn schedule(&self) -> &Schedule;

    /// Unique name of this module instance
    fn name(&self) -> &str {
        &self.schedule().name
    }

    /// Periodic update interval, `None` if the module is signal-only
    fn update_interval(&self) -> Option<Duration> {
        self.schedule().interval
    }

    /// Signal id correlating with inbound signal payloads
    fn signal(&self) -> Option<&str> {
        self.schedule().signal.as_deref()
    }

    /// Run the module and return the string to display
    ///
    /// This must not fail: errors are logged by the implementation and
    /// replaced with a fixed sentinel marker so a broken module stays
    /// visible on the bar instead of disappearing.
    fn execute(&mut self) -> String;
}

/// Type-erased module for dynamic dispatch
pub type BoxedModule = Box<dyn Module>;
