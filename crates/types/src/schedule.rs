//! Per-module scheduling overrides shared by every module config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheduling fields common to every module.
///
/// Flattened into each module config, so a module entry reads
/// `{"module_type": "date", "name": "clock", "update_interval_ms": 500}`.
/// Absent fields fall back to the module's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Unique name used to address the module with signals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Update interval in milliseconds. Zero or negative means the module
    /// only runs when signalled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_interval_ms: Option<i64>,
    /// Additional signal id the module answers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
}

impl ScheduleConfig {
    /// Schedule with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Builder-style interval override
    pub fn with_interval_ms(mut self, ms: i64) -> Self {
        self.update_interval_ms = Some(ms);
        self
    }

    /// Builder-style signal override
    pub fn with_signal(mut self, signal: impl Into<String>) -> Self {
        self.signal = Some(signal.into());
        self
    }
}

/// Convert a signed millisecond interval into a periodic interval.
///
/// Returns `None` (signal-only) for zero or negative values.
pub fn interval_from_ms(ms: i64) -> Option<Duration> {
    if ms > 0 {
        Some(Duration::from_millis(ms as u64))
    } else {
        None
    }
}
