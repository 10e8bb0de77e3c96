//! Date/time module configuration types.

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleConfig;

fn default_date_format() -> String {
    "%a %b %-d, %Y".to_string()
}

fn default_time_format() -> String {
    "%H:%M:%S".to_string()
}

/// Date module configuration
///
/// Formats use `chrono` strftime syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateModuleConfig {
    #[serde(flatten)]
    pub schedule: ScheduleConfig,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    /// IANA timezone name, e.g. `Europe/Berlin`. Local time when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for DateModuleConfig {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            date_format: default_date_format(),
            time_format: default_time_format(),
            timezone: None,
        }
    }
}
