//! Static text module configuration types.

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleConfig;

/// Static text module configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticTextModuleConfig {
    #[serde(flatten)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub text: String,
}
