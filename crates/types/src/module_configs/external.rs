//! External command module configuration types.

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleConfig;

/// How an external module's command is launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExternalKind {
    /// Execute the command directly
    #[serde(rename = "binary")]
    Binary,
    /// Run the command as a script through the configured shell
    #[serde(rename = "script")]
    #[default]
    Script,
}

impl ExternalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalKind::Binary => "binary",
            ExternalKind::Script => "script",
        }
    }
}

/// Transformation applied to a command's stdout before display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "processor")]
pub enum PostProcess {
    /// Trim surrounding whitespace
    #[serde(rename = "trim")]
    Trim,
    /// `muted` or `NN%` as printed by a volume script
    #[serde(rename = "volume")]
    Volume,
    /// `<used> <total>` memory figures, shown as a percentage
    #[serde(rename = "ram_usage")]
    RamUsage,
    /// CPU usage text, shown behind the CPU icon
    #[serde(rename = "cpu_usage")]
    CpuUsage,
    /// Prepend a fixed string
    #[serde(rename = "prefix")]
    Prefix { prefix: String },
}

/// Interpreter for script modules when the config names none
pub const DEFAULT_SHELL: &str = "/bin/bash";

fn default_shell() -> String {
    DEFAULT_SHELL.to_string()
}

/// External module configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalModuleConfig {
    #[serde(flatten)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub kind: ExternalKind,
    /// Binary name or script path
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Interpreter used for [`ExternalKind::Script`]
    #[serde(default = "default_shell")]
    pub shell: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_process: Option<PostProcess>,
}

impl ExternalModuleConfig {
    pub fn new(kind: ExternalKind, command: impl Into<String>) -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            kind,
            command: command.into(),
            args: Vec::new(),
            shell: default_shell(),
            post_process: None,
        }
    }

    /// Master volume through the `vol` script, refreshed only on signal
    pub fn master_volume() -> Self {
        Self {
            schedule: ScheduleConfig::named("volume").with_interval_ms(-1),
            args: vec!["get".to_string()],
            post_process: Some(PostProcess::Volume),
            ..Self::new(ExternalKind::Script, "vol")
        }
    }

    /// RAM usage through the `sb_ram_usage` script
    pub fn ram_usage() -> Self {
        Self {
            schedule: ScheduleConfig::named("sys_ram_usage").with_interval_ms(5000),
            post_process: Some(PostProcess::RamUsage),
            ..Self::new(ExternalKind::Script, "sb_ram_usage")
        }
    }

    /// CPU usage through the `sb_cpu_usage` script
    pub fn cpu_usage() -> Self {
        Self {
            schedule: ScheduleConfig::named("sys_cpu_usage").with_interval_ms(5000),
            post_process: Some(PostProcess::CpuUsage),
            ..Self::new(ExternalKind::Script, "sb_cpu_usage")
        }
    }
}
