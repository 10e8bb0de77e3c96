//! Render sink selection.

use serde::{Deserialize, Serialize};

/// Where the composed status line is sent on every flush.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "sink_type")]
pub enum SinkConfig {
    /// Set the X root window name (`xsetroot -name <line>`), read by dwm
    #[serde(rename = "xsetroot")]
    #[default]
    Xsetroot,

    /// Print each line on its own to standard output
    #[serde(rename = "stdout")]
    Stdout,

    /// Run an arbitrary program with the line appended as the last argument
    #[serde(rename = "command")]
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl SinkConfig {
    /// Get the sink type ID string
    pub fn sink_type(&self) -> &'static str {
        match self {
            SinkConfig::Xsetroot => "xsetroot",
            SinkConfig::Stdout => "stdout",
            SinkConfig::Command { .. } => "command",
        }
    }
}
