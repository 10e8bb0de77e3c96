//! Render sinks that put the composed line on screen

use anyhow::{bail, Context, Result};
use dwmstat_types::SinkConfig;
use std::io::Write;
use std::process::Command;
use std::sync::Arc;

/// Destination of the composed status line
///
/// Failures are reported to the caller, which logs them; the next flush
/// tries again with fresh data.
pub trait RenderSink: Send + Sync {
    fn apply(&self, line: &str) -> Result<()>;
}

/// Runs a program with the line appended as its last argument
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Sets the X root window name, which dwm draws as its status text
    pub fn xsetroot() -> Self {
        Self::new("xsetroot", vec!["-name".to_string()])
    }
}

impl RenderSink for CommandSink {
    fn apply(&self, line: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(line)
            .status()
            .with_context(|| format!("{}('{}')", self.program, line))?;

        if !status.success() {
            bail!("{}('{}'): {}", self.program, line, status);
        }
        Ok(())
    }
}

/// Prints every line to standard output
#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

impl RenderSink for StdoutSink {
    fn apply(&self, line: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line).context("writing status line to stdout")?;
        stdout.flush().context("flushing stdout")?;
        Ok(())
    }
}

/// Build the sink selected in the configuration
pub fn create_sink(config: &SinkConfig) -> Arc<dyn RenderSink> {
    match config {
        SinkConfig::Xsetroot => Arc::new(CommandSink::xsetroot()),
        SinkConfig::Stdout => Arc::new(StdoutSink),
        SinkConfig::Command { program, args } => {
            Arc::new(CommandSink::new(program.clone(), args.clone()))
        }
    }
}
