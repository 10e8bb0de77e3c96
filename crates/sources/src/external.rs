//! External command module implementation
//!
//! Obtains its output by running a binary, or a script through a shell.
//! A command exiting with a non-zero status is treated as an error (and
//! logged); if that is out of your control, wrap the command in a script
//! that always succeeds.

use anyhow::{bail, Context, Result};
use dwmstat_core::constants::*;
use dwmstat_core::{Module, ModuleMetadata, Schedule};
use dwmstat_types::{ExternalKind, ExternalModuleConfig, PostProcess};
use std::process::Command;

/// External module
pub struct ExternalModule {
    metadata: ModuleMetadata,
    schedule: Schedule,
    config: ExternalModuleConfig,
}

impl ExternalModule {
    pub fn new(config: ExternalModuleConfig) -> Self {
        let metadata = ModuleMetadata {
            id: "external".to_string(),
            description: format!("Output of the {} '{}'", config.kind.as_str(), config.command),
            default_interval: None,
        };
        let schedule = Schedule::resolve(&config.schedule, &config.command, None);

        Self {
            metadata,
            schedule,
            config,
        }
    }

    fn command(&self) -> Command {
        match self.config.kind {
            ExternalKind::Binary => {
                let mut cmd = Command::new(&self.config.command);
                cmd.args(&self.config.args);
                cmd
            }
            ExternalKind::Script => {
                let mut cmd = Command::new(&self.config.shell);
                cmd.arg(&self.config.command).args(&self.config.args);
                cmd
            }
        }
    }

    /// Run the command and return its stdout
    fn run(&self) -> Result<String> {
        let output = self
            .command()
            .output()
            .with_context(|| format!("failed to run '{}'", self.config.command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "'{}' exited with {}: {}",
                self.config.command,
                output.status,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Module for ExternalModule {
    fn metadata(&self) -> &ModuleMetadata {
        &self.metadata
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn execute(&mut self) -> String {
        match self.run() {
            Ok(out) => match &self.config.post_process {
                Some(post) => post_process(post, &out),
                None => out.trim_end_matches(['\n', '\r']).to_string(),
            },
            Err(e) => {
                let marker = ext_mod_exec_err(self.name());
                log::error!("{}: {:#}", marker, e);
                marker
            }
        }
    }
}

/// Apply a post-processor to raw command output
pub fn post_process(post: &PostProcess, out: &str) -> String {
    match post {
        PostProcess::Trim => out.trim().to_string(),
        PostProcess::Volume => volume(out),
        PostProcess::RamUsage => ram_usage(out),
        PostProcess::CpuUsage => format!("{} {}", ICO_RES_CPU, out.trim()),
        PostProcess::Prefix { prefix } => format!("{}{}", prefix, out.trim()),
    }
}

fn volume(out: &str) -> String {
    let out = out.trim();
    if out == "muted" {
        return ICO_VOL_MUTE.to_string();
    }

    let level = out.strip_suffix('%').unwrap_or(out);
    match level.parse::<i32>() {
        Ok(vol) if (0..50).contains(&vol) => format!("{} {}", ICO_VOL_DOWN, out),
        Ok(_) => format!("{} {}", ICO_VOL_UP, out),
        Err(e) => {
            log::error!("{}: invalid volume '{}': {}", EXT_MOD_MVOL_ERR, out, e);
            EXT_MOD_MVOL_ERR.to_string()
        }
    }
}

fn ram_usage(out: &str) -> String {
    let parts: Vec<&str> = out.split_whitespace().collect();
    let [used, total] = parts.as_slice() else {
        log::error!("{}: malformed script output '{}'", EXT_MOD_RAM_ERR, out);
        return EXT_MOD_RAM_ERR.to_string();
    };

    let used = match used.parse::<u64>() {
        Ok(v) => v,
        Err(_) => {
            log::error!("{}: invalid used size '{}'", EXT_MOD_RAM_ERR, used);
            return EXT_MOD_RAM_ERR.to_string();
        }
    };
    let total = match total.parse::<u64>() {
        Ok(v) if v > 0 => v,
        _ => {
            log::error!("{}: invalid total size '{}'", EXT_MOD_RAM_ERR, total);
            return EXT_MOD_RAM_ERR.to_string();
        }
    };

    format!("{} {}%", ICO_RES_RAM, used.saturating_mul(100) / total)
}
