//! Date and time module implementation

use anyhow::{anyhow, bail, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;
use dwmstat_core::constants::{ICO_DATE, ICO_TIME};
use dwmstat_core::{Module, ModuleMetadata, Schedule};
use dwmstat_types::DateModuleConfig;
use std::fmt::Display;
use std::time::Duration;

/// Date module
///
/// Shows the current date and time, in local time or in a configured
/// timezone.
pub struct DateModule {
    metadata: ModuleMetadata,
    schedule: Schedule,
    config: DateModuleConfig,
    timezone: Option<Tz>,
}

impl DateModule {
    pub fn new(config: DateModuleConfig) -> Result<Self> {
        let metadata = ModuleMetadata {
            id: "date".to_string(),
            description: "Current date and time".to_string(),
            default_interval: Some(Duration::from_secs(1)),
        };
        let schedule = Schedule::resolve(&config.schedule, "date", metadata.default_interval);

        validate_format(&config.date_format)?;
        validate_format(&config.time_format)?;

        let timezone = config
            .timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|e| anyhow!("Unknown timezone '{}': {}", name, e))
            })
            .transpose()?;

        Ok(Self {
            metadata,
            schedule,
            config,
            timezone,
        })
    }

    /// Format a point in time with the configured formats
    fn format_at<T>(&self, now: &DateTime<T>) -> String
    where
        T: TimeZone,
        T::Offset: Display,
    {
        format!(
            "{} {} {} {}",
            ICO_DATE,
            now.format(&self.config.date_format),
            ICO_TIME,
            now.format(&self.config.time_format)
        )
    }
}

/// Reject strftime strings chrono cannot render, since rendering them
/// later would panic inside `format!`
fn validate_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        bail!("Invalid date/time format: '{}'", format);
    }
    Ok(())
}

impl Module for DateModule {
    fn metadata(&self) -> &ModuleMetadata {
        &self.metadata
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn execute(&mut self) -> String {
        match self.timezone {
            Some(tz) => self.format_at(&Utc::now().with_timezone(&tz)),
            None => self.format_at(&Local::now()),
        }
    }
}
