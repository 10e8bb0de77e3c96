//! Update scheduler: module workers, aggregator, render sinks and signals

mod batcher;
mod error;
mod scheduler;
mod signal;
mod sink;
#[cfg(test)]
mod test_support;
mod worker;

pub use batcher::BarFormat;
pub use dwmstat_core::{constants, BoxedModule, Module, ModuleMetadata, Registry, Schedule};
pub use error::{ConfigError, SignalError};
pub use scheduler::{Scheduler, SchedulerConfig};
pub use signal::{send_signal, Signal, SignalListener};
pub use sink::{create_sink, CommandSink, RenderSink, StdoutSink};
pub use worker::{ControlEvent, UpdateNotification};
