//! dwmstat-core: Core traits and registry for the dwmstat status bar.
//!
//! This crate contains the fundamental [`Module`] trait, the [`Registry`]
//! that builds modules from configuration, and shared constants.

pub mod constants;
mod module;
mod registry;

pub use module::{BoxedModule, Module, ModuleMetadata, Schedule};
pub use registry::{ModuleFactory, Registry};

// Re-export types used in trait signatures for convenience
pub use dwmstat_types::{ModuleConfig, ScheduleConfig};
