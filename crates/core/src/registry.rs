//! Registry for module types

use crate::module::BoxedModule;
use anyhow::{anyhow, Result};
use dwmstat_types::ModuleConfig;
use std::collections::HashMap;

/// Function that creates a module from its configuration
pub type ModuleFactory = fn(&ModuleConfig) -> Result<BoxedModule>;

/// Registry for module types
///
/// Maps the `module_type` tag of a [`ModuleConfig`] to the factory that
/// builds it. Built-in modules are registered by `dwmstat-sources`.
pub struct Registry {
    modules: HashMap<String, ModuleFactory>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Register a module type
    pub fn register_module(&mut self, id: &str, factory: ModuleFactory) {
        if self.modules.insert(id.to_string(), factory).is_some() {
            log::debug!("Replacing factory for module type '{}'", id);
        }
    }

    /// Create a module from its configuration
    pub fn create_module(&self, config: &ModuleConfig) -> Result<BoxedModule> {
        let id = config.module_type();
        let factory = self
            .modules
            .get(id)
            .ok_or_else(|| anyhow!("Unknown module type: {}", id))?;
        factory(config)
    }

    /// Create every configured module, in configuration order
    pub fn create_modules(&self, configs: &[ModuleConfig]) -> Result<Vec<BoxedModule>> {
        configs.iter().map(|c| self.create_module(c)).collect()
    }

    /// List all registered module type IDs, sorted
    pub fn list_modules(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.modules.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
