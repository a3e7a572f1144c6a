//! Registry-backed resolver
//!
//! Modules are registered under their location string ahead of time and
//! looked up in a lock-free concurrent map when a first call arrives.

use dashmap::DashMap;

use async_trait::async_trait;

use super::{ModuleEntry, Resolver};
use crate::error::ResolveError;

/// Resolver backed by an in-process table of registered modules.
#[derive(Default)]
pub struct RegistryResolver {
    modules: DashMap<String, ModuleEntry>,
}

impl RegistryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under `location`, replacing any previous entry.
    pub fn register(&self, location: impl Into<String>, entry: ModuleEntry) {
        self.modules.insert(location.into(), entry);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_module(self, location: impl Into<String>, entry: ModuleEntry) -> Self {
        self.register(location, entry);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[async_trait]
impl Resolver for RegistryResolver {
    fn name(&self) -> &str {
        "registry"
    }

    async fn resolve(&self, location: &str) -> Result<ModuleEntry, ResolveError> {
        match self.modules.get(location) {
            Some(entry) => {
                tracing::debug!(%location, "resolved registered module");
                Ok(entry.clone())
            }
            None => Err(ResolveError::NotFound {
                location: location.to_string(),
            }),
        }
    }
}
