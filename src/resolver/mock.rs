//! Mock resolver for testing
//!
//! Returns scripted outcomes per location without any real loading, and
//! records every resolve call so tests can assert how many resolutions a
//! scenario performed.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ModuleEntry, Resolver};
use crate::error::ResolveError;

enum Script {
    Module(ModuleEntry),
    Fail(String),
}

/// Resolver that replays scripted outcomes and counts resolutions.
#[derive(Default)]
pub struct MockResolver {
    scripts: Mutex<HashMap<String, Script>>,
    /// Every location passed to `resolve`, in call order.
    calls: Mutex<Vec<String>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `location` to resolve to `entry`.
    pub fn on(&self, location: impl Into<String>, entry: ModuleEntry) {
        self.scripts
            .lock()
            .unwrap()
            .insert(location.into(), Script::Module(entry));
    }

    /// Script `location` to fail with `reason`.
    pub fn fail_with(&self, location: impl Into<String>, reason: impl Into<String>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(location.into(), Script::Fail(reason.into()));
    }

    /// Total number of resolve calls made.
    pub fn resolve_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of resolve calls made for `location`.
    pub fn count_for(&self, location: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|l| *l == location)
            .count()
    }

    /// All resolved locations, in call order.
    pub fn resolved_locations(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Resolver for MockResolver {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve(&self, location: &str) -> Result<ModuleEntry, ResolveError> {
        self.calls.lock().unwrap().push(location.to_string());

        let scripts = self.scripts.lock().unwrap();
        match scripts.get(location) {
            Some(Script::Module(entry)) => Ok(entry.clone()),
            Some(Script::Fail(reason)) => Err(ResolveError::Failed {
                location: location.to_string(),
                reason: reason.clone(),
            }),
            None => Err(ResolveError::NotFound {
                location: location.to_string(),
            }),
        }
    }
}
