//! Module resolution layer
//!
//! Trait and implementations for resolving method implementations on
//! demand.
//!
//! A [`Resolver`] turns a deterministic location string (built by the
//! binder as `{prefix}/{method}{suffix}`) into a [`ModuleEntry`]: the
//! loaded module's entry function. The binder never knows where modules
//! come from; any backend that can answer `resolve` works.
//!
//! Two implementations ship with the crate:
//!
//! - [`RegistryResolver`] — modules registered up front in a concurrent
//!   map, looked up by location.
//! - [`MockResolver`] — scripted per-location outcomes with failure
//!   injection and resolve counters, for tests.

mod mock;
mod registry;

pub use mock::MockResolver;
pub use registry::RegistryResolver;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ResolveError;
use crate::object::{MethodFn, MethodObject};

/// What a module's entry function produced.
pub enum EntryOutcome {
    /// A callable: installed as the slot's new implementation, then invoked
    /// with the original call's receiver and arguments.
    Method(MethodFn),
    /// Some other value. Nothing is installed; unless the entry overrode
    /// the slot out-of-band, the first call fails with
    /// [`CallError::OverrideMissing`](crate::CallError::OverrideMissing).
    Value(Value),
}

type EntryFn = Arc<dyn Fn(Arc<MethodObject>, &[Value]) -> EntryOutcome + Send + Sync>;

/// A loaded module: one entry function that receives the container being
/// bound and the constant-supplier's output as positional values.
#[derive(Clone)]
pub struct ModuleEntry {
    entry: EntryFn,
}

impl std::fmt::Debug for ModuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleEntry").finish_non_exhaustive()
    }
}

impl ModuleEntry {
    pub fn new<F>(entry: F) -> Self
    where
        F: Fn(Arc<MethodObject>, &[Value]) -> EntryOutcome + Send + Sync + 'static,
    {
        Self {
            entry: Arc::new(entry),
        }
    }

    /// Run the entry function against `object` with `constants`.
    pub fn apply(&self, object: Arc<MethodObject>, constants: &[Value]) -> EntryOutcome {
        (self.entry)(object, constants)
    }
}

/// Capability for loading module entries by location string.
///
/// Injected into [`Binder`](crate::Binder) as a trait object; the binder
/// performs no caching or retries around it, so a resolver is consulted
/// once per first-call attempt.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolver name, for logs.
    fn name(&self) -> &str;

    /// Load the module addressed by `location`.
    async fn resolve(&self, location: &str) -> Result<ModuleEntry, ResolveError>;
}
