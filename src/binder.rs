//! First-call binding
//!
//! [`Binder`] installs a shim in each pending slot of a
//! [`MethodObject`]. The shim resolves the slot's real implementation
//! through the configured [`Resolver`] the first time the method is
//! called, installs it in the slot, and forwards the triggering call's
//! receiver and arguments to it. Later calls hit the installed
//! implementation directly, with no further resolution.
//!
//! Concurrent first-calls to the same slot are not deduplicated: each call
//! resolves the location independently and the last install wins the slot.
//! Callers that need single-flight behavior must serialize first calls
//! themselves.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::error::CallError;
use crate::object::{ConstSupplier, MethodFn, MethodObject};
use crate::resolver::{EntryOutcome, Resolver};

/// Process-unique shim ids, so "did anything override me" is an identity
/// check per installed shim instance.
static NEXT_SHIM_ID: AtomicU64 = AtomicU64::new(1);

/// Installs first-call shims into pending method slots.
pub struct Binder {
    resolver: Arc<dyn Resolver>,
    suffix: String,
}

impl Binder {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            suffix: String::new(),
        }
    }

    /// Append `suffix` to every computed location, e.g. `".js"` for a
    /// resolver whose locations are file paths.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// The location the binder computes for a method name under `prefix`.
    pub fn location(&self, prefix: &str, name: &str) -> String {
        format!("{prefix}/{name}{}", self.suffix)
    }

    /// Install a first-call shim in each slot of the contiguous leading run
    /// of pending slots on `object`. The scan stops at the first slot that
    /// is not pending, so pending slots declared after a bound one are left
    /// untouched. Returns the same object for chaining.
    ///
    /// `constants`, if given, is invoked fresh on every first-call attempt
    /// and its output is passed positionally to the loaded module's entry.
    pub fn bind(
        &self,
        object: &Arc<MethodObject>,
        prefix: &str,
        constants: Option<ConstSupplier>,
    ) -> Arc<MethodObject> {
        let installed = object.bind_leading_pending(|name| {
            let id = NEXT_SHIM_ID.fetch_add(1, Ordering::Relaxed);
            let location = self.location(prefix, name);
            (id, self.make_shim(id, name.to_string(), location, constants.clone()))
        });
        debug!(
            resolver = self.resolver.name(),
            prefix, installed, "installed first-call shims"
        );
        Arc::clone(object)
    }

    fn make_shim(
        &self,
        id: u64,
        name: String,
        location: String,
        constants: Option<ConstSupplier>,
    ) -> MethodFn {
        let resolver = Arc::clone(&self.resolver);
        Arc::new(move |receiver, args| {
            let resolver = Arc::clone(&resolver);
            let name = name.clone();
            let location = location.clone();
            let constants = constants.clone();
            async move {
                debug!(method = %name, %location, "first call, resolving implementation");
                let module = resolver.resolve(&location).await?;

                let consts = constants.as_ref().map(|supply| supply()).unwrap_or_default();
                let outcome = module.apply(Arc::clone(&receiver), &consts);
                if let EntryOutcome::Method(func) = &outcome {
                    receiver.install(&name, Arc::clone(func));
                }

                // The entry must have replaced this shim, either by
                // returning a method or by installing one out-of-band.
                if receiver.holds_shim(&name, id) {
                    warn!(method = %name, "module entry did not override its slot");
                    return Err(CallError::OverrideMissing { name });
                }

                // Forward the original call to what the entry produced,
                // not to whatever the slot holds now.
                match outcome {
                    EntryOutcome::Method(func) => func(receiver, args).await,
                    EntryOutcome::Value(_) => Err(CallError::NotCallable { name }),
                }
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::SlotState;
    use crate::resolver::MockResolver;

    #[test]
    fn location_is_prefix_slash_name_plus_suffix() {
        let binder = Binder::new(Arc::new(MockResolver::new()));
        assert_eq!(binder.location("/users/methods", "greet"), "/users/methods/greet");

        let binder = Binder::new(Arc::new(MockResolver::new())).with_suffix(".js");
        assert_eq!(binder.location("/users/methods", "greet"), "/users/methods/greet.js");
    }

    #[test]
    fn bind_returns_the_same_object_for_chaining() {
        let binder = Binder::new(Arc::new(MockResolver::new()));
        let object = MethodObject::builder().pending("greet").build();

        let returned = binder.bind(&object, "/obj", None);
        assert!(Arc::ptr_eq(&object, &returned));
        assert_eq!(object.state_of("greet"), Some(SlotState::Shim));
    }

    #[test]
    fn bind_covers_only_the_leading_pending_run() {
        let binder = Binder::new(Arc::new(MockResolver::new()));
        let object = MethodObject::builder()
            .pending("a")
            .pending("b")
            .method(
                "c",
                crate::object::boxed_method(|_r, _a| async { Ok(serde_json::Value::Null) }),
            )
            .pending("d")
            .build();

        binder.bind(&object, "/obj", None);
        assert_eq!(object.state_of("a"), Some(SlotState::Shim));
        assert_eq!(object.state_of("b"), Some(SlotState::Shim));
        assert_eq!(object.state_of("c"), Some(SlotState::Bound));
        assert_eq!(object.state_of("d"), Some(SlotState::Pending));
    }
}
