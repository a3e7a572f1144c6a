//! Method slot container
//!
//! [`MethodObject`] is an ordered collection of named method slots. A slot
//! is either still pending (declared but not yet bound), holds a first-call
//! shim installed by a [`Binder`](crate::Binder), or holds a real bound
//! implementation. The container is shared through `Arc` and keeps its
//! slots behind a mutex so a shim can overwrite its own slot mid-call.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

use crate::error::CallError;

/// Positional arguments of a method call.
pub type Args = Vec<Value>;

/// The future returned by every method invocation.
pub type MethodFuture = BoxFuture<'static, Result<Value, CallError>>;

/// A dynamic method value: receives the object the call went through plus
/// the original positional arguments.
pub type MethodFn = Arc<dyn Fn(Arc<MethodObject>, Args) -> MethodFuture + Send + Sync>;

/// Caller-provided supplier of closure constants, invoked fresh on every
/// first-call resolution attempt (never cached).
pub type ConstSupplier = Arc<dyn Fn() -> Vec<Value> + Send + Sync>;

/// Observable state of a method slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Declared but not yet bound; calling it fails with
    /// [`CallError::Unbound`].
    Pending,
    /// A first-call shim is installed; the next call triggers resolution.
    Shim,
    /// A real implementation is installed.
    Bound,
}

enum Slot {
    Pending,
    Shim { id: u64, func: MethodFn },
    Bound(MethodFn),
}

struct Entry {
    name: String,
    slot: Slot,
}

/// Container of lazily bound methods. See the crate docs for the full
/// lifecycle; in short: declare slots with [`MethodObject::builder`], hand
/// the object to [`Binder::bind`](crate::Binder::bind), then invoke slots
/// through [`MethodObject::call`].
pub struct MethodObject {
    entries: Mutex<Vec<Entry>>,
}

impl MethodObject {
    /// Start declaring a new object.
    pub fn builder() -> MethodObjectBuilder {
        MethodObjectBuilder { entries: vec![] }
    }

    /// Names of all slots, in declaration order.
    pub fn names(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap();
        entries.iter().map(|e| e.name.clone()).collect()
    }

    /// State of the named slot, or `None` if no such slot exists.
    pub fn state_of(&self, name: &str) -> Option<SlotState> {
        let entries = self.entries.lock().unwrap();
        entries.iter().find(|e| e.name == name).map(|e| match e.slot {
            Slot::Pending => SlotState::Pending,
            Slot::Shim { .. } => SlotState::Shim,
            Slot::Bound(_) => SlotState::Bound,
        })
    }

    /// Install `func` as the implementation of `name`, replacing whatever
    /// the slot currently holds. Creates the slot if it does not exist.
    ///
    /// This is the overwrite a loaded module's entry performs implicitly by
    /// returning a method, and explicitly when it binds out-of-band.
    pub fn install(&self, name: &str, func: MethodFn) {
        let mut entries = self.entries.lock().unwrap();
        match entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.slot = Slot::Bound(func),
            None => entries.push(Entry {
                name: name.to_string(),
                slot: Slot::Bound(func),
            }),
        }
    }

    /// Invoke the named method with `self` as the receiver.
    ///
    /// A pending or missing slot fails immediately with
    /// [`CallError::Unbound`]; a shim slot triggers first-call resolution.
    pub fn call(self: &Arc<Self>, name: &str, args: Args) -> MethodFuture {
        let func = {
            let entries = self.entries.lock().unwrap();
            entries.iter().find(|e| e.name == name).and_then(|e| match &e.slot {
                Slot::Shim { func, .. } | Slot::Bound(func) => Some(Arc::clone(func)),
                Slot::Pending => None,
            })
        };
        match func {
            Some(func) => func(Arc::clone(self), args),
            None => future::ready(Err(CallError::Unbound {
                name: name.to_string(),
            }))
            .boxed(),
        }
    }

    /// Walk slots in declaration order and replace each leading `Pending`
    /// slot with the shim produced by `make`. Stops at the first slot that
    /// is not pending. Returns the number of shims installed.
    pub(crate) fn bind_leading_pending(
        &self,
        mut make: impl FnMut(&str) -> (u64, MethodFn),
    ) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let mut installed = 0;
        for entry in entries.iter_mut() {
            if !matches!(entry.slot, Slot::Pending) {
                break;
            }
            let (id, func) = make(&entry.name);
            entry.slot = Slot::Shim { id, func };
            installed += 1;
        }
        installed
    }

    /// True if the named slot still holds the shim instance identified by
    /// `id`, i.e. nothing has overridden it.
    pub(crate) fn holds_shim(&self, name: &str, id: u64) -> bool {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .find(|e| e.name == name)
            .is_some_and(|e| matches!(e.slot, Slot::Shim { id: held, .. } if held == id))
    }
}

impl fmt::Debug for MethodObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.lock().unwrap();
        let mut map = f.debug_map();
        for entry in entries.iter() {
            let state = match entry.slot {
                Slot::Pending => "pending",
                Slot::Shim { .. } => "shim",
                Slot::Bound(_) => "bound",
            };
            map.entry(&entry.name, &state);
        }
        map.finish()
    }
}

/// Builder for [`MethodObject`]. Declaration order is preserved and matters:
/// binding only covers the contiguous leading run of pending slots.
pub struct MethodObjectBuilder {
    entries: Vec<Entry>,
}

impl MethodObjectBuilder {
    /// Declare a slot to be bound lazily.
    pub fn pending(mut self, name: impl Into<String>) -> Self {
        self.push(name.into(), Slot::Pending);
        self
    }

    /// Declare a slot with an implementation bound up front.
    pub fn method(mut self, name: impl Into<String>, func: MethodFn) -> Self {
        self.push(name.into(), Slot::Bound(func));
        self
    }

    pub fn build(self) -> Arc<MethodObject> {
        Arc::new(MethodObject {
            entries: Mutex::new(self.entries),
        })
    }

    fn push(&mut self, name: String, slot: Slot) {
        // Redeclaring a name replaces the earlier slot in place.
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.slot = slot,
            None => self.entries.push(Entry { name, slot }),
        }
    }
}

/// Wrap an async closure as a [`MethodFn`].
pub fn boxed_method<F, Fut>(func: F) -> MethodFn
where
    F: Fn(Arc<MethodObject>, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, CallError>> + Send + 'static,
{
    Arc::new(move |receiver, args| Box::pin(func(receiver, args)))
}
