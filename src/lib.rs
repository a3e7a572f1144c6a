//! latebind - lazy first-call method binding
//!
//! Declare method slots as pending, bind them to a location prefix, and
//! pay the cost of loading an implementation only when a method is first
//! called. On that first call the installed shim resolves the module for
//! `{prefix}/{name}{suffix}` through a pluggable [`Resolver`], runs its
//! entry function, permanently installs the returned method in the slot,
//! and forwards the original call to it. Every later call goes straight to
//! the installed implementation.
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::{json, Value};
//! use latebind::{boxed_method, Binder, EntryOutcome, MethodObject, ModuleEntry, RegistryResolver};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), latebind::CallError> {
//! let resolver = RegistryResolver::new().with_module(
//!     "/users/methods/greet",
//!     ModuleEntry::new(|_object, _constants| {
//!         EntryOutcome::Method(boxed_method(|_receiver, args| async move {
//!             let name = args.first().and_then(Value::as_str).unwrap_or("world");
//!             Ok(json!(format!("Hello {name}")))
//!         }))
//!     }),
//! );
//!
//! let users = MethodObject::builder().pending("greet").build();
//! Binder::new(Arc::new(resolver)).bind(&users, "/users/methods", None);
//!
//! let out = users.call("greet", vec![json!("World")]).await?;
//! assert_eq!(out, json!("Hello World"));
//! # Ok(())
//! # }
//! ```
//!
//! Two boundaries worth knowing about:
//!
//! - Binding covers only the contiguous leading run of pending slots, in
//!   declaration order. The scan stops at the first non-pending slot, so
//!   declare pending slots first.
//! - Concurrent first-calls to one slot are not deduplicated; each
//!   resolves independently and the last install wins. See [`Binder`].

pub mod binder;
pub mod error;
pub mod object;
pub mod resolver;

pub use binder::Binder;
pub use error::{CallError, ResolveError};
pub use object::{
    boxed_method, Args, ConstSupplier, MethodFn, MethodFuture, MethodObject, MethodObjectBuilder,
    SlotState,
};
pub use resolver::{EntryOutcome, MockResolver, ModuleEntry, RegistryResolver, Resolver};
