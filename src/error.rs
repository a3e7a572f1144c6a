//! Error types for binding, resolution, and method calls

use thiserror::Error;

/// Errors produced by a [`Resolver`](crate::resolver::Resolver) while
/// loading a module for a location string.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no module registered at '{location}'")]
    NotFound { location: String },

    #[error("failed to load module at '{location}': {reason}")]
    Failed { location: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by a method call, including the first-call load path.
///
/// Nothing here is caught or retried internally; every variant reaches the
/// caller as the `Err` of the call future.
#[derive(Error, Debug)]
pub enum CallError {
    /// The location could not be resolved. The resolver's error is carried
    /// as-is, not wrapped in extra context.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The loaded module's entry ran but left the first-call shim in place.
    #[error("must override method '{name}'")]
    OverrideMissing { name: String },

    /// The value produced by the load step is not callable, so the original
    /// call cannot be forwarded to it.
    #[error("loaded value for method '{name}' is not callable")]
    NotCallable { name: String },

    /// The slot exists but holds no callable (still pending, never bound),
    /// or no slot with this name exists at all.
    #[error("method '{name}' is not bound")]
    Unbound { name: String },

    /// An error raised by a bound implementation itself.
    #[error("{0}")]
    Method(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_missing_message_names_the_method() {
        let err = CallError::OverrideMissing {
            name: "greet".to_string(),
        };
        assert_eq!(err.to_string(), "must override method 'greet'");
    }

    #[test]
    fn resolve_error_passes_through_unwrapped() {
        let err: CallError = ResolveError::NotFound {
            location: "/obj/greet".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "no module registered at '/obj/greet'");
    }
}
