//! Adapter error types.
//!
//! All errors in the `libvstor` crate are represented by the [`VstorError`]
//! enum, which derives [`thiserror::Error`] for ergonomic error handling and
//! also implements [`Serialize`]/[`Deserialize`] so errors can travel across
//! the QUIC transport layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for storage frontend operations.
#[derive(Debug, Error, Serialize, Deserialize, Clone)]
pub enum VstorError {
    /// The client-facing identifier is absent from the relevant catalog.
    #[error("unable to find resource {0}")]
    NotFound(String),

    /// An engine call failed at the gateway. Propagated verbatim, never
    /// retried.
    #[error("engine call {method} failed: {message}")]
    EngineCall {
        /// Name of the engine operation that was invoked.
        method: String,
        /// Failure reason as reported by the gateway or the engine.
        message: String,
    },

    /// Live-engine reconciliation found zero or an unexpected number of
    /// matches for a correlation key.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A cross-resource reference does not resolve in its catalog.
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    /// A QUIC / transport-level error.
    #[error("transport error: {0}")]
    Transport(String),

    /// An unclassified internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VstorError {
    /// Create a [`VstorError::EngineCall`] for the given operation from
    /// anything that implements [`std::fmt::Display`].
    pub fn engine<E: std::fmt::Display>(method: &str, e: E) -> Self {
        Self::EngineCall {
            method: method.to_owned(),
            message: e.to_string(),
        }
    }

    /// Create a [`VstorError::Transport`] from anything that implements
    /// [`std::fmt::Display`].
    pub fn transport<E: std::fmt::Display>(e: E) -> Self {
        Self::Transport(e.to_string())
    }

    /// Create a [`VstorError::Internal`] from anything that implements
    /// [`std::fmt::Display`].
    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = VstorError::NotFound("subsys-1".into());
        assert_eq!(err.to_string(), "unable to find resource subsys-1");

        let err = VstorError::engine("nvmf_create_subsystem", "connection refused");
        assert_eq!(
            err.to_string(),
            "engine call nvmf_create_subsystem failed: connection refused"
        );
    }

    #[test]
    fn error_serde_roundtrip() {
        let err = VstorError::EngineCall {
            method: "vhost_get_controllers".into(),
            message: "timed out".into(),
        };
        let json = serde_json::to_string(&err).expect("serialize");
        let de: VstorError = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(err.to_string(), de.to_string());
    }
}
