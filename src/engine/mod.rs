//! Engine control-protocol gateway.
//!
//! The storage engine is an opaque collaborator reached through a single
//! operation: invoke a named method with a parameter value and decode a
//! typed result, or surface a failure.  [`EngineGateway`] is that boundary;
//! [`rpc::JsonRpcGateway`] implements it over the engine's JSON-RPC Unix
//! socket, and tests substitute scripted doubles.

pub mod params;
pub mod rpc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::VstorError;

/// Boundary for invoking one named engine operation.
///
/// Implementations own the transport; callers treat parameters and results
/// as opaque JSON values they only build and read.  No retry, backoff, or
/// timeout is layered on top of this trait by the adapter.
#[async_trait]
pub trait EngineGateway: Send + Sync {
    /// Invoke `method` with the given parameters and return the engine's
    /// result value.
    async fn invoke(&self, method: &str, params: Option<Value>) -> Result<Value, VstorError>;
}
