//! JSON-RPC gateway to the storage engine.
//!
//! [`JsonRpcGateway`] speaks JSON-RPC 2.0 over the engine's Unix-domain
//! control socket.  Requests are serialized one at a time over a single
//! connection; the response is read by accumulating bytes until one
//! complete JSON document parses.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::EngineGateway;
use crate::error::VstorError;

/// JSON-RPC 2.0 request envelope.
#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Deserialize)]
struct RpcResponse {
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcFailure>,
}

/// Error object inside a failed [`RpcResponse`].
#[derive(Deserialize)]
struct RpcFailure {
    code: i64,
    message: String,
}

/// Gateway implementation over the engine's JSON-RPC Unix socket.
///
/// Holds one connection; concurrent callers serialize on an internal lock
/// so request and response bytes never interleave on the stream.
#[derive(Debug)]
pub struct JsonRpcGateway {
    stream: Mutex<UnixStream>,
    next_id: AtomicU64,
}

impl JsonRpcGateway {
    /// Connect to the engine's control socket at `path`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, VstorError> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| VstorError::Transport(format!("connect {}: {e}", path.display())))?;
        debug!(path = %path.display(), "engine control socket connected");
        Ok(Self {
            stream: Mutex::new(stream),
            next_id: AtomicU64::new(1),
        })
    }

    /// Read bytes off the stream until one complete JSON response parses.
    async fn read_response(stream: &mut UnixStream) -> Result<RpcResponse, VstorError> {
        let mut buf = Vec::with_capacity(4096);
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream
                .read(&mut chunk)
                .await
                .map_err(VstorError::transport)?;
            if n == 0 {
                return Err(VstorError::Transport(
                    "engine closed the control socket mid-response".into(),
                ));
            }
            buf.extend_from_slice(&chunk[..n]);
            match serde_json::from_slice::<RpcResponse>(&buf) {
                Ok(response) => return Ok(response),
                // Incomplete document: keep reading.
                Err(e) if e.is_eof() => continue,
                Err(e) => {
                    return Err(VstorError::Transport(format!("malformed response: {e}")));
                }
            }
        }
    }
}

#[async_trait]
impl EngineGateway for JsonRpcGateway {
    #[instrument(skip(self, params))]
    async fn invoke(&self, method: &str, params: Option<Value>) -> Result<Value, VstorError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        let payload = serde_json::to_vec(&request).map_err(VstorError::internal)?;

        let mut stream = self.stream.lock().await;
        stream
            .write_all(&payload)
            .await
            .map_err(VstorError::transport)?;
        stream.flush().await.map_err(VstorError::transport)?;

        let response = Self::read_response(&mut stream).await?;
        drop(stream);

        if response.id != id {
            return Err(VstorError::Internal(format!(
                "response id {} does not match request id {id}",
                response.id
            )));
        }
        if let Some(failure) = response.error {
            return Err(VstorError::engine(
                method,
                format!("{} (code {})", failure.message, failure.code),
            ));
        }

        let result = response.result.unwrap_or(Value::Null);
        debug!(%id, "engine call completed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::net::UnixListener;

    /// One-shot engine double: accepts a single connection, checks the
    /// request envelope, and replies with the given response document.
    async fn serve_once(listener: UnixListener, response: Value) -> Value {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let request: Value = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending a request");
            buf.extend_from_slice(&chunk[..n]);
            match serde_json::from_slice(&buf) {
                Ok(v) => break v,
                Err(e) if e.is_eof() => continue,
                Err(e) => panic!("malformed request: {e}"),
            }
        };
        let reply = serde_json::to_vec(&response).unwrap();
        stream.write_all(&reply).await.unwrap();
        stream.flush().await.unwrap();
        request
    }

    #[tokio::test]
    async fn invoke_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(serve_once(
            listener,
            json!({ "jsonrpc": "2.0", "id": 1, "result": true }),
        ));

        let gateway = JsonRpcGateway::connect(&path).await.unwrap();
        let result = gateway
            .invoke(
                "nvmf_delete_subsystem",
                Some(json!({ "nqn": "nqn.2019-06.io.spdk:cnode1" })),
            )
            .await
            .unwrap();
        assert_eq!(result, json!(true));

        let request = server.await.unwrap();
        assert_eq!(request["jsonrpc"], "2.0");
        assert_eq!(request["id"], 1);
        assert_eq!(request["method"], "nvmf_delete_subsystem");
        assert_eq!(request["params"]["nqn"], "nqn.2019-06.io.spdk:cnode1");
    }

    #[tokio::test]
    async fn invoke_omits_absent_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(serve_once(
            listener,
            json!({ "jsonrpc": "2.0", "id": 1, "result": [] }),
        ));

        let gateway = JsonRpcGateway::connect(&path).await.unwrap();
        let result = gateway.invoke("nvmf_get_subsystems", None).await.unwrap();
        assert_eq!(result, json!([]));

        let request = server.await.unwrap();
        assert!(request.get("params").is_none());
    }

    #[tokio::test]
    async fn engine_error_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.sock");
        let listener = UnixListener::bind(&path).unwrap();

        tokio::spawn(serve_once(
            listener,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32602, "message": "Invalid parameters" },
            }),
        ));

        let gateway = JsonRpcGateway::connect(&path).await.unwrap();
        let err = gateway
            .invoke("vhost_create_blk_controller", Some(json!({})))
            .await
            .unwrap_err();
        match err {
            VstorError::EngineCall { method, message } => {
                assert_eq!(method, "vhost_create_blk_controller");
                assert!(message.contains("Invalid parameters"));
                assert!(message.contains("-32602"));
            }
            other => panic!("expected EngineCall, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connect_failure_is_transport_error() {
        let err = JsonRpcGateway::connect("/nonexistent/engine.sock")
            .await
            .unwrap_err();
        assert!(matches!(err, VstorError::Transport(_)));
    }
}
