//! QUIC client used by management callers to issue frontend requests.

use std::net::SocketAddr;
use std::sync::Arc;

use quinn::crypto::rustls::QuicClientConfig;
use tracing::{debug, instrument};

use crate::error::VstorError;
use crate::message::VstorMessage;

/// A lightweight client that sends [`VstorMessage`] requests over a single
/// QUIC connection and returns the server's response.
pub struct VstorClient {
    connection: quinn::Connection,
}

impl VstorClient {
    /// Establish a new QUIC connection to the frontend server at `addr`.
    ///
    /// * `addr` — socket address of the remote server
    /// * `server_name` — TLS SNI name that must match a SAN in the server's
    ///   certificate
    /// * `tls_config` — client TLS configuration
    pub async fn connect(
        addr: SocketAddr,
        server_name: &str,
        tls_config: rustls::ClientConfig,
    ) -> Result<Self, VstorError> {
        let quic_client_config = QuicClientConfig::try_from(tls_config)
            .map_err(|e| VstorError::Transport(format!("invalid TLS config: {e}")))?;
        let client_config = quinn::ClientConfig::new(Arc::new(quic_client_config));

        let mut endpoint = quinn::Endpoint::client("0.0.0.0:0".parse().unwrap())
            .map_err(VstorError::transport)?;
        endpoint.set_default_client_config(client_config);

        let connection = endpoint
            .connect(addr, server_name)
            .map_err(VstorError::transport)?
            .await
            .map_err(VstorError::transport)?;

        debug!(%addr, %server_name, "frontend QUIC connection established");
        Ok(Self { connection })
    }

    /// Send a request and wait for the corresponding response.
    ///
    /// Each call opens a new bi-directional QUIC stream, writes the
    /// JSON-serialized request, finishes the send side, then reads the
    /// full response and deserializes it.
    #[instrument(skip(self), fields(msg = %msg))]
    pub async fn request(&self, msg: &VstorMessage) -> Result<VstorMessage, VstorError> {
        let (mut send, mut recv) = self
            .connection
            .open_bi()
            .await
            .map_err(VstorError::transport)?;

        // Serialize and send.
        let payload = serde_json::to_vec(msg).map_err(VstorError::internal)?;
        send.write_all(&payload)
            .await
            .map_err(VstorError::transport)?;
        send.finish().map_err(VstorError::transport)?;

        // Read the full response.
        let buf = recv
            .read_to_end(16 * 1024 * 1024) // 16 MiB upper bound
            .await
            .map_err(VstorError::transport)?;

        let response: VstorMessage =
            serde_json::from_slice(&buf).map_err(VstorError::transport)?;
        debug!(%response, "frontend response received");
        Ok(response)
    }

    /// Close the underlying QUIC connection gracefully.
    pub fn close(&self) {
        self.connection
            .close(quinn::VarInt::from_u32(0), b"client shutdown");
    }
}
