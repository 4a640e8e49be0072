//! QUIC server that accepts frontend requests and dispatches them to the
//! resource service implementations.

use std::net::SocketAddr;
use std::sync::Arc;

use quinn::crypto::rustls::QuicServerConfig;
use tracing::{debug, error, info, instrument, warn};

use crate::controller::NvmeControllerService;
use crate::error::VstorError;
use crate::message::VstorMessage;
use crate::namespace::NvmeNamespaceService;
use crate::subsystem::NvmeSubsystemService;
use crate::virtio_blk::VirtioBlkService;
use crate::virtio_scsi::{VirtioScsiControllerService, VirtioScsiLunService};

/// A server that accepts QUIC connections and dispatches [`VstorMessage`]
/// requests to an implementation of the six resource service traits.
pub struct VstorServer<T> {
    endpoint: quinn::Endpoint,
    handler: Arc<T>,
}

impl<T> VstorServer<T>
where
    T: NvmeSubsystemService
        + NvmeControllerService
        + NvmeNamespaceService
        + VirtioBlkService
        + VirtioScsiControllerService
        + VirtioScsiLunService
        + 'static,
{
    /// Create a new server bound to `addr`.
    pub fn new(
        addr: SocketAddr,
        tls_config: rustls::ServerConfig,
        handler: Arc<T>,
    ) -> Result<Self, VstorError> {
        let quic_server_config = QuicServerConfig::try_from(tls_config)
            .map_err(|e| VstorError::Transport(format!("invalid TLS config: {e}")))?;
        let server_config = quinn::ServerConfig::with_crypto(Arc::new(quic_server_config));
        let endpoint =
            quinn::Endpoint::server(server_config, addr).map_err(VstorError::transport)?;
        info!(%addr, "frontend QUIC server listening");
        Ok(Self { endpoint, handler })
    }

    /// Accept connections in a loop until the endpoint is closed.
    ///
    /// Each accepted connection spawns a Tokio task, and each bi-stream
    /// within a connection is handled concurrently.
    pub async fn serve(&self) -> Result<(), VstorError> {
        while let Some(incoming) = self.endpoint.accept().await {
            let handler = Arc::clone(&self.handler);
            tokio::spawn(async move {
                match incoming.await {
                    Ok(conn) => {
                        let remote = conn.remote_address();
                        debug!(%remote, "frontend connection accepted");
                        if let Err(e) = Self::handle_connection(conn, handler).await {
                            warn!(%remote, error = %e, "frontend connection error");
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "incoming connection failed");
                    }
                }
            });
        }
        Ok(())
    }

    /// Handle all bi-streams on a single connection.
    async fn handle_connection(conn: quinn::Connection, handler: Arc<T>) -> Result<(), VstorError> {
        loop {
            let (send, recv) = match conn.accept_bi().await {
                Ok(stream) => stream,
                Err(quinn::ConnectionError::ApplicationClosed(_)) => return Ok(()),
                Err(e) => return Err(VstorError::transport(e)),
            };

            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                if let Err(e) = Self::handle_stream(send, recv, &handler).await {
                    error!(error = %e, "frontend stream handler error");
                }
            });
        }
    }

    /// Process a single bi-stream: read request → dispatch → write response.
    #[instrument(skip_all)]
    async fn handle_stream(
        mut send: quinn::SendStream,
        mut recv: quinn::RecvStream,
        handler: &T,
    ) -> Result<(), VstorError> {
        // Read the full request.
        let buf = recv
            .read_to_end(16 * 1024 * 1024)
            .await
            .map_err(VstorError::transport)?;

        let request: VstorMessage = serde_json::from_slice(&buf)
            .map_err(|e| VstorError::Transport(format!("malformed request: {e}")))?;

        debug!(%request, "frontend request received");

        let response = Self::dispatch(handler, request).await;

        // Serialize and send the response.
        let payload = serde_json::to_vec(&response).map_err(VstorError::internal)?;
        send.write_all(&payload)
            .await
            .map_err(VstorError::transport)?;
        send.finish().map_err(VstorError::transport)?;
        Ok(())
    }

    /// Map a request to the correct trait method call and wrap the result
    /// in a response [`VstorMessage`].
    async fn dispatch(handler: &T, request: VstorMessage) -> VstorMessage {
        use VstorMessage as M;
        match request {
            // --- NVMe subsystems --------------------------------------------
            M::CreateNvmeSubsystem(spec) => match handler.create_subsystem(spec).await {
                Ok(s) => M::NvmeSubsystem(s),
                Err(e) => M::Error(e),
            },
            M::DeleteNvmeSubsystem(id) => match handler.delete_subsystem(&id).await {
                Ok(()) => M::Ok,
                Err(e) => M::Error(e),
            },
            M::UpdateNvmeSubsystem(spec) => match handler.update_subsystem(spec).await {
                Ok(s) => M::NvmeSubsystem(s),
                Err(e) => M::Error(e),
            },
            M::GetNvmeSubsystem(id) => match handler.get_subsystem(&id).await {
                Ok(s) => M::NvmeSubsystem(s),
                Err(e) => M::Error(e),
            },
            M::ListNvmeSubsystems => match handler.list_subsystems().await {
                Ok(list) => M::NvmeSubsystemList(list),
                Err(e) => M::Error(e),
            },
            M::NvmeSubsystemStats(id) => match handler.subsystem_stats(&id).await {
                Ok(stats) => M::Stats(stats),
                Err(e) => M::Error(e),
            },

            // --- NVMe controllers -------------------------------------------
            M::CreateNvmeController(spec) => match handler.create_controller(spec).await {
                Ok(s) => M::NvmeController(s),
                Err(e) => M::Error(e),
            },
            M::DeleteNvmeController(id) => match handler.delete_controller(&id).await {
                Ok(()) => M::Ok,
                Err(e) => M::Error(e),
            },
            M::UpdateNvmeController(spec) => match handler.update_controller(spec).await {
                Ok(s) => M::NvmeController(s),
                Err(e) => M::Error(e),
            },
            M::GetNvmeController(id) => match handler.get_controller(&id).await {
                Ok(s) => M::NvmeController(s),
                Err(e) => M::Error(e),
            },
            M::ListNvmeControllers { subsystem_id } => {
                match handler.list_controllers(subsystem_id.as_ref()).await {
                    Ok(list) => M::NvmeControllerList(list),
                    Err(e) => M::Error(e),
                }
            }
            M::NvmeControllerStats(id) => match handler.controller_stats(&id).await {
                Ok(stats) => M::Stats(stats),
                Err(e) => M::Error(e),
            },

            // --- NVMe namespaces --------------------------------------------
            M::CreateNvmeNamespace(spec) => match handler.create_namespace(spec).await {
                Ok(s) => M::NvmeNamespace(s),
                Err(e) => M::Error(e),
            },
            M::DeleteNvmeNamespace(id) => match handler.delete_namespace(&id).await {
                Ok(()) => M::Ok,
                Err(e) => M::Error(e),
            },
            M::UpdateNvmeNamespace(spec) => match handler.update_namespace(spec).await {
                Ok(s) => M::NvmeNamespace(s),
                Err(e) => M::Error(e),
            },
            M::GetNvmeNamespace(id) => match handler.get_namespace(&id).await {
                Ok(s) => M::NvmeNamespace(s),
                Err(e) => M::Error(e),
            },
            M::ListNvmeNamespaces { subsystem_id } => {
                match handler.list_namespaces(subsystem_id.as_ref()).await {
                    Ok(list) => M::NvmeNamespaceList(list),
                    Err(e) => M::Error(e),
                }
            }
            M::NvmeNamespaceStats(id) => match handler.namespace_stats(&id).await {
                Ok(stats) => M::Stats(stats),
                Err(e) => M::Error(e),
            },

            // --- Virtio-blk -------------------------------------------------
            M::CreateVirtioBlk(spec) => match handler.create_virtio_blk(spec).await {
                Ok(s) => M::VirtioBlk(s),
                Err(e) => M::Error(e),
            },
            M::DeleteVirtioBlk(id) => match handler.delete_virtio_blk(&id).await {
                Ok(()) => M::Ok,
                Err(e) => M::Error(e),
            },
            M::UpdateVirtioBlk(spec) => match handler.update_virtio_blk(spec).await {
                Ok(s) => M::VirtioBlk(s),
                Err(e) => M::Error(e),
            },
            M::GetVirtioBlk(id) => match handler.get_virtio_blk(&id).await {
                Ok(s) => M::VirtioBlk(s),
                Err(e) => M::Error(e),
            },
            M::ListVirtioBlks => match handler.list_virtio_blks().await {
                Ok(list) => M::VirtioBlkList(list),
                Err(e) => M::Error(e),
            },
            M::VirtioBlkStats(id) => match handler.virtio_blk_stats(&id).await {
                Ok(stats) => M::Stats(stats),
                Err(e) => M::Error(e),
            },

            // --- Virtio-scsi controllers ------------------------------------
            M::CreateVirtioScsiController(spec) => {
                match handler.create_virtio_scsi_controller(spec).await {
                    Ok(s) => M::VirtioScsiController(s),
                    Err(e) => M::Error(e),
                }
            }
            M::DeleteVirtioScsiController(id) => {
                match handler.delete_virtio_scsi_controller(&id).await {
                    Ok(()) => M::Ok,
                    Err(e) => M::Error(e),
                }
            }
            M::UpdateVirtioScsiController(spec) => {
                match handler.update_virtio_scsi_controller(spec).await {
                    Ok(s) => M::VirtioScsiController(s),
                    Err(e) => M::Error(e),
                }
            }
            M::GetVirtioScsiController(id) => {
                match handler.get_virtio_scsi_controller(&id).await {
                    Ok(s) => M::VirtioScsiController(s),
                    Err(e) => M::Error(e),
                }
            }
            M::ListVirtioScsiControllers => {
                match handler.list_virtio_scsi_controllers().await {
                    Ok(list) => M::VirtioScsiControllerList(list),
                    Err(e) => M::Error(e),
                }
            }
            M::VirtioScsiControllerStats(id) => {
                match handler.virtio_scsi_controller_stats(&id).await {
                    Ok(stats) => M::Stats(stats),
                    Err(e) => M::Error(e),
                }
            }

            // --- Virtio-scsi LUNs -------------------------------------------
            M::CreateVirtioScsiLun(spec) => match handler.create_virtio_scsi_lun(spec).await {
                Ok(s) => M::VirtioScsiLun(s),
                Err(e) => M::Error(e),
            },
            M::DeleteVirtioScsiLun(id) => match handler.delete_virtio_scsi_lun(&id).await {
                Ok(()) => M::Ok,
                Err(e) => M::Error(e),
            },
            M::UpdateVirtioScsiLun(spec) => match handler.update_virtio_scsi_lun(spec).await {
                Ok(s) => M::VirtioScsiLun(s),
                Err(e) => M::Error(e),
            },
            M::GetVirtioScsiLun(id) => match handler.get_virtio_scsi_lun(&id).await {
                Ok(s) => M::VirtioScsiLun(s),
                Err(e) => M::Error(e),
            },
            M::ListVirtioScsiLuns => match handler.list_virtio_scsi_luns().await {
                Ok(list) => M::VirtioScsiLunList(list),
                Err(e) => M::Error(e),
            },
            M::VirtioScsiLunStats(id) => match handler.virtio_scsi_lun_stats(&id).await {
                Ok(stats) => M::Stats(stats),
                Err(e) => M::Error(e),
            },

            // --- Response variants should never arrive as requests ----------
            other => {
                warn!(msg = %other, "unexpected message variant received as request");
                VstorMessage::Error(VstorError::InvalidArgument(format!(
                    "unexpected message: {other}"
                )))
            }
        }
    }

    /// Return a reference to the underlying QUIC endpoint, useful for
    /// obtaining the local address or shutting down.
    pub fn endpoint(&self) -> &quinn::Endpoint {
        &self.endpoint
    }
}
