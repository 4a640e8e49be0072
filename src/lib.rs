//! # libvstor — virtualized storage provisioning over a remote engine
//!
//! `libvstor` is a control-plane adapter: it exposes a typed API for
//! managing virtualized storage resources (NVMe-oF subsystems, controllers,
//! and namespaces; virtio-blk and virtio-scsi devices) and realizes each
//! operation by issuing commands to a stateful storage engine over its
//! JSON-RPC control socket.  Per-kind catalogs keep the last-known desired
//! state; read operations reconcile catalog entries against fresh engine
//! queries.  It follows the RK8s architecture conventions (Tokio async
//! runtime, `tracing` for observability, `thiserror` for structured
//! errors).
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |---|---|
//! | [`types`] | Core data model: resource identifiers and specifications. |
//! | [`error`] | [`VstorError`] enum covering all failure modes. |
//! | [`catalog`] | [`Catalog`] — concurrent keyed store per resource kind. |
//! | [`message`] | [`VstorMessage`] protocol envelope for QUIC transport. |
//! | [`subsystem`], [`controller`], [`namespace`] | NVMe service traits. |
//! | [`virtio_blk`], [`virtio_scsi`] | Virtio service traits. |
//! | [`engine`] | Engine gateway trait, JSON-RPC client, wire shapes. |
//! | [`backend`] | [`SpdkBackend`] — catalogs + translation + reconciliation. |
//! | [`transport`] | QUIC client/server built on `quinn`. |

pub mod backend;
pub mod catalog;
pub mod controller;
pub mod engine;
pub mod error;
pub mod message;
pub mod namespace;
pub mod subsystem;
pub mod transport;
pub mod types;
pub mod virtio_blk;
pub mod virtio_scsi;

// Re-export the most commonly used items at crate root for convenience.
pub use backend::SpdkBackend;
pub use catalog::Catalog;
pub use controller::NvmeControllerService;
pub use engine::EngineGateway;
pub use error::VstorError;
pub use message::VstorMessage;
pub use namespace::NvmeNamespaceService;
pub use subsystem::NvmeSubsystemService;
pub use types::*;
pub use virtio_blk::VirtioBlkService;
pub use virtio_scsi::{VirtioScsiControllerService, VirtioScsiLunService};
