//! Protocol messages transmitted over the QUIC transport.
//!
//! [`VstorMessage`] is the top-level envelope for all request and response
//! variants exchanged between a frontend client and the adapter server.
//! Each bi-directional stream carries exactly one request followed by one
//! response: the client sends a *request* variant and the server replies
//! with the corresponding *response* variant (or [`VstorMessage::Error`]).

use serde::{Deserialize, Serialize};

use crate::error::VstorError;
use crate::types::*;

/// Top-level message envelope: one variant per resource operation, plus
/// the response shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VstorMessage {
    // ----- NVMe subsystem requests -----------------------------------------
    CreateNvmeSubsystem(NvmeSubsystemSpec),
    DeleteNvmeSubsystem(ResourceId),
    UpdateNvmeSubsystem(NvmeSubsystemSpec),
    GetNvmeSubsystem(ResourceId),
    ListNvmeSubsystems,
    NvmeSubsystemStats(ResourceId),

    // ----- NVMe controller requests ----------------------------------------
    CreateNvmeController(NvmeControllerSpec),
    DeleteNvmeController(ResourceId),
    UpdateNvmeController(NvmeControllerSpec),
    GetNvmeController(ResourceId),
    ListNvmeControllers { subsystem_id: Option<ResourceId> },
    NvmeControllerStats(ResourceId),

    // ----- NVMe namespace requests -----------------------------------------
    CreateNvmeNamespace(NvmeNamespaceSpec),
    DeleteNvmeNamespace(ResourceId),
    UpdateNvmeNamespace(NvmeNamespaceSpec),
    GetNvmeNamespace(ResourceId),
    ListNvmeNamespaces { subsystem_id: Option<ResourceId> },
    NvmeNamespaceStats(ResourceId),

    // ----- Virtio-blk requests ---------------------------------------------
    CreateVirtioBlk(VirtioBlkSpec),
    DeleteVirtioBlk(ResourceId),
    UpdateVirtioBlk(VirtioBlkSpec),
    GetVirtioBlk(ResourceId),
    ListVirtioBlks,
    VirtioBlkStats(ResourceId),

    // ----- Virtio-scsi controller requests ---------------------------------
    CreateVirtioScsiController(VirtioScsiControllerSpec),
    DeleteVirtioScsiController(ResourceId),
    UpdateVirtioScsiController(VirtioScsiControllerSpec),
    GetVirtioScsiController(ResourceId),
    ListVirtioScsiControllers,
    VirtioScsiControllerStats(ResourceId),

    // ----- Virtio-scsi LUN requests ----------------------------------------
    CreateVirtioScsiLun(VirtioScsiLunSpec),
    DeleteVirtioScsiLun(ResourceId),
    UpdateVirtioScsiLun(VirtioScsiLunSpec),
    GetVirtioScsiLun(ResourceId),
    ListVirtioScsiLuns,
    VirtioScsiLunStats(ResourceId),

    // ----- Responses -------------------------------------------------------
    NvmeSubsystem(NvmeSubsystemSpec),
    NvmeSubsystemList(Vec<NvmeSubsystemSpec>),
    NvmeController(NvmeControllerSpec),
    NvmeControllerList(Vec<NvmeControllerSpec>),
    NvmeNamespace(NvmeNamespaceSpec),
    NvmeNamespaceList(Vec<NvmeNamespaceSpec>),
    VirtioBlk(VirtioBlkSpec),
    VirtioBlkList(Vec<VirtioBlkSpec>),
    VirtioScsiController(VirtioScsiControllerSpec),
    VirtioScsiControllerList(Vec<VirtioScsiControllerSpec>),
    VirtioScsiLun(VirtioScsiLunSpec),
    VirtioScsiLunList(Vec<VirtioScsiLunSpec>),
    Stats(StatsInfo),

    /// Generic success acknowledgement (no payload).
    Ok,
    /// An error occurred.
    Error(VstorError),
}

impl std::fmt::Display for VstorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateNvmeSubsystem(s) => write!(f, "CreateNvmeSubsystem({})", s.id),
            Self::DeleteNvmeSubsystem(id) => write!(f, "DeleteNvmeSubsystem({id})"),
            Self::UpdateNvmeSubsystem(s) => write!(f, "UpdateNvmeSubsystem({})", s.id),
            Self::GetNvmeSubsystem(id) => write!(f, "GetNvmeSubsystem({id})"),
            Self::ListNvmeSubsystems => f.write_str("ListNvmeSubsystems"),
            Self::NvmeSubsystemStats(id) => write!(f, "NvmeSubsystemStats({id})"),

            Self::CreateNvmeController(s) => write!(f, "CreateNvmeController({})", s.id),
            Self::DeleteNvmeController(id) => write!(f, "DeleteNvmeController({id})"),
            Self::UpdateNvmeController(s) => write!(f, "UpdateNvmeController({})", s.id),
            Self::GetNvmeController(id) => write!(f, "GetNvmeController({id})"),
            Self::ListNvmeControllers { subsystem_id } => match subsystem_id {
                Some(id) => write!(f, "ListNvmeControllers(subsystem={id})"),
                None => f.write_str("ListNvmeControllers"),
            },
            Self::NvmeControllerStats(id) => write!(f, "NvmeControllerStats({id})"),

            Self::CreateNvmeNamespace(s) => write!(f, "CreateNvmeNamespace({})", s.id),
            Self::DeleteNvmeNamespace(id) => write!(f, "DeleteNvmeNamespace({id})"),
            Self::UpdateNvmeNamespace(s) => write!(f, "UpdateNvmeNamespace({})", s.id),
            Self::GetNvmeNamespace(id) => write!(f, "GetNvmeNamespace({id})"),
            Self::ListNvmeNamespaces { subsystem_id } => match subsystem_id {
                Some(id) => write!(f, "ListNvmeNamespaces(subsystem={id})"),
                None => f.write_str("ListNvmeNamespaces"),
            },
            Self::NvmeNamespaceStats(id) => write!(f, "NvmeNamespaceStats({id})"),

            Self::CreateVirtioBlk(s) => write!(f, "CreateVirtioBlk({})", s.id),
            Self::DeleteVirtioBlk(id) => write!(f, "DeleteVirtioBlk({id})"),
            Self::UpdateVirtioBlk(s) => write!(f, "UpdateVirtioBlk({})", s.id),
            Self::GetVirtioBlk(id) => write!(f, "GetVirtioBlk({id})"),
            Self::ListVirtioBlks => f.write_str("ListVirtioBlks"),
            Self::VirtioBlkStats(id) => write!(f, "VirtioBlkStats({id})"),

            Self::CreateVirtioScsiController(s) => {
                write!(f, "CreateVirtioScsiController({})", s.id)
            }
            Self::DeleteVirtioScsiController(id) => {
                write!(f, "DeleteVirtioScsiController({id})")
            }
            Self::UpdateVirtioScsiController(s) => {
                write!(f, "UpdateVirtioScsiController({})", s.id)
            }
            Self::GetVirtioScsiController(id) => write!(f, "GetVirtioScsiController({id})"),
            Self::ListVirtioScsiControllers => f.write_str("ListVirtioScsiControllers"),
            Self::VirtioScsiControllerStats(id) => {
                write!(f, "VirtioScsiControllerStats({id})")
            }

            Self::CreateVirtioScsiLun(s) => write!(f, "CreateVirtioScsiLun({})", s.target_id),
            Self::DeleteVirtioScsiLun(id) => write!(f, "DeleteVirtioScsiLun({id})"),
            Self::UpdateVirtioScsiLun(s) => write!(f, "UpdateVirtioScsiLun({})", s.target_id),
            Self::GetVirtioScsiLun(id) => write!(f, "GetVirtioScsiLun({id})"),
            Self::ListVirtioScsiLuns => f.write_str("ListVirtioScsiLuns"),
            Self::VirtioScsiLunStats(id) => write!(f, "VirtioScsiLunStats({id})"),

            Self::NvmeSubsystem(s) => write!(f, "NvmeSubsystem({})", s.nqn),
            Self::NvmeSubsystemList(list) => write!(f, "NvmeSubsystemList(count={})", list.len()),
            Self::NvmeController(s) => write!(f, "NvmeController({})", s.id),
            Self::NvmeControllerList(list) => {
                write!(f, "NvmeControllerList(count={})", list.len())
            }
            Self::NvmeNamespace(s) => write!(f, "NvmeNamespace({})", s.id),
            Self::NvmeNamespaceList(list) => {
                write!(f, "NvmeNamespaceList(count={})", list.len())
            }
            Self::VirtioBlk(s) => write!(f, "VirtioBlk({})", s.id),
            Self::VirtioBlkList(list) => write!(f, "VirtioBlkList(count={})", list.len()),
            Self::VirtioScsiController(s) => write!(f, "VirtioScsiController({})", s.id),
            Self::VirtioScsiControllerList(list) => {
                write!(f, "VirtioScsiControllerList(count={})", list.len())
            }
            Self::VirtioScsiLun(s) => write!(f, "VirtioScsiLun({})", s.volume_id),
            Self::VirtioScsiLunList(list) => {
                write!(f, "VirtioScsiLunList(count={})", list.len())
            }
            Self::Stats(stats) => write!(f, "Stats({})", stats.stats),

            Self::Ok => f.write_str("Ok"),
            Self::Error(e) => write!(f, "Error({e})"),
        }
    }
}
