//! Core resource types: identifiers, per-kind specifications, and stats.
//!
//! These types form the data model shared by the service traits, transport
//! layer, and the engine-backed implementation.  They are all
//! [`Serialize`]/[`Deserialize`] so they can be transmitted over QUIC as
//! JSON.
//!
//! A specification holds the desired state exactly as the client supplied
//! it at creation time.  The engine-meaningful correlation key (NQN for
//! subsystems, controller handle name for vhost devices) is part of the
//! specification, derived by the caller, never generated by the adapter.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Resource identity
// ---------------------------------------------------------------------------

/// Opaque, client-chosen identifier for a resource.
///
/// Unique within the catalog of its resource kind and immutable for the
/// lifetime of the catalog entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceId(pub String);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// NVMe resources
// ---------------------------------------------------------------------------

/// An NVMe-oF subsystem exported by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NvmeSubsystemSpec {
    /// Client-facing identifier.
    pub id: ResourceId,
    /// NVMe qualified name.  Correlation key inside the engine.
    pub nqn: String,
}

/// An NVMe controller within a subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NvmeControllerSpec {
    /// Client-facing identifier.
    pub id: ResourceId,
    /// Identifier of the owning subsystem.
    pub subsystem_id: ResourceId,
    /// Controller id as presented to the NVMe host.
    pub nvme_controller_id: i32,
}

/// An NVMe namespace backed by a middle-end volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NvmeNamespaceSpec {
    /// Client-facing identifier.
    pub id: ResourceId,
    /// Identifier of the owning subsystem.  Foreign key into the subsystem
    /// catalog; the referenced entry may be absent.
    pub subsystem_id: ResourceId,
    /// Handle of the backing volume, passed to the engine as the
    /// block-device name.
    pub volume_id: ResourceId,
    /// Namespace id as seen by the host.  Used to locate the namespace in
    /// the engine on delete and get.
    pub host_nsid: i32,
}

// ---------------------------------------------------------------------------
// Virtio resources
// ---------------------------------------------------------------------------

/// A virtio-blk controller.  The id doubles as the engine's vhost
/// controller handle name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VirtioBlkSpec {
    /// Client-facing identifier and vhost handle name.
    pub id: ResourceId,
    /// Handle of the backing volume.
    pub volume_id: ResourceId,
}

/// A virtio-scsi controller.  The id doubles as the engine's vhost
/// controller handle name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VirtioScsiControllerSpec {
    /// Client-facing identifier and vhost handle name.
    pub id: ResourceId,
}

/// A LUN attached to a virtio-scsi controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VirtioScsiLunSpec {
    /// Identifier of the owning virtio-scsi controller.
    pub target_id: ResourceId,
    /// Handle of the backing volume.
    pub volume_id: ResourceId,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics wrapper returned by the stats operations.
///
/// Only the subsystem stats path fills this in (engine tick rate); every
/// other kind returns the zero value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatsInfo {
    /// Rendered statistics value.
    #[serde(default)]
    pub stats: String,
}
