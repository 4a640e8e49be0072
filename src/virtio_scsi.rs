//! Virtio-scsi service traits.
//!
//! Covers the virtio-scsi controller and the LUNs attached to it.  Both are
//! catalog-less, like virtio-blk: writes go straight to the engine and reads
//! query it by vhost handle name.  LUN attach and detach address a fixed
//! target index on the controller.

use async_trait::async_trait;

use crate::error::VstorError;
use crate::types::{ResourceId, StatsInfo, VirtioScsiControllerSpec, VirtioScsiLunSpec};

/// Virtio-scsi controller management.
#[async_trait]
pub trait VirtioScsiControllerService: Send + Sync {
    /// Create a vhost SCSI controller in the engine.  Returns a minimal
    /// response; nothing is recorded locally.
    async fn create_virtio_scsi_controller(
        &self,
        spec: VirtioScsiControllerSpec,
    ) -> Result<VirtioScsiControllerSpec, VstorError>;

    /// Delete the vhost controller with the given handle name.
    async fn delete_virtio_scsi_controller(&self, id: &ResourceId) -> Result<(), VstorError>;

    /// Acknowledged but otherwise a no-op.
    async fn update_virtio_scsi_controller(
        &self,
        spec: VirtioScsiControllerSpec,
    ) -> Result<VirtioScsiControllerSpec, VstorError>;

    /// Fetch one controller by handle name.  Exactly one engine match is
    /// required.
    async fn get_virtio_scsi_controller(
        &self,
        id: &ResourceId,
    ) -> Result<VirtioScsiControllerSpec, VstorError>;

    /// List all vhost controllers the engine reports.
    async fn list_virtio_scsi_controllers(
        &self,
    ) -> Result<Vec<VirtioScsiControllerSpec>, VstorError>;

    /// Controller statistics.  Unimplemented in the engine; returns the
    /// zero value.
    async fn virtio_scsi_controller_stats(
        &self,
        id: &ResourceId,
    ) -> Result<StatsInfo, VstorError>;
}

/// Virtio-scsi LUN management.
#[async_trait]
pub trait VirtioScsiLunService: Send + Sync {
    /// Attach a LUN to the controller named in the specification's
    /// `target_id`, at the fixed target index.
    async fn create_virtio_scsi_lun(
        &self,
        spec: VirtioScsiLunSpec,
    ) -> Result<VirtioScsiLunSpec, VstorError>;

    /// Detach the LUN at the fixed target index from the given controller.
    async fn delete_virtio_scsi_lun(&self, controller_id: &ResourceId) -> Result<(), VstorError>;

    /// Acknowledged but otherwise a no-op.
    async fn update_virtio_scsi_lun(
        &self,
        spec: VirtioScsiLunSpec,
    ) -> Result<VirtioScsiLunSpec, VstorError>;

    /// Fetch LUN information for one controller by handle name.  Exactly
    /// one engine match is required.
    async fn get_virtio_scsi_lun(
        &self,
        controller_id: &ResourceId,
    ) -> Result<VirtioScsiLunSpec, VstorError>;

    /// List LUN information across all vhost controllers.
    async fn list_virtio_scsi_luns(&self) -> Result<Vec<VirtioScsiLunSpec>, VstorError>;

    /// LUN statistics.  Unimplemented in the engine; returns the zero
    /// value.
    async fn virtio_scsi_lun_stats(&self, id: &ResourceId) -> Result<StatsInfo, VstorError>;
}
