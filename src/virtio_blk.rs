//! Virtio-blk service trait.
//!
//! Virtio-blk controllers are catalog-less: creation goes straight to the
//! engine and read operations query the engine by vhost handle name, with
//! the client identifier doubling as that handle.

use async_trait::async_trait;

use crate::error::VstorError;
use crate::types::{ResourceId, StatsInfo, VirtioBlkSpec};

/// Virtio-blk controller management.
#[async_trait]
pub trait VirtioBlkService: Send + Sync {
    /// Create a vhost block controller in the engine.  Returns a minimal
    /// response; nothing is recorded locally.
    async fn create_virtio_blk(&self, spec: VirtioBlkSpec) -> Result<VirtioBlkSpec, VstorError>;

    /// Delete the vhost controller with the given handle name.
    async fn delete_virtio_blk(&self, id: &ResourceId) -> Result<(), VstorError>;

    /// Acknowledged but otherwise a no-op: there is no catalog to update
    /// and no engine operation to issue.
    async fn update_virtio_blk(&self, spec: VirtioBlkSpec) -> Result<VirtioBlkSpec, VstorError>;

    /// Fetch one controller by handle name.  Exactly one engine match is
    /// required; any other count is [`VstorError::InvalidArgument`].
    async fn get_virtio_blk(&self, id: &ResourceId) -> Result<VirtioBlkSpec, VstorError>;

    /// List all vhost controllers the engine reports.
    async fn list_virtio_blks(&self) -> Result<Vec<VirtioBlkSpec>, VstorError>;

    /// Controller statistics.  Unimplemented in the engine; returns the
    /// zero value.
    async fn virtio_blk_stats(&self, id: &ResourceId) -> Result<StatsInfo, VstorError>;
}
