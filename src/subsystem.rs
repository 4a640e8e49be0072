//! NVMe subsystem service trait.
//!
//! Subsystems are the top-level NVMe-oF resources.  Create and delete are
//! propagated to the engine; get and list answer from a fresh engine query,
//! using the catalog only to translate the client identifier into the
//! subsystem NQN.

use async_trait::async_trait;

use crate::error::VstorError;
use crate::types::{NvmeSubsystemSpec, ResourceId, StatsInfo};

/// NVMe subsystem management.
#[async_trait]
pub trait NvmeSubsystemService: Send + Sync {
    /// Create a subsystem in the engine and record its specification.
    ///
    /// The response is a copy of the supplied specification.
    async fn create_subsystem(
        &self,
        spec: NvmeSubsystemSpec,
    ) -> Result<NvmeSubsystemSpec, VstorError>;

    /// Delete a subsystem.  The catalog entry is removed even when the
    /// engine reports that the remote delete did not succeed.
    async fn delete_subsystem(&self, id: &ResourceId) -> Result<(), VstorError>;

    /// Replace the recorded specification.  Local-only: no engine call is
    /// made and no prior entry is required.
    async fn update_subsystem(
        &self,
        spec: NvmeSubsystemSpec,
    ) -> Result<NvmeSubsystemSpec, VstorError>;

    /// Fetch a subsystem, confirming it against live engine state.
    async fn get_subsystem(&self, id: &ResourceId) -> Result<NvmeSubsystemSpec, VstorError>;

    /// List all subsystems the engine currently exports.
    async fn list_subsystems(&self) -> Result<Vec<NvmeSubsystemSpec>, VstorError>;

    /// Engine-wide subsystem statistics, fetched fresh on every call.
    async fn subsystem_stats(&self, id: &ResourceId) -> Result<StatsInfo, VstorError>;
}
