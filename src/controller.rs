//! NVMe controller service trait.
//!
//! Controllers are tracked purely in the local catalog: no engine operation
//! exists for them in the control protocol this adapter speaks, so every
//! operation here is a catalog read or write.

use async_trait::async_trait;

use crate::error::VstorError;
use crate::types::{NvmeControllerSpec, ResourceId, StatsInfo};

/// NVMe controller management.  Catalog-only.
#[async_trait]
pub trait NvmeControllerService: Send + Sync {
    /// Record a controller specification.
    async fn create_controller(
        &self,
        spec: NvmeControllerSpec,
    ) -> Result<NvmeControllerSpec, VstorError>;

    /// Remove a controller from the catalog.
    async fn delete_controller(&self, id: &ResourceId) -> Result<(), VstorError>;

    /// Replace the recorded specification.  No prior entry is required.
    async fn update_controller(
        &self,
        spec: NvmeControllerSpec,
    ) -> Result<NvmeControllerSpec, VstorError>;

    /// Fetch a controller from the catalog.
    async fn get_controller(&self, id: &ResourceId) -> Result<NvmeControllerSpec, VstorError>;

    /// List all recorded controllers.  The subsystem filter is accepted but
    /// not applied.
    async fn list_controllers(
        &self,
        subsystem_id: Option<&ResourceId>,
    ) -> Result<Vec<NvmeControllerSpec>, VstorError>;

    /// Controller statistics.  Unimplemented in the engine; returns the
    /// zero value.
    async fn controller_stats(&self, id: &ResourceId) -> Result<StatsInfo, VstorError>;
}
