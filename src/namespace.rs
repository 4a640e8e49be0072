//! NVMe namespace service trait.
//!
//! Namespaces reference an owning subsystem by identifier.  Create and
//! delete translate into engine add/remove operations against the owning
//! subsystem's NQN; get and list reconcile the catalog against the engine's
//! live subsystem tree, matching by NQN and then by host namespace id.

use async_trait::async_trait;

use crate::error::VstorError;
use crate::types::{NvmeNamespaceSpec, ResourceId, StatsInfo};

/// NVMe namespace management.
#[async_trait]
pub trait NvmeNamespaceService: Send + Sync {
    /// Attach a namespace to its subsystem in the engine and record its
    /// specification.
    async fn create_namespace(
        &self,
        spec: NvmeNamespaceSpec,
    ) -> Result<NvmeNamespaceSpec, VstorError>;

    /// Detach a namespace from its subsystem and remove the catalog entry.
    /// The entry is removed even when the engine reports failure.
    async fn delete_namespace(&self, id: &ResourceId) -> Result<(), VstorError>;

    /// Replace the recorded specification.  Local-only: no engine call is
    /// made and no prior entry is required.
    async fn update_namespace(
        &self,
        spec: NvmeNamespaceSpec,
    ) -> Result<NvmeNamespaceSpec, VstorError>;

    /// Fetch a namespace, confirming it against the engine's live state.
    async fn get_namespace(&self, id: &ResourceId) -> Result<NvmeNamespaceSpec, VstorError>;

    /// List namespaces, optionally restricted to one subsystem.
    ///
    /// With no filter, returns the union of every subsystem's namespaces as
    /// reported by one live engine query.  Zero matches is an
    /// [`VstorError::InvalidArgument`] error, not an empty success.
    async fn list_namespaces(
        &self,
        subsystem_id: Option<&ResourceId>,
    ) -> Result<Vec<NvmeNamespaceSpec>, VstorError>;

    /// Namespace statistics.  Unimplemented in the engine; returns the zero
    /// value.
    async fn namespace_stats(&self, id: &ResourceId) -> Result<StatsInfo, VstorError>;
}
