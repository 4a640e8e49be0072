//! SPDK-style engine backend.
//!
//! [`SpdkBackend`] implements every resource service trait by translating
//! typed requests into engine control-protocol calls and keeping per-kind
//! catalogs of desired-state metadata.
//!
//! # Catalog discipline
//!
//! A catalog entry exists for an identifier exactly when a create has
//! completed and no delete has completed since.  Creates insert only after
//! the engine call returns without failure; deletes remove the entry even
//! when the engine reports the remote delete did not succeed, optimistically
//! forgetting the resource.  Updates are blind local overwrites that never
//! reach the engine.
//!
//! Read paths treat the engine as the source of truth for existence and
//! identity: the catalog only translates client identifiers into engine
//! correlation keys (subsystem NQN, vhost handle name), and a fresh engine
//! query decides what is returned.
//!
//! # Thread safety
//!
//! Catalogs are concurrent maps ([`Catalog`]), so single-key lookups and
//! mutations are safe under concurrent request handling.  Sequences that
//! span an engine call (resolve reference, call, insert) are not locked
//! across the await; callers must not depend on interleaving order.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::catalog::Catalog;
use crate::controller::NvmeControllerService;
use crate::engine::EngineGateway;
use crate::engine::params::*;
use crate::error::VstorError;
use crate::namespace::NvmeNamespaceService;
use crate::subsystem::NvmeSubsystemService;
use crate::types::*;
use crate::virtio_blk::VirtioBlkService;
use crate::virtio_scsi::{VirtioScsiControllerService, VirtioScsiLunService};

/// Serial number assigned to every subsystem at creation.
const SERIAL_NUMBER: &str = "SPDK0";

/// Subsystems are created open to any host.
const ALLOW_ANY_HOST: bool = true;

/// SCSI target index used for every LUN attach and detach.  The engine
/// supports per-request indices; this adapter does not derive one yet.
const SCSI_TARGET_INDEX: i32 = 5;

/// Storage frontend backed by an SPDK-style engine behind an
/// [`EngineGateway`].
pub struct SpdkBackend<G> {
    gateway: G,
    /// Subsystem specifications, keyed by client identifier.
    subsystems: Catalog<NvmeSubsystemSpec>,
    /// Controller specifications, keyed by client identifier.
    controllers: Catalog<NvmeControllerSpec>,
    /// Namespace specifications, keyed by client identifier.
    namespaces: Catalog<NvmeNamespaceSpec>,
}

impl<G: EngineGateway> SpdkBackend<G> {
    /// Create a backend with empty catalogs.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            subsystems: Catalog::new(),
            controllers: Catalog::new(),
            namespaces: Catalog::new(),
        }
    }

    /// Serialize `params`, invoke one engine operation, and decode the
    /// typed result.
    async fn call<P, R>(&self, method: &str, params: Option<&P>) -> Result<R, VstorError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let params = match params {
            Some(p) => Some(serde_json::to_value(p).map_err(VstorError::internal)?),
            None => None,
        };
        let result = self.gateway.invoke(method, params).await?;
        serde_json::from_value(result)
            .map_err(|e| VstorError::engine(method, format!("undecodable result: {e}")))
    }

    /// One live query for the engine's full subsystem tree.
    async fn live_subsystems(&self) -> Result<Vec<NvmfSubsystemInfo>, VstorError> {
        self.call::<(), Vec<NvmfSubsystemInfo>>("nvmf_get_subsystems", None)
            .await
    }

    /// One live query for all vhost controllers.
    async fn live_vhost_controllers(&self) -> Result<Vec<VhostControllerInfo>, VstorError> {
        self.call::<(), Vec<VhostControllerInfo>>("vhost_get_controllers", None)
            .await
    }

    /// Query the engine for the vhost controller with the given handle
    /// name, enforcing that exactly one matches.
    async fn vhost_controller_by_name(
        &self,
        name: &ResourceId,
    ) -> Result<VhostControllerInfo, VstorError> {
        let params = VhostGetControllersParams {
            name: name.0.clone(),
        };
        let mut found: Vec<VhostControllerInfo> =
            self.call("vhost_get_controllers", Some(&params)).await?;
        if found.len() != 1 {
            let msg = format!("expecting exactly 1 result for {name}, got {}", found.len());
            warn!("{msg}");
            return Err(VstorError::InvalidArgument(msg));
        }
        Ok(found.remove(0))
    }

    /// Resolve a subsystem reference to its NQN.
    ///
    /// When the referenced entry is absent the raw reference string is used
    /// as the NQN instead of failing.  Known inconsistency: the caller may
    /// have referenced an identifier the adapter never created.
    fn subsystem_nqn(&self, id: &ResourceId) -> String {
        match self.subsystems.get(id) {
            Some(subsys) => subsys.nqn,
            None => {
                warn!(subsystem_id = %id, "subsystem not in catalog, using raw reference as NQN");
                id.0.clone()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// NVMe subsystems
// ---------------------------------------------------------------------------

#[async_trait]
impl<G: EngineGateway> NvmeSubsystemService for SpdkBackend<G> {
    #[instrument(skip(self, spec), fields(id = %spec.id, nqn = %spec.nqn))]
    async fn create_subsystem(
        &self,
        spec: NvmeSubsystemSpec,
    ) -> Result<NvmeSubsystemSpec, VstorError> {
        let params = NvmfCreateSubsystemParams {
            nqn: spec.nqn.clone(),
            serial_number: SERIAL_NUMBER.to_owned(),
            allow_any_host: ALLOW_ANY_HOST,
        };
        let created: bool = self.call("nvmf_create_subsystem", Some(&params)).await?;
        debug!(created, "engine create returned");

        self.subsystems.put(spec.id.clone(), spec.clone());
        info!("subsystem created");
        Ok(spec)
    }

    #[instrument(skip(self))]
    async fn delete_subsystem(&self, id: &ResourceId) -> Result<(), VstorError> {
        let subsys = self
            .subsystems
            .get(id)
            .ok_or_else(|| VstorError::NotFound(id.to_string()))?;

        let params = NvmfDeleteSubsystemParams {
            nqn: subsys.nqn.clone(),
        };
        let deleted: bool = self.call("nvmf_delete_subsystem", Some(&params)).await?;
        if !deleted {
            warn!(nqn = %subsys.nqn, "engine could not delete subsystem, forgetting it anyway");
        }

        self.subsystems.remove(id);
        info!("subsystem deleted");
        Ok(())
    }

    #[instrument(skip(self, spec), fields(id = %spec.id))]
    async fn update_subsystem(
        &self,
        spec: NvmeSubsystemSpec,
    ) -> Result<NvmeSubsystemSpec, VstorError> {
        self.subsystems.put(spec.id.clone(), spec.clone());
        Ok(spec)
    }

    #[instrument(skip(self))]
    async fn get_subsystem(&self, id: &ResourceId) -> Result<NvmeSubsystemSpec, VstorError> {
        let subsys = self
            .subsystems
            .get(id)
            .ok_or_else(|| VstorError::NotFound(id.to_string()))?;

        let live = self.live_subsystems().await?;
        for entry in live {
            if entry.nqn == subsys.nqn {
                return Ok(NvmeSubsystemSpec {
                    id: id.clone(),
                    nqn: entry.nqn,
                });
            }
        }

        let msg = format!("could not find NQN {}", subsys.nqn);
        warn!("{msg}");
        Err(VstorError::InvalidArgument(msg))
    }

    #[instrument(skip(self))]
    async fn list_subsystems(&self) -> Result<Vec<NvmeSubsystemSpec>, VstorError> {
        let live = self.live_subsystems().await?;
        Ok(live
            .into_iter()
            .map(|entry| NvmeSubsystemSpec {
                nqn: entry.nqn,
                ..Default::default()
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn subsystem_stats(&self, id: &ResourceId) -> Result<StatsInfo, VstorError> {
        let stats: NvmfStats = self.call::<(), _>("nvmf_get_stats", None).await?;
        debug!(tick_rate = stats.tick_rate, "engine stats fetched");
        Ok(StatsInfo {
            stats: stats.tick_rate.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// NVMe controllers — catalog only
// ---------------------------------------------------------------------------

#[async_trait]
impl<G: EngineGateway> NvmeControllerService for SpdkBackend<G> {
    #[instrument(skip(self, spec), fields(id = %spec.id))]
    async fn create_controller(
        &self,
        spec: NvmeControllerSpec,
    ) -> Result<NvmeControllerSpec, VstorError> {
        self.controllers.put(spec.id.clone(), spec.clone());
        info!("controller recorded");
        Ok(spec)
    }

    #[instrument(skip(self))]
    async fn delete_controller(&self, id: &ResourceId) -> Result<(), VstorError> {
        self.controllers
            .remove(id)
            .ok_or_else(|| VstorError::NotFound(id.to_string()))?;
        info!("controller removed");
        Ok(())
    }

    #[instrument(skip(self, spec), fields(id = %spec.id))]
    async fn update_controller(
        &self,
        spec: NvmeControllerSpec,
    ) -> Result<NvmeControllerSpec, VstorError> {
        self.controllers.put(spec.id.clone(), spec.clone());
        Ok(spec)
    }

    #[instrument(skip(self))]
    async fn get_controller(&self, id: &ResourceId) -> Result<NvmeControllerSpec, VstorError> {
        self.controllers
            .get(id)
            .ok_or_else(|| VstorError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    async fn list_controllers(
        &self,
        subsystem_id: Option<&ResourceId>,
    ) -> Result<Vec<NvmeControllerSpec>, VstorError> {
        if let Some(filter) = subsystem_id {
            debug!(%filter, "controller list filter is not applied");
        }
        Ok(self.controllers.list())
    }

    #[instrument(skip(self))]
    async fn controller_stats(&self, id: &ResourceId) -> Result<StatsInfo, VstorError> {
        Ok(StatsInfo::default())
    }
}

// ---------------------------------------------------------------------------
// NVMe namespaces
// ---------------------------------------------------------------------------

#[async_trait]
impl<G: EngineGateway> NvmeNamespaceService for SpdkBackend<G> {
    #[instrument(skip(self, spec), fields(id = %spec.id, subsystem_id = %spec.subsystem_id))]
    async fn create_namespace(
        &self,
        spec: NvmeNamespaceSpec,
    ) -> Result<NvmeNamespaceSpec, VstorError> {
        let nqn = self.subsystem_nqn(&spec.subsystem_id);
        let params = NvmfSubsystemAddNsParams {
            nqn,
            namespace: NvmfNamespaceParams {
                bdev_name: spec.volume_id.0.clone(),
            },
        };
        let nsid: i32 = self.call("nvmf_subsystem_add_ns", Some(&params)).await?;
        debug!(nsid, "engine assigned namespace id");

        self.namespaces.put(spec.id.clone(), spec.clone());
        info!("namespace created");
        Ok(spec)
    }

    #[instrument(skip(self))]
    async fn delete_namespace(&self, id: &ResourceId) -> Result<(), VstorError> {
        let namespace = self
            .namespaces
            .get(id)
            .ok_or_else(|| VstorError::NotFound(id.to_string()))?;

        let params = NvmfSubsystemRemoveNsParams {
            nqn: self.subsystem_nqn(&namespace.subsystem_id),
            nsid: namespace.host_nsid,
        };
        let removed: bool = self.call("nvmf_subsystem_remove_ns", Some(&params)).await?;
        if !removed {
            warn!(nsid = namespace.host_nsid, "engine could not remove namespace, forgetting it anyway");
        }

        self.namespaces.remove(id);
        info!("namespace deleted");
        Ok(())
    }

    #[instrument(skip(self, spec), fields(id = %spec.id))]
    async fn update_namespace(
        &self,
        spec: NvmeNamespaceSpec,
    ) -> Result<NvmeNamespaceSpec, VstorError> {
        self.namespaces.put(spec.id.clone(), spec.clone());
        Ok(spec)
    }

    #[instrument(skip(self))]
    async fn get_namespace(&self, id: &ResourceId) -> Result<NvmeNamespaceSpec, VstorError> {
        let namespace = self
            .namespaces
            .get(id)
            .ok_or_else(|| VstorError::NotFound(id.to_string()))?;
        let nqn = self.subsystem_nqn(&namespace.subsystem_id);

        let live = self.live_subsystems().await?;
        for subsys in live {
            if subsys.nqn != nqn {
                continue;
            }
            for ns in subsys.namespaces {
                if ns.nsid == namespace.host_nsid {
                    return Ok(NvmeNamespaceSpec {
                        id: namespace.id.clone(),
                        subsystem_id: namespace.subsystem_id.clone(),
                        volume_id: ns.bdev_name.into(),
                        host_nsid: ns.nsid,
                    });
                }
            }
            let msg = format!("could not find NSID {}", namespace.host_nsid);
            warn!("{msg}");
            return Err(VstorError::InvalidArgument(msg));
        }

        let msg = format!("could not find NQN {nqn}");
        warn!("{msg}");
        Err(VstorError::InvalidArgument(msg))
    }

    #[instrument(skip(self))]
    async fn list_namespaces(
        &self,
        subsystem_id: Option<&ResourceId>,
    ) -> Result<Vec<NvmeNamespaceSpec>, VstorError> {
        // Empty filter NQN means "all subsystems".
        let nqn = match subsystem_id {
            Some(filter) => match self.subsystems.get(filter) {
                Some(subsys) => subsys.nqn,
                None => {
                    let err = VstorError::UnresolvedReference(format!(
                        "subsystem {filter} is not in the catalog"
                    ));
                    warn!(error = %err, "namespace list filter did not resolve");
                    return Err(err);
                }
            },
            None => String::new(),
        };

        let live = self.live_subsystems().await?;
        let mut result = Vec::new();
        for subsys in live {
            if nqn.is_empty() || subsys.nqn == nqn {
                for ns in subsys.namespaces {
                    result.push(NvmeNamespaceSpec {
                        volume_id: ns.bdev_name.into(),
                        host_nsid: ns.nsid,
                        ..Default::default()
                    });
                }
            }
        }

        if result.is_empty() {
            let msg = format!("no namespaces found for NQN {nqn}");
            warn!("{msg}");
            return Err(VstorError::InvalidArgument(msg));
        }
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn namespace_stats(&self, id: &ResourceId) -> Result<StatsInfo, VstorError> {
        Ok(StatsInfo::default())
    }
}

// ---------------------------------------------------------------------------
// Virtio-blk — catalog-less
// ---------------------------------------------------------------------------

#[async_trait]
impl<G: EngineGateway> VirtioBlkService for SpdkBackend<G> {
    #[instrument(skip(self, spec), fields(id = %spec.id))]
    async fn create_virtio_blk(&self, spec: VirtioBlkSpec) -> Result<VirtioBlkSpec, VstorError> {
        let params = VhostCreateBlkControllerParams {
            ctrlr: spec.id.0.clone(),
            dev_name: spec.volume_id.0.clone(),
        };
        let created: bool = self
            .call("vhost_create_blk_controller", Some(&params))
            .await?;
        if !created {
            warn!(ctrlr = %spec.id, "engine could not create vhost blk controller");
        }
        info!("virtio-blk controller created");
        Ok(VirtioBlkSpec::default())
    }

    #[instrument(skip(self))]
    async fn delete_virtio_blk(&self, id: &ResourceId) -> Result<(), VstorError> {
        let params = VhostDeleteControllerParams {
            ctrlr: id.0.clone(),
        };
        let deleted: bool = self.call("vhost_delete_controller", Some(&params)).await?;
        if !deleted {
            warn!(ctrlr = %id, "engine could not delete vhost controller");
        }
        info!("virtio-blk controller deleted");
        Ok(())
    }

    #[instrument(skip(self, spec), fields(id = %spec.id))]
    async fn update_virtio_blk(&self, spec: VirtioBlkSpec) -> Result<VirtioBlkSpec, VstorError> {
        Ok(VirtioBlkSpec::default())
    }

    #[instrument(skip(self))]
    async fn get_virtio_blk(&self, id: &ResourceId) -> Result<VirtioBlkSpec, VstorError> {
        let info = self.vhost_controller_by_name(id).await?;
        Ok(VirtioBlkSpec {
            id: info.ctrlr.into(),
            ..Default::default()
        })
    }

    #[instrument(skip(self))]
    async fn list_virtio_blks(&self) -> Result<Vec<VirtioBlkSpec>, VstorError> {
        let live = self.live_vhost_controllers().await?;
        Ok(live
            .into_iter()
            .map(|entry| VirtioBlkSpec {
                id: entry.ctrlr.into(),
                ..Default::default()
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn virtio_blk_stats(&self, id: &ResourceId) -> Result<StatsInfo, VstorError> {
        Ok(StatsInfo::default())
    }
}

// ---------------------------------------------------------------------------
// Virtio-scsi controllers — catalog-less
// ---------------------------------------------------------------------------

#[async_trait]
impl<G: EngineGateway> VirtioScsiControllerService for SpdkBackend<G> {
    #[instrument(skip(self, spec), fields(id = %spec.id))]
    async fn create_virtio_scsi_controller(
        &self,
        spec: VirtioScsiControllerSpec,
    ) -> Result<VirtioScsiControllerSpec, VstorError> {
        let params = VhostCreateScsiControllerParams {
            ctrlr: spec.id.0.clone(),
        };
        let created: bool = self
            .call("vhost_create_scsi_controller", Some(&params))
            .await?;
        if !created {
            warn!(ctrlr = %spec.id, "engine could not create vhost scsi controller");
        }
        info!("virtio-scsi controller created");
        Ok(VirtioScsiControllerSpec::default())
    }

    #[instrument(skip(self))]
    async fn delete_virtio_scsi_controller(&self, id: &ResourceId) -> Result<(), VstorError> {
        let params = VhostDeleteControllerParams {
            ctrlr: id.0.clone(),
        };
        let deleted: bool = self.call("vhost_delete_controller", Some(&params)).await?;
        if !deleted {
            warn!(ctrlr = %id, "engine could not delete vhost controller");
        }
        info!("virtio-scsi controller deleted");
        Ok(())
    }

    #[instrument(skip(self, spec), fields(id = %spec.id))]
    async fn update_virtio_scsi_controller(
        &self,
        spec: VirtioScsiControllerSpec,
    ) -> Result<VirtioScsiControllerSpec, VstorError> {
        Ok(VirtioScsiControllerSpec::default())
    }

    #[instrument(skip(self))]
    async fn get_virtio_scsi_controller(
        &self,
        id: &ResourceId,
    ) -> Result<VirtioScsiControllerSpec, VstorError> {
        let info = self.vhost_controller_by_name(id).await?;
        Ok(VirtioScsiControllerSpec {
            id: info.ctrlr.into(),
        })
    }

    #[instrument(skip(self))]
    async fn list_virtio_scsi_controllers(
        &self,
    ) -> Result<Vec<VirtioScsiControllerSpec>, VstorError> {
        let live = self.live_vhost_controllers().await?;
        Ok(live
            .into_iter()
            .map(|entry| VirtioScsiControllerSpec {
                id: entry.ctrlr.into(),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn virtio_scsi_controller_stats(
        &self,
        id: &ResourceId,
    ) -> Result<StatsInfo, VstorError> {
        Ok(StatsInfo::default())
    }
}

// ---------------------------------------------------------------------------
// Virtio-scsi LUNs — catalog-less
// ---------------------------------------------------------------------------

#[async_trait]
impl<G: EngineGateway> VirtioScsiLunService for SpdkBackend<G> {
    #[instrument(skip(self, spec), fields(target_id = %spec.target_id))]
    async fn create_virtio_scsi_lun(
        &self,
        spec: VirtioScsiLunSpec,
    ) -> Result<VirtioScsiLunSpec, VstorError> {
        let params = VhostScsiAddTargetParams {
            ctrlr: spec.target_id.0.clone(),
            scsi_target_num: SCSI_TARGET_INDEX,
            bdev_name: spec.volume_id.0.clone(),
        };
        let target: i32 = self
            .call("vhost_scsi_controller_add_target", Some(&params))
            .await?;
        debug!(target, "engine attached scsi target");
        info!("virtio-scsi lun created");
        Ok(VirtioScsiLunSpec::default())
    }

    #[instrument(skip(self))]
    async fn delete_virtio_scsi_lun(
        &self,
        controller_id: &ResourceId,
    ) -> Result<(), VstorError> {
        let params = VhostScsiRemoveTargetParams {
            ctrlr: controller_id.0.clone(),
            scsi_target_num: SCSI_TARGET_INDEX,
        };
        let removed: bool = self
            .call("vhost_scsi_controller_remove_target", Some(&params))
            .await?;
        if !removed {
            warn!(ctrlr = %controller_id, "engine could not remove scsi target");
        }
        info!("virtio-scsi lun deleted");
        Ok(())
    }

    #[instrument(skip(self, spec), fields(target_id = %spec.target_id))]
    async fn update_virtio_scsi_lun(
        &self,
        spec: VirtioScsiLunSpec,
    ) -> Result<VirtioScsiLunSpec, VstorError> {
        Ok(VirtioScsiLunSpec::default())
    }

    #[instrument(skip(self))]
    async fn get_virtio_scsi_lun(
        &self,
        controller_id: &ResourceId,
    ) -> Result<VirtioScsiLunSpec, VstorError> {
        let info = self.vhost_controller_by_name(controller_id).await?;
        // The engine reports controllers, not LUN payloads; the handle name
        // lands in the volume field.
        Ok(VirtioScsiLunSpec {
            volume_id: info.ctrlr.into(),
            ..Default::default()
        })
    }

    #[instrument(skip(self))]
    async fn list_virtio_scsi_luns(&self) -> Result<Vec<VirtioScsiLunSpec>, VstorError> {
        let live = self.live_vhost_controllers().await?;
        Ok(live
            .into_iter()
            .map(|entry| VirtioScsiLunSpec {
                volume_id: entry.ctrlr.into(),
                ..Default::default()
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn virtio_scsi_lun_stats(&self, id: &ResourceId) -> Result<StatsInfo, VstorError> {
        Ok(StatsInfo::default())
    }
}
