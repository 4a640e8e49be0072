//! Wire shapes for the engine's control-protocol operations.
//!
//! Field names match the engine's JSON-RPC parameter and result documents
//! exactly; these structs are built and read by the backend and serialized
//! opaquely by the gateway.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// nvmf_* operations
// ---------------------------------------------------------------------------

/// Parameters for `nvmf_create_subsystem`.
#[derive(Debug, Clone, Serialize)]
pub struct NvmfCreateSubsystemParams {
    pub nqn: String,
    pub serial_number: String,
    pub allow_any_host: bool,
}

/// Parameters for `nvmf_delete_subsystem`.
#[derive(Debug, Clone, Serialize)]
pub struct NvmfDeleteSubsystemParams {
    pub nqn: String,
}

/// One subsystem as reported by `nvmf_get_subsystems`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NvmfSubsystemInfo {
    pub nqn: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub namespaces: Vec<NvmfNamespaceInfo>,
}

/// One namespace nested inside an [`NvmfSubsystemInfo`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NvmfNamespaceInfo {
    pub nsid: i32,
    #[serde(default)]
    pub bdev_name: String,
}

/// Result of `nvmf_get_stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NvmfStats {
    pub tick_rate: u64,
}

/// Parameters for `nvmf_subsystem_add_ns`.
#[derive(Debug, Clone, Serialize)]
pub struct NvmfSubsystemAddNsParams {
    pub nqn: String,
    pub namespace: NvmfNamespaceParams,
}

/// Namespace description nested in [`NvmfSubsystemAddNsParams`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct NvmfNamespaceParams {
    pub bdev_name: String,
}

/// Parameters for `nvmf_subsystem_remove_ns`.
#[derive(Debug, Clone, Serialize)]
pub struct NvmfSubsystemRemoveNsParams {
    pub nqn: String,
    pub nsid: i32,
}

// ---------------------------------------------------------------------------
// vhost_* operations
// ---------------------------------------------------------------------------

/// Parameters for `vhost_create_blk_controller`.
#[derive(Debug, Clone, Serialize)]
pub struct VhostCreateBlkControllerParams {
    pub ctrlr: String,
    pub dev_name: String,
}

/// Parameters for `vhost_create_scsi_controller`.
#[derive(Debug, Clone, Serialize)]
pub struct VhostCreateScsiControllerParams {
    pub ctrlr: String,
}

/// Parameters for `vhost_delete_controller`.
#[derive(Debug, Clone, Serialize)]
pub struct VhostDeleteControllerParams {
    pub ctrlr: String,
}

/// Parameters for `vhost_get_controllers`, filtering by handle name.
/// Omitting the parameters entirely asks the engine for every controller.
#[derive(Debug, Clone, Serialize)]
pub struct VhostGetControllersParams {
    pub name: String,
}

/// One controller as reported by `vhost_get_controllers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VhostControllerInfo {
    pub ctrlr: String,
    #[serde(default)]
    pub cpumask: String,
    #[serde(default)]
    pub socket: String,
}

/// Parameters for `vhost_scsi_controller_add_target`.
#[derive(Debug, Clone, Serialize)]
pub struct VhostScsiAddTargetParams {
    pub ctrlr: String,
    pub scsi_target_num: i32,
    pub bdev_name: String,
}

/// Parameters for `vhost_scsi_controller_remove_target`.
#[derive(Debug, Clone, Serialize)]
pub struct VhostScsiRemoveTargetParams {
    pub ctrlr: String,
    pub scsi_target_num: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_subsystem_params_field_names() {
        let params = NvmfCreateSubsystemParams {
            nqn: "nqn.2019-06.io.spdk:cnode1".into(),
            serial_number: "SPDK0".into(),
            allow_any_host: true,
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "nqn": "nqn.2019-06.io.spdk:cnode1",
                "serial_number": "SPDK0",
                "allow_any_host": true,
            })
        );
    }

    #[test]
    fn add_ns_params_nest_namespace() {
        let params = NvmfSubsystemAddNsParams {
            nqn: "nqn.2019-06.io.spdk:cnode1".into(),
            namespace: NvmfNamespaceParams {
                bdev_name: "malloc0".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "nqn": "nqn.2019-06.io.spdk:cnode1",
                "namespace": { "bdev_name": "malloc0" },
            })
        );
    }

    #[test]
    fn scsi_target_params_field_names() {
        let params = VhostScsiAddTargetParams {
            ctrlr: "vhost.0".into(),
            scsi_target_num: 5,
            bdev_name: "malloc1".into(),
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "ctrlr": "vhost.0",
                "scsi_target_num": 5,
                "bdev_name": "malloc1",
            })
        );
    }

    #[test]
    fn subsystem_info_tolerates_missing_fields() {
        let info: NvmfSubsystemInfo =
            serde_json::from_value(json!({ "nqn": "nqn:1" })).unwrap();
        assert_eq!(info.nqn, "nqn:1");
        assert!(info.namespaces.is_empty());
        assert!(info.serial_number.is_empty());
    }

    #[test]
    fn controller_info_tolerates_missing_fields() {
        let info: VhostControllerInfo =
            serde_json::from_value(json!({ "ctrlr": "vhost.1" })).unwrap();
        assert_eq!(info.ctrlr, "vhost.1");
        assert!(info.cpumask.is_empty());
    }
}
