//! The built-in SecurityContextConstraints baseline.
//!
//! Service-account grants depend on the infrastructure namespace, so the baseline is computed
//! per [`NamespaceScope`] rather than stored as constants.

use policydrift_types::policy::{NamespaceScope, PolicyObject};
use serde_json::json;

/// Service account of the build controller; granted `privileged`.
pub const BUILD_CONTROLLER_SA: &str = "build-controller";
/// Service account of the persistent volume recycler; granted `hostmount-anyuid`.
pub const PV_RECYCLER_SA: &str = "pv-recycler-controller";

pub const CLUSTER_ADMINS_GROUP: &str = "system:cluster-admins";
pub const NODES_GROUP: &str = "system:nodes";
pub const MASTERS_GROUP: &str = "system:masters";
pub const AUTHENTICATED_GROUP: &str = "system:authenticated";

/// Source of the expected policy objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Baseline {
    /// The default SCC set shipped with the cluster.
    #[default]
    Builtin,
    /// An explicit object list (e.g. loaded from a baseline file). Scope-independent.
    Fixed(Vec<PolicyObject>),
}

impl Baseline {
    pub fn objects(&self, scope: &NamespaceScope) -> Vec<PolicyObject> {
        match self {
            Baseline::Builtin => builtin_sccs(scope),
            Baseline::Fixed(objects) => objects.clone(),
        }
    }
}

fn volumes(extra: &[&str]) -> serde_json::Value {
    let mut v = vec![
        "configMap",
        "downwardAPI",
        "emptyDir",
        "persistentVolumeClaim",
        "projected",
        "secret",
    ];
    v.extend_from_slice(extra);
    v.sort_unstable();
    json!(v)
}

fn drop_setuid_caps() -> serde_json::Value {
    json!(["KILL", "MKNOD", "SETGID", "SETUID"])
}

fn strategies(run_as_user: &str, se_linux: &str, fs_group: &str, supplemental: &str) -> PolicyObject {
    PolicyObject::new("")
        .with_setting("runAsUser", json!({ "type": run_as_user }))
        .with_setting("seLinuxContext", json!({ "type": se_linux }))
        .with_setting("fsGroup", json!({ "type": fs_group }))
        .with_setting("supplementalGroups", json!({ "type": supplemental }))
}

fn host_flags(mut obj: PolicyObject, flags: &[(&str, bool)]) -> PolicyObject {
    for (key, value) in flags {
        obj = obj.with_setting(*key, json!(value));
    }
    obj
}

fn named(mut obj: PolicyObject, name: &str) -> PolicyObject {
    obj.name = name.to_string();
    obj
}

/// The default SCCs, in the order reconciliation walks them.
pub fn builtin_sccs(scope: &NamespaceScope) -> Vec<PolicyObject> {
    let all_host = [
        ("allowHostDirVolumePlugin", true),
        ("allowHostIPC", true),
        ("allowHostNetwork", true),
        ("allowHostPID", true),
        ("allowHostPorts", true),
    ];
    let no_host = [
        ("allowHostDirVolumePlugin", false),
        ("allowHostIPC", false),
        ("allowHostNetwork", false),
        ("allowHostPID", false),
        ("allowHostPorts", false),
    ];

    let privileged = host_flags(
        named(strategies("RunAsAny", "RunAsAny", "RunAsAny", "RunAsAny"), "privileged"),
        &all_host,
    )
    .with_users(["system:admin".to_string(), scope.service_account_user(BUILD_CONTROLLER_SA)])
    .with_groups([CLUSTER_ADMINS_GROUP, NODES_GROUP, MASTERS_GROUP])
    .with_setting("allowPrivilegedContainer", json!(true))
    .with_setting("allowedCapabilities", json!(["*"]))
    .with_setting("volumes", json!(["*"]))
    .with_setting("seccompProfiles", json!(["*"]));

    let nonroot = host_flags(
        named(
            strategies("MustRunAsNonRoot", "MustRunAs", "RunAsAny", "RunAsAny"),
            "nonroot",
        ),
        &no_host,
    )
    .with_setting("allowPrivilegedContainer", json!(false))
    .with_setting("requiredDropCapabilities", drop_setuid_caps())
    .with_setting("volumes", volumes(&[]));

    let hostmount_anyuid = host_flags(
        named(
            strategies("RunAsAny", "MustRunAs", "RunAsAny", "RunAsAny"),
            "hostmount-anyuid",
        ),
        &[
            ("allowHostDirVolumePlugin", true),
            ("allowHostIPC", false),
            ("allowHostNetwork", false),
            ("allowHostPID", false),
            ("allowHostPorts", false),
        ],
    )
    .with_users([scope.service_account_user(PV_RECYCLER_SA)])
    .with_setting("allowPrivilegedContainer", json!(false))
    .with_setting("requiredDropCapabilities", json!(["MKNOD"]))
    .with_setting("volumes", volumes(&["hostPath", "nfs"]));

    let hostaccess = host_flags(
        named(
            strategies("MustRunAsRange", "MustRunAs", "RunAsAny", "RunAsAny"),
            "hostaccess",
        ),
        &all_host,
    )
    .with_setting("allowPrivilegedContainer", json!(false))
    .with_setting("requiredDropCapabilities", drop_setuid_caps())
    .with_setting("volumes", volumes(&["hostPath"]));

    let hostnetwork = host_flags(
        named(
            strategies("MustRunAsRange", "MustRunAs", "MustRunAs", "MustRunAs"),
            "hostnetwork",
        ),
        &[
            ("allowHostDirVolumePlugin", false),
            ("allowHostIPC", false),
            ("allowHostNetwork", true),
            ("allowHostPID", false),
            ("allowHostPorts", true),
        ],
    )
    .with_setting("allowPrivilegedContainer", json!(false))
    .with_setting("requiredDropCapabilities", drop_setuid_caps())
    .with_setting("volumes", volumes(&[]));

    let anyuid = host_flags(
        named(strategies("RunAsAny", "MustRunAs", "RunAsAny", "RunAsAny"), "anyuid"),
        &no_host,
    )
    .with_priority(10)
    .with_groups([CLUSTER_ADMINS_GROUP])
    .with_setting("allowPrivilegedContainer", json!(false))
    .with_setting("requiredDropCapabilities", json!(["MKNOD"]))
    .with_setting("volumes", volumes(&[]));

    let restricted = host_flags(
        named(
            strategies("MustRunAsRange", "MustRunAs", "MustRunAs", "RunAsAny"),
            "restricted",
        ),
        &no_host,
    )
    .with_groups([AUTHENTICATED_GROUP])
    .with_setting("allowPrivilegedContainer", json!(false))
    .with_setting("requiredDropCapabilities", drop_setuid_caps())
    .with_setting("volumes", volumes(&[]));

    vec![
        privileged,
        nonroot,
        hostmount_anyuid,
        hostaccess,
        hostnetwork,
        anyuid,
        restricted,
    ]
}
