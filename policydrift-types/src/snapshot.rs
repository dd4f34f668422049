use crate::policy::PolicyObject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A recorded view of a cluster's policy objects.
///
/// Snapshots are read tolerantly: unknown fields are ignored and every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    /// Schema identifier, e.g. "policydrift.snapshot.v1".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Name of the cluster or context the snapshot was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,

    /// What the recording user was allowed to do. `None` means unrestricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Vec<AccessGrant>>,

    #[serde(default)]
    pub objects: Vec<PolicyObject>,

    /// Objects that could not be read while recording, keyed by name, with the error seen.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fetch_errors: BTreeMap<String, String>,
}

/// One allowed (verb, group, resource) triple. `*` matches anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub verb: String,

    #[serde(default)]
    pub group: String,

    pub resource: String,
}

impl AccessGrant {
    pub fn allows(&self, verb: &str, group: &str, resource: &str) -> bool {
        fn matches(pattern: &str, value: &str) -> bool {
            pattern == "*" || pattern == value
        }
        matches(&self.verb, verb) && matches(&self.group, group) && matches(&self.resource, resource)
    }
}

/// A baseline file replacing the built-in default objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub objects: Vec<PolicyObject>,
}
