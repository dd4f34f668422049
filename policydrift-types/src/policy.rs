use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A cluster-scoped access-control policy object (e.g. a SecurityContextConstraints).
///
/// Only the parts that matter for drift detection are modelled:
/// - `users` / `groups` are the grants; union reconciliation only ever adds to them.
/// - `priority` is preserved from the live object under union reconciliation.
/// - `settings` holds every other field verbatim, keyed by its API field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyObject {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub users: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub groups: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl PolicyObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: None,
            users: BTreeSet::new(),
            groups: BTreeSet::new(),
            settings: BTreeMap::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users.extend(users.into_iter().map(Into::into));
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }
}

/// Merge strategy used by a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStrategy {
    /// The baseline is merged additively into live content; only missing grants count.
    Union,
    /// The full computed baseline replaces live content; any deviation counts.
    Replace,
}

impl ReconcileStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            ReconcileStrategy::Union => "union",
            ReconcileStrategy::Replace => "replace",
        }
    }
}

impl fmt::Display for ReconcileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a changed set: the target object name plus the content
/// reconciliation would write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedPolicyObject {
    pub name: String,
    pub computed: PolicyObject,
}

impl ChangedPolicyObject {
    pub fn new(computed: PolicyObject) -> Self {
        Self {
            name: computed.name.clone(),
            computed,
        }
    }
}

/// Objects that would change if one reconciliation pass were applied, in engine order.
pub type ChangedSet = Vec<ChangedPolicyObject>;

/// Namespace the baseline's service-account grants are computed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceScope(String);

impl NamespaceScope {
    pub const DEFAULT_INFRA: &'static str = "openshift-infra";

    pub fn new(namespace: impl Into<String>) -> Self {
        Self(namespace.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully-qualified user name of a service account in this namespace.
    pub fn service_account_user(&self, account: &str) -> String {
        format!("system:serviceaccount:{}:{}", self.0, account)
    }
}

impl Default for NamespaceScope {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INFRA)
    }
}

impl fmt::Display for NamespaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
