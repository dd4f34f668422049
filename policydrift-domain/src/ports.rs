//! Port traits abstracting all cluster access away from the diagnostics.

use policydrift_types::policy::{ChangedSet, NamespaceScope, PolicyObject, ReconcileStrategy};
use std::fmt;
use thiserror::Error;

/// Computes which baseline policy objects would change under a merge strategy.
///
/// Implementations must not mutate the cluster; the proposed merge is inspected and discarded.
pub trait PolicyReconciler {
    fn changed_objects(
        &self,
        strategy: ReconcileStrategy,
        scope: &NamespaceScope,
    ) -> anyhow::Result<ChangedSet>;
}

/// Read-only access to live policy objects.
pub trait PolicyObjectSource {
    fn get(&self, name: &str) -> Result<PolicyObject, FetchError>;
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("securitycontextconstraints {name:?} not found")]
    NotFound { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FetchError {
    pub fn not_found(name: impl Into<String>) -> Self {
        FetchError::NotFound { name: name.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// Attributes of a self access review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAttributes {
    pub verb: String,
    pub group: String,
    pub resource: String,
}

impl ResourceAttributes {
    pub fn new(verb: &str, group: &str, resource: &str) -> Self {
        Self {
            verb: verb.to_string(),
            group: group.to_string(),
            resource: resource.to_string(),
        }
    }
}

impl fmt::Display for ResourceAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{} {}", self.verb, self.resource)
        } else {
            write!(f, "{} {}.{}", self.verb, self.resource, self.group)
        }
    }
}

/// Answers whether the current user may perform an action.
pub trait AccessReviewer {
    fn user_can(&self, attrs: &ResourceAttributes) -> anyhow::Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_display_includes_group() {
        let attrs = ResourceAttributes::new("list", "security.openshift.io", "securitycontextconstraints");
        assert_eq!(
            attrs.to_string(),
            "list securitycontextconstraints.security.openshift.io"
        );
        let core = ResourceAttributes::new("get", "", "pods");
        assert_eq!(core.to_string(), "get pods");
    }

    #[test]
    fn not_found_is_distinguishable() {
        assert!(FetchError::not_found("restricted").is_not_found());
        let other = FetchError::from(anyhow::anyhow!("connection refused"));
        assert!(!other.is_not_found());
        assert_eq!(other.to_string(), "connection refused");
    }
}
