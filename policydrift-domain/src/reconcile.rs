use crate::baseline::Baseline;
use crate::ports::{FetchError, PolicyObjectSource, PolicyReconciler};
use anyhow::Context;
use policydrift_types::policy::{
    ChangedPolicyObject, ChangedSet, NamespaceScope, PolicyObject, ReconcileStrategy,
};
use tracing::debug;

/// Compute the object reconciliation would write over `live`.
///
/// Under [`ReconcileStrategy::Union`] grants are merged additively, the live priority wins and
/// only settings the live object lacks are taken from the baseline. Under
/// [`ReconcileStrategy::Replace`] the baseline is written as-is.
pub fn merge_with_baseline(
    live: &PolicyObject,
    expected: &PolicyObject,
    strategy: ReconcileStrategy,
) -> PolicyObject {
    match strategy {
        ReconcileStrategy::Replace => expected.clone(),
        ReconcileStrategy::Union => {
            let mut merged = live.clone();
            merged.users.extend(expected.users.iter().cloned());
            merged.groups.extend(expected.groups.iter().cloned());
            if merged.priority.is_none() {
                merged.priority = expected.priority;
            }
            for (key, value) in &expected.settings {
                merged
                    .settings
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
            merged
        }
    }
}

/// Reference reconciler: diff a [`Baseline`] against live objects without writing anything.
pub struct BaselineReconciler<'a> {
    source: &'a dyn PolicyObjectSource,
    baseline: Baseline,
}

impl<'a> BaselineReconciler<'a> {
    pub fn new(source: &'a dyn PolicyObjectSource, baseline: Baseline) -> Self {
        Self { source, baseline }
    }
}

impl PolicyReconciler for BaselineReconciler<'_> {
    fn changed_objects(
        &self,
        strategy: ReconcileStrategy,
        scope: &NamespaceScope,
    ) -> anyhow::Result<ChangedSet> {
        let mut changed = Vec::new();
        for expected in self.baseline.objects(scope) {
            let live = match self.source.get(&expected.name) {
                Ok(live) => live,
                Err(FetchError::NotFound { .. }) => {
                    debug!(name = %expected.name, %strategy, "baseline object missing");
                    changed.push(ChangedPolicyObject::new(expected));
                    continue;
                }
                Err(FetchError::Other(err)) => {
                    return Err(err).with_context(|| format!("get scc/{}", expected.name));
                }
            };

            let merged = merge_with_baseline(&live, &expected, strategy);
            if merged != live {
                debug!(name = %expected.name, %strategy, "baseline object differs");
                changed.push(ChangedPolicyObject::new(merged));
            }
        }
        Ok(changed)
    }
}
