//! SecurityContextConstraints drift diagnostic.
//!
//! Two reconciliation passes are classified differently:
//! - the union pass only reports objects that lack baseline grants, which the next
//!   reconciliation would add back (errors when the object is gone, warnings otherwise);
//! - the replace pass additionally catches non-additive drift, which is frequently an
//!   intentional local customization and is therefore only reported at debug level.

use crate::diagnostic::{CannotRun, Diagnostic, Requirements};
use crate::ports::{AccessReviewer, PolicyObjectSource, PolicyReconciler, ResourceAttributes};
use policydrift_types::finding::FindingCode;
use policydrift_types::policy::{NamespaceScope, ReconcileStrategy};
use policydrift_types::result::{CheckState, DiagnosticResult};
use std::collections::HashSet;
use tracing::{debug, warn};

pub const SCC_DIAGNOSTIC_NAME: &str = "SecurityContextConstraints";
pub const SCC_DIAGNOSTIC_DESCRIPTION: &str =
    "Check that the default SecurityContextConstraints are present and contain the expected permissions";

const SCC_GROUP: &str = "security.openshift.io";
const SCC_RESOURCE: &str = "securitycontextconstraints";

/// Checks that the default SCCs are present and contain the expected permissions.
pub struct SccDrift<'a> {
    objects: &'a dyn PolicyObjectSource,
    reconciler: &'a dyn PolicyReconciler,
    access: Option<&'a dyn AccessReviewer>,
    scope: NamespaceScope,
}

impl<'a> SccDrift<'a> {
    pub fn new(
        objects: &'a dyn PolicyObjectSource,
        reconciler: &'a dyn PolicyReconciler,
        scope: NamespaceScope,
    ) -> Self {
        Self {
            objects,
            reconciler,
            access: None,
            scope,
        }
    }

    pub fn with_access_reviewer(mut self, access: &'a dyn AccessReviewer) -> Self {
        self.access = Some(access);
        self
    }

    fn list_attributes() -> ResourceAttributes {
        ResourceAttributes::new("list", SCC_GROUP, SCC_RESOURCE)
    }

    fn reconcile_failed(
        result: &mut DiagnosticResult,
        pass: ReconcileStrategy,
        err: anyhow::Error,
    ) {
        let cause = format!("{err:#}");
        warn!(pass = %pass, error = %cause, "scc reconciliation failed");
        let message = format!("Error inspecting SCCs: {cause}");
        result
            .add_error(FindingCode::ReconcileFailed, Some(cause), message)
            .in_pass(pass);
    }
}

impl Diagnostic for SccDrift<'_> {
    fn name(&self) -> &'static str {
        SCC_DIAGNOSTIC_NAME
    }

    fn description(&self) -> &'static str {
        SCC_DIAGNOSTIC_DESCRIPTION
    }

    fn requirements(&self) -> Requirements {
        Requirements {
            client: true,
            host: false,
        }
    }

    fn can_run(&self) -> Result<(), CannotRun> {
        let Some(access) = self.access else {
            return Err(CannotRun::MissingCollaborator("access reviewer"));
        };
        let attrs = Self::list_attributes();
        match access.user_can(&attrs) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CannotRun::Denied(attrs)),
            Err(error) => Err(CannotRun::AccessCheckFailed { attrs, error }),
        }
    }

    fn check(&self) -> DiagnosticResult {
        let mut r = DiagnosticResult::new(SCC_DIAGNOSTIC_NAME);

        r.set_state(CheckState::UnionPassRunning);
        let changed = match self
            .reconciler
            .changed_objects(ReconcileStrategy::Union, &self.scope)
        {
            Ok(changed) => changed,
            Err(err) => {
                Self::reconcile_failed(&mut r, ReconcileStrategy::Union, err);
                r.set_state(CheckState::UnionPassFailed);
                return r;
            }
        };
        debug!(changed = changed.len(), scope = %self.scope, "union pass done");

        let mut seen: HashSet<String> = HashSet::with_capacity(changed.len());
        for obj in &changed {
            let name = obj.name.as_str();
            let finding = match self.objects.get(name) {
                Err(err) if err.is_not_found() => r.add_error(
                    FindingCode::ObjectMissing,
                    None,
                    format!(
                        "scc/{name} is missing.\n\nUse the `oc adm policy reconcile-sccs` command to recreate sccs."
                    ),
                ),
                Err(err) => {
                    let cause = format!("{err:#}");
                    let message = format!("Unable to get scc/{name}: {cause}");
                    r.add_error(FindingCode::ObjectFetchFailed, Some(cause), message)
                }
                Ok(_) => r.add_warning(
                    FindingCode::WillReconcile,
                    None,
                    format!(
                        "scc/{name} will be reconciled. Use the `oc adm policy reconcile-sccs` command to check sccs."
                    ),
                ),
            };
            finding.for_object(name).in_pass(ReconcileStrategy::Union);
            seen.insert(name.to_string());
        }
        r.set_state(CheckState::UnionPassDone);

        r.set_state(CheckState::ReplacePassRunning);
        let changed = match self
            .reconciler
            .changed_objects(ReconcileStrategy::Replace, &self.scope)
        {
            Ok(changed) => changed,
            Err(err) => {
                Self::reconcile_failed(&mut r, ReconcileStrategy::Replace, err);
                r.set_state(CheckState::ReplacePassFailed);
                return r;
            }
        };
        debug!(changed = changed.len(), scope = %self.scope, "replace pass done");

        for obj in changed.iter().filter(|o| !seen.contains(&o.name)) {
            r.add_debug(
                FindingCode::NonAdditiveDrift,
                format!(
                    "scc/{} does not match defaults. Use the `oc adm policy reconcile-sccs --additive-only=false` command to check sccs.",
                    obj.name
                ),
            )
            .for_object(obj.name.as_str())
            .in_pass(ReconcileStrategy::Replace);
        }

        r.set_state(CheckState::Complete);
        r
    }
}
