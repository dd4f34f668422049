use crate::ports::ResourceAttributes;
use policydrift_types::result::DiagnosticResult;
use thiserror::Error;

/// What a diagnostic needs from its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Requirements {
    /// Needs a cluster API client.
    pub client: bool,
    /// Needs to run on a cluster host.
    pub host: bool,
}

impl Requirements {
    /// Names of the required capabilities, as recorded in reports.
    pub fn labels(self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.client {
            labels.push("client");
        }
        if self.host {
            labels.push("host");
        }
        labels
    }
}

/// Reason a diagnostic declined to run.
#[derive(Debug, Error)]
pub enum CannotRun {
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("not permitted to {0}")]
    Denied(ResourceAttributes),

    #[error("permission check for {attrs} failed: {error:#}")]
    AccessCheckFailed {
        attrs: ResourceAttributes,
        error: anyhow::Error,
    },
}

/// Name and description of a registered diagnostic, available without constructing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticMeta {
    pub name: &'static str,
    pub description: &'static str,
}

/// All diagnostics this crate provides.
pub fn builtin_diagnostic_metas() -> Vec<DiagnosticMeta> {
    vec![DiagnosticMeta {
        name: crate::scc::SCC_DIAGNOSTIC_NAME,
        description: crate::scc::SCC_DIAGNOSTIC_DESCRIPTION,
    }]
}

/// A named, self-describing check.
///
/// Runners call [`can_run`](Diagnostic::can_run) first and only call
/// [`check`](Diagnostic::check) when it succeeds, so "could not check" never looks like
/// "nothing found".
pub trait Diagnostic {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn requirements(&self) -> Requirements;

    fn can_run(&self) -> Result<(), CannotRun>;

    /// Run the check. Collaborator failures become findings; this never fails.
    fn check(&self) -> DiagnosticResult;
}
