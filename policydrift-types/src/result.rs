use crate::finding::{Finding, FindingCode, Severity};
use serde::{Deserialize, Serialize};

/// Progress of a single diagnostic run.
///
/// `Complete`, `UnionPassFailed` and `ReplacePassFailed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    #[default]
    NotStarted,
    UnionPassRunning,
    UnionPassFailed,
    UnionPassDone,
    ReplacePassRunning,
    ReplacePassFailed,
    Complete,
}

impl CheckState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CheckState::Complete | CheckState::UnionPassFailed | CheckState::ReplacePassFailed
        )
    }
}

/// Append-only accumulator of findings for one diagnostic run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    pub name: String,

    #[serde(default)]
    pub state: CheckState,

    #[serde(default)]
    pub findings: Vec<Finding>,
}

impl DiagnosticResult {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: CheckState::NotStarted,
            findings: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Appends an error finding and hands it back so the caller can tag it.
    pub fn add_error(
        &mut self,
        code: FindingCode,
        cause: Option<String>,
        message: impl Into<String>,
    ) -> &mut Finding {
        let mut f = Finding::error(code, message);
        f.cause = cause;
        self.push_last(f)
    }

    pub fn add_warning(
        &mut self,
        code: FindingCode,
        cause: Option<String>,
        message: impl Into<String>,
    ) -> &mut Finding {
        let mut f = Finding::warning(code, message);
        f.cause = cause;
        self.push_last(f)
    }

    pub fn add_debug(&mut self, code: FindingCode, message: impl Into<String>) -> &mut Finding {
        self.push_last(Finding::debug(code, message))
    }

    fn push_last(&mut self, finding: Finding) -> &mut Finding {
        let idx = self.findings.len();
        self.push(finding);
        &mut self.findings[idx]
    }

    pub fn set_state(&mut self, state: CheckState) {
        self.state = state;
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }
}
