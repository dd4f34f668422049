use crate::policy::ReconcileStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding severity. Closed on purpose: callers match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable finding identifiers emitted by the SCC drift diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingCode {
    /// A reconciliation pass could not be computed.
    #[serde(rename = "CSD1000")]
    ReconcileFailed,
    /// A baseline object is absent from the cluster.
    #[serde(rename = "CSD1001")]
    ObjectMissing,
    /// A live object could not be fetched.
    #[serde(rename = "CSD1002")]
    ObjectFetchFailed,
    /// A live object lacks baseline grants and would gain them on reconcile.
    #[serde(rename = "CSD1003")]
    WillReconcile,
    /// A live object deviates from the baseline in a non-additive way.
    #[serde(rename = "CSD1004")]
    NonAdditiveDrift,
}

impl FindingCode {
    pub const ALL: [FindingCode; 5] = [
        FindingCode::ReconcileFailed,
        FindingCode::ObjectMissing,
        FindingCode::ObjectFetchFailed,
        FindingCode::WillReconcile,
        FindingCode::NonAdditiveDrift,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FindingCode::ReconcileFailed => "CSD1000",
            FindingCode::ObjectMissing => "CSD1001",
            FindingCode::ObjectFetchFailed => "CSD1002",
            FindingCode::WillReconcile => "CSD1003",
            FindingCode::NonAdditiveDrift => "CSD1004",
        }
    }

    /// Case-insensitive lookup by the `CSDxxxx` identifier.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classified discrepancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub code: FindingCode,
    pub severity: Severity,
    pub message: String,

    /// Rendered underlying error, when the finding wraps one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,

    /// Name of the policy object the finding is keyed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// Reconciliation pass that produced the finding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<ReconcileStrategy>,
}

impl Finding {
    pub fn new(code: FindingCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            cause: None,
            object: None,
            pass: None,
        }
    }

    pub fn error(code: FindingCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    pub fn warning(code: FindingCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, message)
    }

    pub fn debug(code: FindingCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Debug, message)
    }

    pub fn for_object(&mut self, name: impl Into<String>) -> &mut Self {
        self.object = Some(name.into());
        self
    }

    pub fn in_pass(&mut self, pass: ReconcileStrategy) -> &mut Self {
        self.pass = Some(pass);
        self
    }

    /// Stable key for deduplication across runs.
    pub fn fingerprint(&self, diagnostic: &str) -> String {
        let object = self.object.as_deref().unwrap_or("-");
        let pass = self.pass.map(ReconcileStrategy::as_str).unwrap_or("-");
        format!("{}/{}/{}/{}", diagnostic, self.code, pass, object)
    }
}
