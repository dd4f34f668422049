//! Clap-free settings for the check pipeline.

use camino::Utf8PathBuf;
use policydrift_types::policy::NamespaceScope;

/// Settings for a snapshot-backed check run.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    /// Recorded cluster snapshot (JSON or YAML).
    pub snapshot: Utf8PathBuf,

    /// Baseline file replacing the built-in SCC set.
    pub baseline: Option<Utf8PathBuf>,

    pub out_dir: Utf8PathBuf,
    pub infra_namespace: String,

    /// Diagnostic names not to run.
    pub skip: Vec<String>,

    /// Include debug findings in terminal output.
    pub show_debug: bool,
}

impl CheckSettings {
    pub fn scope(&self) -> NamespaceScope {
        NamespaceScope::new(self.infra_namespace.clone())
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip.iter().any(|s| s.eq_ignore_ascii_case(name))
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            snapshot: Utf8PathBuf::from("snapshot.json"),
            baseline: None,
            out_dir: Utf8PathBuf::from("artifacts/policydrift"),
            infra_namespace: NamespaceScope::DEFAULT_INFRA.to_string(),
            skip: Vec::new(),
            show_debug: false,
        }
    }
}
