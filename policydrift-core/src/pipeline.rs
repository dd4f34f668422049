//! Diagnostic runner and report projection, extracted from the CLI.
//!
//! These entry points are I/O-agnostic apart from loading the snapshot: cluster access goes
//! through the domain ports and artifact output through [`WritePort`].

use crate::adapters::{SnapshotCluster, SnapshotLoadError, load_baseline, load_snapshot};
use crate::ports::WritePort;
use crate::settings::CheckSettings;
use anyhow::Context;
use camino::Utf8Path;
use chrono::Utc;
use policydrift_domain::{Baseline, BaselineReconciler, Diagnostic, Requirements, SccDrift};
use policydrift_render::render_report_md;
use policydrift_types::finding::Severity;
use policydrift_types::report::{
    DiagnosticEntry, DiagnosticStatus, DiagnosticsReport, ReportCounts, ReportFinding,
    ReportRunInfo, ReportStatus, ReportToolInfo, ReportVerdict,
};
use policydrift_types::result::DiagnosticResult;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Error type for pipeline results.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotLoadError),
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// What happened to one diagnostic.
#[derive(Debug, Clone)]
pub enum DiagnosticOutcome {
    Ran {
        description: &'static str,
        requirements: Requirements,
        result: DiagnosticResult,
    },
    Skipped {
        name: &'static str,
        description: &'static str,
        requirements: Requirements,
        reason: String,
    },
}

impl DiagnosticOutcome {
    pub fn name(&self) -> &str {
        match self {
            DiagnosticOutcome::Ran { result, .. } => &result.name,
            DiagnosticOutcome::Skipped { name, .. } => name,
        }
    }
}

/// Outcome of `run_diagnostics`.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub outcomes: Vec<DiagnosticOutcome>,
    pub report: DiagnosticsReport,
}

impl RunOutcome {
    pub fn has_errors(&self) -> bool {
        self.report.verdict.counts.error > 0
    }
}

/// Identity written into the report.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Run each diagnostic that is not skipped by settings and that reports it can run.
///
/// A diagnostic that cannot run is recorded as skipped with its reason; it never contributes
/// findings, so "could not check" stays distinguishable from "nothing found".
pub fn run_diagnostics(
    diagnostics: &[&dyn Diagnostic],
    settings: &CheckSettings,
    tool: ToolInfo,
    source: Option<String>,
) -> RunOutcome {
    let started = Utc::now();
    let mut outcomes = Vec::with_capacity(diagnostics.len());

    for diag in diagnostics {
        let name = diag.name();
        let requirements = diag.requirements();
        if settings.is_skipped(name) {
            debug!(diagnostic = name, "skipped by configuration");
            outcomes.push(DiagnosticOutcome::Skipped {
                name,
                description: diag.description(),
                requirements,
                reason: "skipped by configuration".to_string(),
            });
            continue;
        }

        if let Err(reason) = diag.can_run() {
            warn!(diagnostic = name, reason = %reason, "diagnostic cannot run");
            outcomes.push(DiagnosticOutcome::Skipped {
                name,
                description: diag.description(),
                requirements,
                reason: reason.to_string(),
            });
            continue;
        }

        debug!(diagnostic = name, requires = ?requirements.labels(), "running diagnostic");
        let result = diag.check();
        info!(
            diagnostic = name,
            errors = result.count(Severity::Error),
            warnings = result.count(Severity::Warning),
            debug = result.count(Severity::Debug),
            "diagnostic finished"
        );
        outcomes.push(DiagnosticOutcome::Ran {
            description: diag.description(),
            requirements,
            result,
        });
    }

    let report = build_report(&outcomes, settings, tool, source, started);
    RunOutcome { outcomes, report }
}

/// Load the snapshot (and optional baseline file) and run the SCC diagnostic against it.
pub fn run_snapshot_check(
    settings: &CheckSettings,
    tool: ToolInfo,
) -> Result<RunOutcome, ToolError> {
    let snapshot = load_snapshot(&settings.snapshot)?;
    let source = snapshot
        .cluster
        .clone()
        .unwrap_or_else(|| settings.snapshot.to_string());
    let cluster = SnapshotCluster::new(snapshot);
    debug!(objects = cluster.len(), source = %source, "snapshot loaded");

    let baseline = match &settings.baseline {
        Some(path) => Baseline::Fixed(load_baseline(path)?),
        None => Baseline::Builtin,
    };

    let reconciler = BaselineReconciler::new(&cluster, baseline);
    let scc = SccDrift::new(&cluster, &reconciler, settings.scope()).with_access_reviewer(&cluster);

    Ok(run_diagnostics(&[&scc], settings, tool, Some(source)))
}

/// Write `report.json` and `report.md` to the output directory.
pub fn write_report_artifacts(
    outcome: &RunOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json =
        serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    let report_md = render_report_md(&outcome.report);
    writer.write_file(&out_dir.join("report.md"), report_md.as_bytes())?;

    Ok(())
}

// ── report helpers ───────────────────────────────────────────────────────

fn report_finding(diagnostic: &str, f: &policydrift_types::finding::Finding) -> ReportFinding {
    ReportFinding {
        severity: f.severity,
        code: f.code,
        message: f.message.clone(),
        cause: f.cause.clone(),
        object: f.object.clone(),
        pass: f.pass,
        fingerprint: f.fingerprint(diagnostic),
    }
}

fn requires(requirements: Requirements) -> Vec<String> {
    requirements.labels().into_iter().map(String::from).collect()
}

pub(crate) fn build_report(
    outcomes: &[DiagnosticOutcome],
    settings: &CheckSettings,
    tool: ToolInfo,
    source: Option<String>,
    started: chrono::DateTime<Utc>,
) -> DiagnosticsReport {
    let mut counts = ReportCounts::default();
    let mut reasons = Vec::new();
    let mut entries = Vec::with_capacity(outcomes.len());

    for outcome in outcomes {
        match outcome {
            DiagnosticOutcome::Ran {
                description,
                requirements,
                result,
            } => {
                for f in &result.findings {
                    match f.severity {
                        Severity::Error => counts.error += 1,
                        Severity::Warning => counts.warning += 1,
                        Severity::Debug => counts.debug += 1,
                    }
                }
                entries.push(DiagnosticEntry {
                    name: result.name.clone(),
                    description: description.to_string(),
                    status: DiagnosticStatus::Ran,
                    requires: requires(*requirements),
                    skip_reason: None,
                    state: Some(result.state),
                    findings: result
                        .findings
                        .iter()
                        .map(|f| report_finding(&result.name, f))
                        .collect(),
                });
            }
            DiagnosticOutcome::Skipped {
                name,
                description,
                requirements,
                reason,
            } => {
                reasons.push(format!("skipped:{}", name));
                entries.push(DiagnosticEntry {
                    name: name.to_string(),
                    description: description.to_string(),
                    status: DiagnosticStatus::Skipped,
                    requires: requires(*requirements),
                    skip_reason: Some(reason.clone()),
                    state: None,
                    findings: vec![],
                });
            }
        }
    }

    let any_ran = outcomes
        .iter()
        .any(|o| matches!(o, DiagnosticOutcome::Ran { .. }));
    let status = if counts.error > 0 {
        ReportStatus::Fail
    } else if counts.warning > 0 {
        ReportStatus::Warn
    } else if !any_ran {
        ReportStatus::Skip
    } else {
        ReportStatus::Pass
    };

    let ended = Utc::now();
    let duration_ms = (ended - started).num_milliseconds().max(0) as u64;

    DiagnosticsReport {
        schema: policydrift_types::schema::POLICYDRIFT_REPORT_V1.to_string(),
        run_id: Uuid::new_v4(),
        tool: ReportToolInfo {
            name: tool.name,
            version: tool.version,
        },
        run: ReportRunInfo {
            started_at: started.to_rfc3339(),
            ended_at: Some(ended.to_rfc3339()),
            duration_ms: Some(duration_ms),
            infra_namespace: settings.infra_namespace.clone(),
            source,
        },
        verdict: ReportVerdict {
            status,
            counts,
            reasons,
        },
        diagnostics: entries,
    }
}
