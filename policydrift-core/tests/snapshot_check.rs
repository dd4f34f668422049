//! End-to-end checks against snapshot files on disk.

use camino::Utf8PathBuf;
use policydrift_core::adapters::FsWritePort;
use policydrift_core::pipeline::{
    DiagnosticOutcome, ToolError, ToolInfo, run_snapshot_check, write_report_artifacts,
};
use policydrift_core::settings::CheckSettings;
use policydrift_domain::baseline::builtin_sccs;
use policydrift_types::finding::{FindingCode, Severity};
use policydrift_types::policy::{NamespaceScope, PolicyObject};
use policydrift_types::report::{DiagnosticStatus, ReportStatus};
use policydrift_types::result::CheckState;
use policydrift_types::snapshot::{AccessGrant, ClusterSnapshot};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn tool() -> ToolInfo {
    ToolInfo {
        name: "policydrift".into(),
        version: "0.0.0-test".into(),
    }
}

struct Fixture {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        Self { _temp: temp, root }
    }

    fn settings(&self, snapshot: &ClusterSnapshot) -> CheckSettings {
        let path = self.root.join("snapshot.json");
        std::fs::write(&path, serde_json::to_string_pretty(snapshot).unwrap()).unwrap();
        CheckSettings {
            snapshot: path,
            out_dir: self.root.join("out"),
            ..Default::default()
        }
    }
}

fn pristine() -> ClusterSnapshot {
    ClusterSnapshot {
        objects: builtin_sccs(&NamespaceScope::default()),
        ..Default::default()
    }
}

fn codes(outcome: &policydrift_core::pipeline::RunOutcome) -> Vec<(FindingCode, Option<String>)> {
    outcome.report.diagnostics[0]
        .findings
        .iter()
        .map(|f| (f.code, f.object.clone()))
        .collect()
}

#[test]
fn pristine_cluster_passes() {
    let fx = Fixture::new();
    let out = run_snapshot_check(&fx.settings(&pristine()), tool()).unwrap();

    assert_eq!(out.report.verdict.status, ReportStatus::Pass);
    assert!(codes(&out).is_empty());
    assert_eq!(out.report.diagnostics[0].state, Some(CheckState::Complete));
    assert_eq!(out.report.diagnostics[0].requires, vec!["client".to_string()]);
}

#[test]
fn deleted_object_is_an_error() {
    let fx = Fixture::new();
    let mut snapshot = pristine();
    snapshot.objects.retain(|o| o.name != "anyuid");

    let out = run_snapshot_check(&fx.settings(&snapshot), tool()).unwrap();

    assert!(out.has_errors());
    assert_eq!(
        codes(&out),
        vec![(FindingCode::ObjectMissing, Some("anyuid".to_string()))]
    );
}

#[test]
fn stripped_grant_is_a_warning() {
    let fx = Fixture::new();
    let mut snapshot = pristine();
    for obj in &mut snapshot.objects {
        if obj.name == "privileged" {
            obj.groups.clear();
        }
    }

    let out = run_snapshot_check(&fx.settings(&snapshot), tool()).unwrap();

    assert_eq!(out.report.verdict.status, ReportStatus::Warn);
    assert_eq!(
        codes(&out),
        vec![(FindingCode::WillReconcile, Some("privileged".to_string()))]
    );
}

#[test]
fn extra_grant_is_only_debug() {
    let fx = Fixture::new();
    let mut snapshot = pristine();
    for obj in &mut snapshot.objects {
        if obj.name == "restricted" {
            obj.users.insert("alice".to_string());
        }
    }

    let out = run_snapshot_check(&fx.settings(&snapshot), tool()).unwrap();

    assert_eq!(out.report.verdict.status, ReportStatus::Pass);
    let findings = &out.report.diagnostics[0].findings;
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Debug);
    assert_eq!(findings[0].code, FindingCode::NonAdditiveDrift);
    assert_eq!(findings[0].object.as_deref(), Some("restricted"));
}

#[test]
fn unreadable_object_is_a_fetch_error() {
    let fx = Fixture::new();
    let mut snapshot = pristine();
    snapshot.objects.retain(|o| o.name != "nonroot");
    snapshot
        .fetch_errors
        .insert("nonroot".to_string(), "etcd timeout".to_string());

    let out = run_snapshot_check(&fx.settings(&snapshot), tool()).unwrap();

    assert_eq!(out.report.verdict.status, ReportStatus::Fail);
    let findings = &out.report.diagnostics[0].findings;
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, FindingCode::ReconcileFailed);
    assert_eq!(
        out.report.diagnostics[0].state,
        Some(CheckState::UnionPassFailed)
    );
    assert!(findings[0].message.contains("etcd timeout"));
}

#[test]
fn denied_access_skips_without_findings() {
    let fx = Fixture::new();
    let snapshot = ClusterSnapshot {
        access: Some(vec![AccessGrant {
            verb: "get".to_string(),
            group: "*".to_string(),
            resource: "*".to_string(),
        }]),
        ..Default::default()
    };

    let out = run_snapshot_check(&fx.settings(&snapshot), tool()).unwrap();

    assert_eq!(out.report.verdict.status, ReportStatus::Skip);
    let entry = &out.report.diagnostics[0];
    assert_eq!(entry.status, DiagnosticStatus::Skipped);
    assert!(entry.findings.is_empty());
    assert!(
        entry
            .skip_reason
            .as_deref()
            .unwrap_or_default()
            .contains("not permitted to list")
    );
    assert!(matches!(out.outcomes[0], DiagnosticOutcome::Skipped { .. }));
}

#[test]
fn custom_baseline_replaces_builtin_objects() {
    let fx = Fixture::new();
    let baseline_path = fx.root.join("baseline.yaml");
    std::fs::write(
        &baseline_path,
        "objects:\n  - name: team-scc\n    users: [\"bob\"]\n",
    )
    .unwrap();

    let snapshot = ClusterSnapshot {
        objects: vec![PolicyObject::new("team-scc")],
        ..Default::default()
    };
    let mut settings = fx.settings(&snapshot);
    settings.baseline = Some(baseline_path);

    let out = run_snapshot_check(&settings, tool()).unwrap();

    assert_eq!(
        codes(&out),
        vec![(FindingCode::WillReconcile, Some("team-scc".to_string()))]
    );
}

#[test]
fn missing_snapshot_is_a_tool_error() {
    let fx = Fixture::new();
    let settings = CheckSettings {
        snapshot: fx.root.join("absent.json"),
        ..Default::default()
    };

    let err = run_snapshot_check(&settings, tool()).unwrap_err();
    assert!(matches!(err, ToolError::Snapshot(_)));
}

#[test]
fn artifacts_land_in_out_dir() {
    let fx = Fixture::new();
    let settings = fx.settings(&pristine());
    let out = run_snapshot_check(&settings, tool()).unwrap();

    write_report_artifacts(&out, &settings.out_dir, &FsWritePort).unwrap();

    let json = std::fs::read_to_string(settings.out_dir.join("report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["run"]["infra_namespace"], "openshift-infra");
    assert!(settings.out_dir.join("report.md").exists());
}
