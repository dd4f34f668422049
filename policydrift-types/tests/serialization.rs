use policydrift_types::finding::{Finding, FindingCode, Severity};
use policydrift_types::policy::{PolicyObject, ReconcileStrategy};
use policydrift_types::report::{
    DiagnosticEntry, DiagnosticStatus, DiagnosticsReport, ReportCounts, ReportRunInfo,
    ReportStatus, ReportToolInfo, ReportVerdict,
};
use policydrift_types::result::CheckState;
use pretty_assertions::assert_eq;

#[test]
fn report_status_serializes_snake_case() {
    let pass = serde_json::to_value(ReportStatus::Pass).expect("serialize");
    let warn = serde_json::to_value(ReportStatus::Warn).expect("serialize");
    let fail = serde_json::to_value(ReportStatus::Fail).expect("serialize");
    let skip = serde_json::to_value(ReportStatus::Skip).expect("serialize");

    assert_eq!(pass, serde_json::json!("pass"));
    assert_eq!(warn, serde_json::json!("warn"));
    assert_eq!(fail, serde_json::json!("fail"));
    assert_eq!(skip, serde_json::json!("skip"));
}

#[test]
fn severity_and_state_serialize_snake_case() {
    assert_eq!(
        serde_json::to_value(Severity::Warning).expect("serialize"),
        serde_json::json!("warning")
    );
    assert_eq!(
        serde_json::to_value(CheckState::UnionPassFailed).expect("serialize"),
        serde_json::json!("union_pass_failed")
    );
    assert_eq!(
        serde_json::to_value(ReconcileStrategy::Replace).expect("serialize"),
        serde_json::json!("replace")
    );
}

#[test]
fn finding_omits_empty_optionals() {
    let finding = Finding::debug(FindingCode::NonAdditiveDrift, "drift");
    let value = serde_json::to_value(&finding).expect("serialize finding");

    assert_eq!(
        value,
        serde_json::json!({
            "code": "CSD1004",
            "severity": "debug",
            "message": "drift",
        })
    );
}

#[test]
fn policy_object_omits_empty_grants() {
    let obj = PolicyObject::new("restricted")
        .with_groups(["system:authenticated"])
        .with_setting("allowHostNetwork", serde_json::json!(false));
    let value = serde_json::to_value(&obj).expect("serialize object");

    assert_eq!(
        value,
        serde_json::json!({
            "name": "restricted",
            "groups": ["system:authenticated"],
            "settings": { "allowHostNetwork": false },
        })
    );
}

#[test]
fn skipped_entry_carries_reason_and_no_state() {
    let report = DiagnosticsReport {
        schema: policydrift_types::schema::POLICYDRIFT_REPORT_V1.to_string(),
        run_id: uuid::Uuid::nil(),
        tool: ReportToolInfo {
            name: "policydrift".to_string(),
            version: "0.0.0".to_string(),
        },
        run: ReportRunInfo {
            started_at: "2024-01-01T00:00:00Z".to_string(),
            ended_at: None,
            duration_ms: None,
            infra_namespace: "openshift-infra".to_string(),
            source: None,
        },
        verdict: ReportVerdict {
            status: ReportStatus::Skip,
            counts: ReportCounts::default(),
            reasons: vec!["cannot_run".to_string()],
        },
        diagnostics: vec![DiagnosticEntry {
            name: "SecurityContextConstraints".to_string(),
            description: "desc".to_string(),
            status: DiagnosticStatus::Skipped,
            requires: vec![],
            skip_reason: Some("list denied".to_string()),
            state: None,
            findings: vec![],
        }],
    };

    let value = serde_json::to_value(&report).expect("serialize report");
    let entry = &value["diagnostics"][0];
    assert_eq!(entry["status"], serde_json::json!("skipped"));
    assert_eq!(entry["skip_reason"], serde_json::json!("list denied"));
    assert!(entry.get("state").is_none());
    assert!(entry.get("requires").is_none());
    assert_eq!(value["schema"], serde_json::json!("policydrift.report.v1"));
}
