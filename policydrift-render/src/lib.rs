//! Rendering helpers (markdown, terminal text) for human-readable artifacts.

use policydrift_types::finding::Severity;
use policydrift_types::report::{
    DiagnosticEntry, DiagnosticStatus, DiagnosticsReport, ReportFinding, ReportStatus,
};
use policydrift_types::result::CheckState;

pub fn render_report_md(report: &DiagnosticsReport) -> String {
    let mut out = String::new();
    out.push_str("# policydrift report\n\n");
    out.push_str(&format!("- Status: `{}`\n", status_label(report.verdict.status)));
    out.push_str(&format!(
        "- Findings: {} error, {} warning, {} debug\n",
        report.verdict.counts.error, report.verdict.counts.warning, report.verdict.counts.debug
    ));
    out.push_str(&format!(
        "- Infra namespace: `{}`\n",
        report.run.infra_namespace
    ));
    if let Some(source) = &report.run.source {
        out.push_str(&format!("- Source: `{}`\n", source));
    }
    if !report.verdict.reasons.is_empty() {
        out.push_str(&format!("- Reasons: {}\n", report.verdict.reasons.join(", ")));
    }
    out.push('\n');

    out.push_str("## Diagnostics\n\n");
    if report.diagnostics.is_empty() {
        out.push_str("_No diagnostics ran._\n");
        return out;
    }

    for d in &report.diagnostics {
        out.push_str(&format!("### {}\n\n", d.name));
        out.push_str(&format!("{}\n\n", d.description));
        if !d.requires.is_empty() {
            out.push_str(&format!("- Requires: {}\n", d.requires.join(", ")));
        }
        match d.status {
            DiagnosticStatus::Skipped => {
                out.push_str(&format!(
                    "- Skipped: {}\n\n",
                    d.skip_reason.as_deref().unwrap_or("unknown reason")
                ));
                continue;
            }
            DiagnosticStatus::Ran => {
                if let Some(state) = d.state {
                    out.push_str(&format!("- State: `{}`\n", state_label(state)));
                }
            }
        }

        if d.findings.is_empty() {
            out.push_str("\n_No drift found._\n\n");
            continue;
        }

        out.push_str("\n| Severity | Code | Object | Message |\n");
        out.push_str("|---|---|---|---|\n");
        for f in &d.findings {
            out.push_str(&format!(
                "| {} | `{}` | {} | {} |\n",
                f.severity,
                f.code,
                f.object.as_deref().unwrap_or("-"),
                first_line(&f.message)
            ));
        }
        out.push('\n');
    }

    out
}

/// Plain-text summary for terminals. Debug findings are hidden unless `show_debug` is set.
pub fn render_summary_text(report: &DiagnosticsReport, show_debug: bool) -> String {
    let mut out = String::new();
    for d in &report.diagnostics {
        render_entry_text(&mut out, d, show_debug);
    }

    let counts = &report.verdict.counts;
    out.push_str(&format!(
        "\n{}: {} error(s), {} warning(s)",
        status_label(report.verdict.status).to_uppercase(),
        counts.error,
        counts.warning
    ));
    if counts.debug > 0 && !show_debug {
        out.push_str(&format!(", {} debug finding(s) hidden", counts.debug));
    }
    out.push('\n');
    out
}

fn render_entry_text(out: &mut String, d: &DiagnosticEntry, show_debug: bool) {
    out.push_str(&format!("[{}] {}\n", d.name, d.description));
    if d.status == DiagnosticStatus::Skipped {
        out.push_str(&format!(
            "  skipped: {}\n",
            d.skip_reason.as_deref().unwrap_or("unknown reason")
        ));
        return;
    }

    let visible: Vec<&ReportFinding> = d
        .findings
        .iter()
        .filter(|f| show_debug || f.severity != Severity::Debug)
        .collect();
    if visible.is_empty() {
        out.push_str("  ok\n");
        return;
    }
    for f in visible {
        out.push_str(&format!(
            "  {:<7} {} {}\n",
            severity_tag(f.severity),
            f.code,
            indent_continuation(&f.message)
        ));
    }
}

fn severity_tag(s: Severity) -> &'static str {
    match s {
        Severity::Error => "ERROR",
        Severity::Warning => "WARN",
        Severity::Debug => "DEBUG",
    }
}

fn status_label(s: ReportStatus) -> &'static str {
    match s {
        ReportStatus::Pass => "pass",
        ReportStatus::Warn => "warn",
        ReportStatus::Fail => "fail",
        ReportStatus::Skip => "skip",
    }
}

fn state_label(s: CheckState) -> &'static str {
    match s {
        CheckState::NotStarted => "not_started",
        CheckState::UnionPassRunning => "union_pass_running",
        CheckState::UnionPassFailed => "union_pass_failed",
        CheckState::UnionPassDone => "union_pass_done",
        CheckState::ReplacePassRunning => "replace_pass_running",
        CheckState::ReplacePassFailed => "replace_pass_failed",
        CheckState::Complete => "complete",
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

fn indent_continuation(s: &str) -> String {
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n                ")
}
