//! Finding code explanations for the `policydrift explain` command.

use policydrift_types::finding::{FindingCode, Severity};

/// Information about one finding code.
#[derive(Debug, Clone)]
pub struct CodeExplanation {
    pub code: FindingCode,
    /// Human-readable title.
    pub title: &'static str,
    pub severity: Severity,
    /// What the finding means.
    pub meaning: &'static str,
    /// What to do about it.
    pub remediation: &'static str,
}

/// Registry of all finding code explanations.
pub static CODE_REGISTRY: &[CodeExplanation] = &[
    CodeExplanation {
        code: FindingCode::ReconcileFailed,
        title: "Reconciliation could not be computed",
        severity: Severity::Error,
        meaning: r#"The set of policy objects that reconciliation would change could not be
computed at all. The check stops at this point, so no per-object findings are
reported for the failed pass or any pass after it.

The finding records which pass failed (`union` or `replace`) and the
underlying error."#,
        remediation: r#"Read the cause attached to the finding. Typical causes are insufficient
permissions to read SCCs or an unreachable API server. Fix the cause and re-run
the check."#,
    },
    CodeExplanation {
        code: FindingCode::ObjectMissing,
        title: "Default SCC is missing",
        severity: Severity::Error,
        meaning: r#"A SecurityContextConstraints object from the default set does not exist on
the cluster. Workloads that rely on it will fail admission."#,
        remediation: r#"Recreate the default SCCs:

    oc adm policy reconcile-sccs --confirm"#,
    },
    CodeExplanation {
        code: FindingCode::ObjectFetchFailed,
        title: "SCC could not be read",
        severity: Severity::Error,
        meaning: r#"Reconciliation reported that an SCC would change, but reading the live
object failed with an error other than "not found". Whether it is missing or
merely out of date is unknown."#,
        remediation: r#"Check the attached cause (permissions, API availability) and re-run the
check."#,
    },
    CodeExplanation {
        code: FindingCode::WillReconcile,
        title: "SCC lacks default grants",
        severity: Severity::Warning,
        meaning: r#"A default SCC exists but is missing users, groups or settings that the
defaults grant. An additive reconciliation would add them back, which may
happen automatically on upgrade."#,
        remediation: r#"Review the pending changes:

    oc adm policy reconcile-sccs

If the removal was intentional, expect it to be undone by reconciliation."#,
    },
    CodeExplanation {
        code: FindingCode::NonAdditiveDrift,
        title: "SCC differs from defaults",
        severity: Severity::Debug,
        meaning: r#"A default SCC differs from its defaults in a way additive reconciliation
keeps, such as extra users or groups or changed settings. This is usually an
intentional local customization, so it is only reported at debug level."#,
        remediation: r#"Review the full difference:

    oc adm policy reconcile-sccs --additive-only=false

No action is needed if the customization is intended."#,
    },
];

/// Look up an explanation by code (case-insensitive, e.g. "csd1001").
pub fn lookup_code(code: &str) -> Option<&'static CodeExplanation> {
    let code = FindingCode::parse(code)?;
    CODE_REGISTRY.iter().find(|e| e.code == code)
}

/// Format an explanation for terminal output.
pub fn format_explanation(e: &CodeExplanation) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", e.code, e.title));
    out.push_str(&format!("Severity: {}\n\n", e.severity));
    out.push_str("MEANING\n");
    out.push_str(e.meaning);
    out.push_str("\n\nREMEDIATION\n");
    out.push_str(e.remediation);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_is_registered_once() {
        for code in FindingCode::ALL {
            let n = CODE_REGISTRY.iter().filter(|e| e.code == code).count();
            assert_eq!(n, 1, "{code}");
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let e = lookup_code("csd1003").expect("registered");
        assert_eq!(e.code, FindingCode::WillReconcile);
        assert_eq!(e.severity, Severity::Warning);
        assert!(lookup_code("CSD9999").is_none());
    }

    #[test]
    fn registry_severity_matches_emitted_severity() {
        assert_eq!(lookup_code("CSD1001").unwrap().severity, Severity::Error);
        assert_eq!(lookup_code("CSD1004").unwrap().severity, Severity::Debug);
    }

    #[test]
    fn formatted_output_has_sections() {
        let text = format_explanation(lookup_code("CSD1001").unwrap());
        assert!(text.starts_with("CSD1001: Default SCC is missing"));
        assert!(text.contains("Severity: error"));
        assert!(text.contains("REMEDIATION"));
    }
}
