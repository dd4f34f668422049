//! Shared DTOs (schemas-as-code) for the policydrift workspace.
//!
//! # Design constraints
//! - Report types are serialized to disk and consumed by other tools.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod finding;
pub mod policy;
pub mod report;
pub mod result;
pub mod snapshot;

/// Schema identifiers.
pub mod schema {
    pub const POLICYDRIFT_REPORT_V1: &str = "policydrift.report.v1";
    pub const POLICYDRIFT_SNAPSHOT_V1: &str = "policydrift.snapshot.v1";
    pub const POLICYDRIFT_BASELINE_V1: &str = "policydrift.baseline.v1";
}
