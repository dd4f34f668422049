//! Domain logic: compare live cluster policy objects against the built-in baseline and classify
//! the drift.
//!
//! This crate owns *what* counts as drift and how severe it is. It does not talk to a cluster;
//! all cluster access goes through the traits in [`ports`].

pub mod baseline;
mod diagnostic;
pub mod ports;
mod reconcile;
mod scc;

pub use baseline::Baseline;
pub use diagnostic::{CannotRun, Diagnostic, DiagnosticMeta, Requirements, builtin_diagnostic_metas};
pub use ports::{AccessReviewer, FetchError, PolicyObjectSource, PolicyReconciler, ResourceAttributes};
pub use reconcile::{BaselineReconciler, merge_with_baseline};
pub use scc::{SCC_DIAGNOSTIC_DESCRIPTION, SCC_DIAGNOSTIC_NAME, SccDrift};
