//! Embeddable core library for policydrift.
//!
//! Provides a clap-free entry point that runs the registered diagnostics and projects their
//! results into a report.
//!
//! # Port traits
//!
//! Cluster access is abstracted behind the traits re-exported from `policydrift-domain`;
//! artifact output goes through [`WritePort`](ports::WritePort).
//! The [`adapters`] module provides snapshot-file and filesystem implementations.
//!
//! # Entry points
//!
//! - [`run_diagnostics`](pipeline::run_diagnostics): run any set of diagnostics
//! - [`run_snapshot_check`](pipeline::run_snapshot_check): run the SCC diagnostic against a
//!   recorded snapshot
//! - [`write_report_artifacts`](pipeline::write_report_artifacts): write `report.json` and
//!   `report.md`

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the domain ports so callers don't need policydrift-domain directly.
pub use policydrift_domain::{
    AccessReviewer, Diagnostic, FetchError, PolicyObjectSource, PolicyReconciler,
};
