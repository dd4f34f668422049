//! Config and code-registry support for the `policydrift` binary.

pub mod config;
pub mod explain;
