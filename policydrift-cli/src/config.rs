//! Configuration file loading for policydrift.
//!
//! Discovers and loads `policydrift.toml` from the working directory (or an explicit path).
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "policydrift.toml";

/// Top-level configuration from policydrift.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicydriftConfig {
    pub cluster: ClusterConfig,
    pub output: OutputConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Cluster section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Namespace hosting the infrastructure service accounts.
    pub infra_namespace: Option<String>,
}

/// Output section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Include debug findings in the terminal summary.
    pub show_debug: bool,

    /// Terminal output format: "text" or "json".
    pub format: Option<String>,

    pub out_dir: Option<Utf8PathBuf>,
}

/// Diagnostics section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Names of diagnostics not to run.
    pub skip: Vec<String>,
}

/// Discover the policydrift.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a policydrift.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<PolicydriftConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<PolicydriftConfig> {
    let config: PolicydriftConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load an explicit config file, or discover one in `dir`, or fall back to defaults.
///
/// An explicit path that does not exist is an error; a missing discovered file is not.
pub fn load_or_default(
    explicit: Option<&Utf8Path>,
    dir: &Utf8Path,
) -> anyhow::Result<PolicydriftConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(PolicydriftConfig::default()),
    }
}

/// `check` arguments that can override the config file.
#[derive(Debug, Clone, Default)]
pub struct CheckOverrides {
    pub infra_namespace: Option<String>,
    pub out_dir: Option<Utf8PathBuf>,
    pub show_debug: bool,
    pub format: Option<String>,
    pub skip: Vec<String>,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub infra_namespace: Option<String>,
    pub out_dir: Option<Utf8PathBuf>,
    pub show_debug: bool,
    pub format: Option<String>,
    pub skip: Vec<String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: PolicydriftConfig,
}

impl ConfigMerger {
    pub fn new(config: PolicydriftConfig) -> Self {
        Self { config }
    }

    /// Merge with `check` CLI arguments.
    ///
    /// Scalar CLI values replace file values; `--skip` extends the file's skip list;
    /// `--show-debug` can only turn debug output on.
    pub fn merge_check_args(self, cli: CheckOverrides) -> MergedConfig {
        let mut skip = self.config.diagnostics.skip;
        for name in cli.skip {
            if !skip.iter().any(|s| s.eq_ignore_ascii_case(&name)) {
                skip.push(name);
            }
        }

        MergedConfig {
            infra_namespace: cli.infra_namespace.or(self.config.cluster.infra_namespace),
            out_dir: cli.out_dir.or(self.config.output.out_dir),
            show_debug: cli.show_debug || self.config.output.show_debug,
            format: cli.format.or(self.config.output.format),
            skip,
        }
    }
}
