use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use policydrift_cli::config::{self, CheckOverrides, ConfigMerger};
use policydrift_cli::explain;
use policydrift_core::adapters::FsWritePort;
use policydrift_core::pipeline::{ToolInfo, run_snapshot_check, write_report_artifacts};
use policydrift_core::settings::CheckSettings;
use policydrift_domain::builtin_diagnostic_metas;
use policydrift_render::render_summary_text;
use serde::Serialize;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "policydrift",
    version,
    about = "Reports drift between live cluster security policy objects and their defaults."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run all diagnostics against a recorded cluster snapshot.
    Check(CheckArgs),
    /// List the available diagnostics.
    ListDiagnostics(ListDiagnosticsArgs),
    /// Explain a finding code and how to remediate it.
    Explain(ExplainArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Recorded cluster snapshot (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long)]
    snapshot: Utf8PathBuf,

    /// Baseline file replacing the built-in default SCCs.
    #[arg(long)]
    baseline: Option<Utf8PathBuf>,

    /// Namespace hosting the infrastructure service accounts (default: openshift-infra).
    #[arg(long)]
    infra_namespace: Option<String>,

    /// Output directory for report artifacts (default: artifacts/policydrift).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Include debug-level findings in the terminal summary.
    #[arg(long, default_value_t = false)]
    show_debug: bool,

    /// Diagnostic names to skip.
    #[arg(long)]
    skip: Vec<String>,

    /// Terminal output format (text, json).
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Config file (default: ./policydrift.toml when present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ListDiagnosticsArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Finding code to explain (e.g., "CSD1001").
    code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse_config(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("unknown output format {other:?} (expected text or json)"),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::ListDiagnostics(args) => cmd_list_diagnostics(args),
        Command::Explain(args) => cmd_explain(args),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let file_config = config::load_or_default(args.config.as_deref(), Utf8Path::new("."))
        .context("load policydrift.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_check_args(CheckOverrides {
        infra_namespace: args.infra_namespace,
        out_dir: args.out_dir,
        show_debug: args.show_debug,
        format: args.format.map(|f| f.as_str().to_string()),
        skip: args.skip,
    });
    debug!("merged config: {:?}", merged);

    let format = match merged.format.as_deref() {
        Some(f) => OutputFormat::parse_config(f)?,
        None => OutputFormat::Text,
    };

    let defaults = CheckSettings::default();
    let settings = CheckSettings {
        snapshot: args.snapshot,
        baseline: args.baseline,
        out_dir: merged.out_dir.unwrap_or(defaults.out_dir),
        infra_namespace: merged.infra_namespace.unwrap_or(defaults.infra_namespace),
        skip: merged.skip,
        show_debug: merged.show_debug,
    };

    let outcome = run_snapshot_check(&settings, tool_info())?;
    write_report_artifacts(&outcome, &settings.out_dir, &FsWritePort)
        .with_context(|| format!("write artifacts to {}", settings.out_dir))?;
    info!(
        out_dir = %settings.out_dir,
        status = ?outcome.report.verdict.status,
        "check finished"
    );

    match format {
        OutputFormat::Text => print!(
            "{}",
            render_summary_text(&outcome.report, settings.show_debug)
        ),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&outcome.report).context("serialize report")?
        ),
    }

    if outcome.has_errors() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Serialize)]
struct DiagnosticListing {
    name: &'static str,
    description: &'static str,
}

fn cmd_list_diagnostics(args: ListDiagnosticsArgs) -> anyhow::Result<ExitCode> {
    let listing: Vec<DiagnosticListing> = builtin_diagnostic_metas()
        .into_iter()
        .map(|m| DiagnosticListing {
            name: m.name,
            description: m.description,
        })
        .collect();

    match args.format {
        OutputFormat::Text => {
            for d in &listing {
                println!("{:<28} {}", d.name, d.description);
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&listing).context("serialize listing")?
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<ExitCode> {
    match explain::lookup_code(&args.code) {
        Some(e) => {
            print!("{}", explain::format_explanation(e));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let known: Vec<String> = explain::CODE_REGISTRY
                .iter()
                .map(|e| e.code.to_string())
                .collect();
            anyhow::bail!(
                "unknown finding code {:?}; known codes: {}",
                args.code,
                known.join(", ")
            )
        }
    }
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "policydrift".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
