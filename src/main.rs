use anyhow::{Context, Result};
use clap::Parser;
use covgate::config::{GateConfig, GateConfigFile};
use covgate::error::SnapshotKind;
use covgate::snapshot::CoverageSnapshot;
use covgate::{cli::Cli, gate, output};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Own crate at info for the status line, dependencies at warn
const DEFAULT_LOG_FILTER: &str = "warn,covgate=info";

/// Initialize tracing subscriber; the run status line and warnings always
/// reach stderr, `--debug` adds the per-file trail
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Assemble the gate configuration from the optional file and raw inputs
fn load_config(args: &Cli) -> Result<GateConfig> {
    let file = match &args.config {
        Some(path) => Some(GateConfigFile::from_toml(path)?),
        None => None,
    };
    Ok(GateConfig::layered(file.as_ref(), &args.raw_config()))
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    tracing::debug!(
        "Gate config: general={}, single={}, new_file={}, ignored={:?}, patterns={:?}",
        config.general_coverage_tolerance,
        config.single_line_coverage_tolerance,
        config.new_file_coverage_threshold,
        config.exclusions.ignored_paths(),
        config.exclusions.pattern_sources()
    );

    // Both snapshots must load before anything is emitted
    let base = CoverageSnapshot::from_file(&args.base, SnapshotKind::Base)?;
    let candidate = CoverageSnapshot::from_file(&args.candidate, SnapshotKind::Candidate)?;

    let outcome = gate::run(&candidate, &base, &config);
    tracing::info!("{}", outcome.summary_line());

    if let Some(path) = &args.github_output {
        output::write_github_outputs(path, &outcome)
            .with_context(|| format!("Failed to write step outputs to {}", path.display()))?;
    }

    if let Some(path) = &args.report_file {
        output::write_report_file(path, &outcome)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    let rendered = output::render(&outcome, args.format).context("Failed to render output")?;
    if !rendered.is_empty() {
        println!("{}", rendered.trim_end_matches('\n'));
    }

    if args.fail_on_issues && outcome.has_issues {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
