//! Indicator Validator - checks per-company indicator result files.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicator_common::config::ToolsConfig;
use indicator_common::logging::init_logging;
use indicator_common::validation::Validate;
use indicator_validator::{DataValidator, ValidatorSettings};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable console report
    Text,
    /// Machine-readable JSON report
    Json,
}

/// Check that every company has a valid result file for each indicator group.
#[derive(Parser, Debug)]
#[command(name = "indicator-validator")]
#[command(version)]
#[command(about = "Check per-company indicator result files", long_about = None)]
struct Cli {
    /// Directory containing `data/companies.json` and `data/calculation_results/`
    #[arg(long)]
    root: Option<PathBuf>,

    /// Configuration file (default: ~/.indicator-site/config.json if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Exit with status 1 when any company is incomplete or a prerequisite is missing
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ToolsConfig::load_with_env(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(root) = cli.root {
        config.validator.data_root = root;
    }

    config
        .validator
        .validate()
        .context("Invalid validator configuration")?;
    config
        .observability
        .validate()
        .context("Invalid observability configuration")?;

    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    let settings = ValidatorSettings::from_config(&config.validator)?;
    let validator = DataValidator::new(settings);

    let report = match validator.run() {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(
                error = %e,
                missing_prerequisite = e.is_missing_prerequisite(),
                "Validation aborted"
            );
            println!("❌ {e}");
            return Ok(exit_code(cli.strict, false));
        }
    };

    match cli.format {
        OutputFormat::Text => print!("{}", report.to_text_report()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(exit_code(cli.strict, report.all_pass()))
}

fn exit_code(strict: bool, passed: bool) -> ExitCode {
    if fails_run(strict, passed) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Only `--strict` turns a failing report into a failing exit status.
fn fails_run(strict: bool, passed: bool) -> bool {
    strict && !passed
}
