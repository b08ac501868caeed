use std::process::ExitCode;

use anyhow::{Context, Result};
use mockery::cli::{self, Cli};
use mockery::commands::generate_mocks;
use mockery::errors::FailureKind;
use tracing::info;

fn main() -> ExitCode {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = cli::build_run_config(cli).context("invalid configuration")?;
    cli::configure_thread_pool(config.jobs);

    let report = generate_mocks(&config)
        .with_context(|| format!("unable to search {}", config.dir.display()))?;

    // Unparseable files were already logged as warnings.
    for failure in report
        .failures
        .iter()
        .filter(|f| f.kind != FailureKind::Extraction)
    {
        eprintln!("{}", failure);
    }
    info!(
        generated = report.generated_count(),
        failures = report.failure_count(),
        "Run complete"
    );

    Ok(if report.has_fatal_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
