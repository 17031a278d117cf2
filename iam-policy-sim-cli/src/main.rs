//! Command-line entry point for iam-policy-sim.
//!
//! Reads `{"statement": [{"action": ..., "resource": ...}]}` from stdin and
//! checks every action/resource pair against the policies attached to the
//! given role. Exits 0 only when every pair is allowed.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use iam_policy_sim_core::{read_checks, LogReporter, PolicySimulatorService};
use log::{debug, error, warn, LevelFilter};

#[derive(Parser, Debug)]
#[command(
    name = "iam-policy-sim",
    version,
    about = "Simulate an IAM role's policies against the action/resource pairs read from stdin"
)]
struct Cli {
    /// IAM role name to simulate
    #[arg(
        long,
        env = "IAM_POLICY_SIM_ROLE_NAME",
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    role_name: String,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Returns whether every pair was allowed.
async fn run(cli: &Cli) -> Result<bool> {
    // Input is validated before any AWS configuration is loaded.
    debug!("Reading input from STDIN");
    let checks = read_checks(io::stdin().lock()).context("Failed to read input from STDIN")?;

    let service = PolicySimulatorService::new().await;

    let cancel = service.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping before the next request");
            cancel.cancel();
        }
    });

    let result = service
        .run(&cli.role_name, &checks, &mut LogReporter)
        .await
        .with_context(|| format!("Failed to simulate policies of role '{}'", cli.role_name))?;

    Ok(!result.any_failed)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
