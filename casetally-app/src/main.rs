use anyhow::Result;
use casetally_common::observability::{LogConfig, init_logging};
use casetally_config::CasetallyConfigLoader;
use clap::Parser;

use casetally_app::run::{self, Outcome};

/// Fetch one day's COVID-19 numbers for the configured jurisdiction and
/// share a summary. One invocation is one run; point a timer at it.
#[derive(Parser, Debug)]
#[command(name = "casetally", version)]
struct Args {
    /// Path to the configuration file.
    #[arg(long, default_value = "casetally.yaml", env = "CASETALLY_CONFIG")]
    config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LogConfig::default())?;

    tracing::info!("starting processing");

    // A scheduled invocation must never fail loudly to its caller: whatever
    // goes wrong inside the pipeline becomes one error-level record with the
    // full cause chain, and the process still exits cleanly.
    match run_once(&args).await {
        Ok(Outcome::Published { post_id, .. }) => {
            tracing::info!(%post_id, "run complete, status published");
        }
        Ok(Outcome::DryRun { .. }) => {
            tracing::info!("run complete, dry-run (publishing disabled)");
        }
        Ok(Outcome::NoData) => {
            tracing::info!("run complete, nothing to report");
        }
        Err(err) => {
            tracing::error!("run aborted: {err:#}");
        }
    }
    Ok(())
}

async fn run_once(args: &Args) -> Result<Outcome> {
    let cfg = CasetallyConfigLoader::new().with_file(&args.config).load()?;
    run::run(&cfg).await
}
