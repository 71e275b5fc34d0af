mod cli;

use std::process;
use std::time::Duration;

use clap::Parser;
use littleskin_client::config::{self, Credentials, FlowConfig};
use littleskin_client::retry::run_with_retry;
use littleskin_client::{CheckinError, default_client, flow};
use tracing::{Level, error, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::cli::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args).await {
        error!("check-in failed: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CheckinError> {
    // Configuration problems are fatal; load everything before the retry
    // loop so they never burn attempts.
    let credentials = Credentials::from_env()?;
    let headers = config::header_map(&config::load_headers(&args.headers)?);

    let mut flow_config = FlowConfig::default().with_base_url(args.base_url);
    flow_config.max_attempts = args.retries;
    flow_config.retry_delay = Duration::from_secs(args.retry_delay);
    if args.fast {
        flow_config.fetch_pace = Duration::ZERO;
        flow_config.flow_pace = Duration::ZERO;
    }

    let client = default_client();

    let result = run_with_retry(&flow_config.retry_policy(), |attempt| {
        info!(attempt, max = flow_config.max_attempts, "starting check-in attempt");
        flow::run_task(&client, &credentials, &headers, &flow_config)
    })
    .await?;

    info!(code = result.code, message = %result.message, "check-in succeeded");
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_level(verbose))
        .init();
}
