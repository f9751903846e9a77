// ------------------------------------------------------------
// Quiz collector entry point
// ------------------------------------------------------------
//
// Responsibilities:
// - Initialize logging
// - Load configuration
// - Wire source, delay, and store into a Collector
// - Run the idempotency probe, then the polling loop if needed
// - Print the final summary
//
// Any error escaping `run` is logged and the process exits with
// status 1. Ctrl-C abandons the in-flight request; the last full
// save on disk is from a completed iteration.
//
use std::process::ExitCode;
use std::sync::Arc;

use tokio::signal;

use quiz_harvest::{
    collector::{Collector, ProbeVerdict, RandomDelay, RunOutcome},
    config::{Config, load_config},
    source::OpenTdbSource,
    store::JsonFileStore,
    util,
};

#[tokio::main]
async fn main() -> ExitCode {
    util::init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Critical error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config: Config = load_config()?;

    let source = Arc::new(OpenTdbSource::new(&config.api)?);
    let delay = Arc::new(RandomDelay::new(config.collector.delay));
    let store = Arc::new(JsonFileStore::new(&config.storage.path));

    log::info!("Polling {}", source.endpoint());

    let mut collector = Collector::new(source, delay, store, config.collector.clone());
    let location = collector.store_location();

    tokio::select! {
        outcome = collector.run() => {
            print_summary(&outcome, &location);
            log::info!("Script completed successfully!");
        }
        _ = signal::ctrl_c() => {
            log::warn!("Interrupted, exiting. Last saved state is in {}", location);
        }
    }

    Ok(())
}

fn print_summary(outcome: &RunOutcome, location: &str) {
    match (outcome.verdict, outcome.summary) {
        (ProbeVerdict::Idempotent, _) => {
            log::info!("Collection already complete, nothing to do.");
        }
        (_, Some(summary)) => {
            log::info!("Final statistics:");
            log::info!("- Total requests: {}", summary.requests);
            log::info!("- Total unique quizzes collected: {}", summary.unique);
            log::info!("- Stopped: {:?}", summary.stop);
            log::info!("- File: {}", location);
        }
        (_, None) => {}
    }
}
