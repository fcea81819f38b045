//! Batch orchestration
//!
//! This module drives a whole run:
//! - Picks the run to work on (resume the last unfinished one, or start fresh)
//! - Builds the per-domain pipeline from the configuration
//! - Feeds the domain list through the ordered worker pool
//! - Turns Ctrl-C into a cancellation that leaves the run resumable
//! - Finalizes the run and writes the markdown summary

mod domain;
mod pool;

pub use domain::{DomainOutcome, DomainPipeline};
pub use pool::{run_batch, BatchReport};

use crate::config::Config;
use crate::input::read_domains;
use crate::output::{generate_markdown_summary, generate_run_summary, Aggregator, ResultSink};
use crate::storage::{open_storage, RunStatus, Storage};
use crate::ScoutError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Picks the run a batch should append to
///
/// Unless `fresh` is set, the latest run that never completed (including a failed one)
/// is resumed. A resumed run whose config hash differs from the current one is still
/// resumed, with a warning.
pub fn select_run(
    storage: &mut dyn Storage,
    config_hash: &str,
    fresh: bool,
) -> Result<i64, ScoutError> {
    if !fresh {
        if let Some(run) = storage.get_resumable_run()? {
            if run.config_hash != config_hash {
                tracing::warn!(
                    "Configuration changed since run {} started (hash {} -> {})",
                    run.id,
                    run.config_hash,
                    config_hash
                );
            }
            tracing::info!("Resuming {} run {}", run.status.to_db_string(), run.id);
            storage.update_run_status(run.id, RunStatus::Running)?;
            return Ok(run.id);
        }
        tracing::info!("No unfinished run found, starting a new run");
    } else {
        tracing::info!("Starting fresh run (ignoring previous state)");
    }

    Ok(storage.create_run(config_hash)?)
}

/// Runs a full batch as described by the configuration
///
/// Per-domain failures never surface here; an `Err` means the run's own infrastructure
/// (input, database, result files) failed, and the run is marked `failed`.
pub async fn run(
    config: &Config,
    config_hash: &str,
    fresh: bool,
) -> Result<BatchReport, ScoutError> {
    let domains = read_domains(Path::new(&config.input.domains_path))?;
    tracing::info!(
        "Loaded {} domains from {}",
        domains.len(),
        config.input.domains_path
    );

    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let run_id = select_run(&mut storage, config_hash, fresh)?;

    let pipeline = Arc::new(DomainPipeline::from_config(config)?);
    let mut aggregator = Aggregator::resume(
        storage,
        run_id,
        Some(PathBuf::from(&config.output.results_path)),
    )?;

    let cancel = CancellationToken::new();
    let signal_task = spawn_ctrl_c_listener(cancel.clone());

    let outcome = run_batch(
        pipeline,
        &domains,
        &mut aggregator,
        config.crawler.workers as usize,
        &cancel,
    )
    .await;
    signal_task.abort();

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Run {} failed: {}", run_id, e);
            if let Err(status_err) = aggregator.finalize(RunStatus::Failed) {
                tracing::error!("Could not mark run {} as failed: {}", run_id, status_err);
            }
            return Err(e.into());
        }
    };

    let status = if report.interrupted {
        tracing::warn!(
            "Run {} interrupted after {} of {} domains; run again to resume",
            run_id,
            aggregator.log().len(),
            report.total
        );
        RunStatus::Interrupted
    } else {
        RunStatus::Completed
    };
    aggregator.finalize(status)?;

    let summary = generate_run_summary(aggregator.storage(), run_id)?;
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;
    tracing::info!("Summary written to {}", config.output.summary_path);

    Ok(report)
}

/// Cancels `cancel` on the first Ctrl-C
fn spawn_ctrl_c_listener(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received, abandoning in-flight domains");
                cancel.cancel();
            }
            Err(e) => tracing::error!("Unable to listen for Ctrl-C: {}", e),
        }
    })
}
