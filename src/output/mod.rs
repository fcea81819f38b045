//! Output module for recording results and generating reports
//!
//! This module handles:
//! - The append-only result log and the `Aggregator` that writes it
//! - Statistics recomputed from the full log after every domain
//! - The per-domain output record and the JSON results file
//! - Markdown summaries of a run

mod log;
mod markdown;
mod record;
mod results_file;
pub mod stats;
mod traits;

pub use log::{Aggregator, ResultLog};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use record::{
    hyperlink_formula, DomainResult, OutputRecord, ValidationCell, NOT_VALIDATED,
};
pub use results_file::write_results_file;
pub use stats::{compute_statistics, load_statistics, print_statistics, RunStatistics};
pub use traits::{OutputError, OutputResult, ResultSink, RunSummary};

use crate::storage::Storage;
use crate::ScoutError;
use chrono::{DateTime, Utc};

/// Builds the summary of the most recent run from storage
pub fn generate_summary(storage: &dyn Storage) -> Result<RunSummary, ScoutError> {
    let run = storage
        .get_latest_run()?
        .ok_or_else(|| ScoutError::Storage("No runs found in database".to_string()))?;

    generate_run_summary(storage, run.id)
}

/// Builds the summary of one run from storage
pub fn generate_run_summary(
    storage: &dyn Storage,
    run_id: i64,
) -> Result<RunSummary, ScoutError> {
    let run = storage.get_run(run_id)?;

    let duration_seconds = match (
        run.started_at.parse::<DateTime<Utc>>(),
        run.finished_at.as_deref().map(str::parse::<DateTime<Utc>>),
    ) {
        (Ok(started), Some(Ok(finished))) => {
            Some((finished - started).num_seconds().max(0) as u64)
        }
        _ => None,
    };

    let results = storage.load_results(run.id)?;
    let statistics = compute_statistics(&ResultLog::from_entries(results.clone()));

    Ok(RunSummary {
        run_id: run.id,
        started_at: run.started_at,
        finished_at: run.finished_at,
        duration_seconds,
        status: run.status.to_db_string().to_string(),
        config_hash: run.config_hash,
        statistics,
        results,
    })
}
