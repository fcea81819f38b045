//! Output sink trait and types
//!
//! This module defines the trait the pipeline records results through and the
//! run summary consumed by the report writers.

use crate::output::{DomainResult, ResultLog, RunStatistics};
use crate::storage::{RunStatus, StorageError};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Single writer for a run's results
///
/// Implementations must persist each result before returning, so that a crash after
/// `record_domain_result` returns never loses that domain.
pub trait ResultSink {
    /// Appends one result and returns the statistics recomputed over the whole log
    fn record_domain_result(&mut self, result: DomainResult) -> OutputResult<RunStatistics>;

    /// The log as recorded so far
    fn log(&self) -> &ResultLog;

    /// Records the final status of the run
    fn finalize(&mut self, status: RunStatus) -> OutputResult<()>;
}

/// Everything the markdown report needs about one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<u64>,
    pub status: String,
    pub config_hash: String,
    pub statistics: RunStatistics,
    pub results: Vec<DomainResult>,
}
