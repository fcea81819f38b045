//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::output::DomainResult;
use crate::state::DomainStatus;
use crate::storage::{RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The result log is append-only: rows are inserted once and never updated.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new run and returns its ID
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Gets the most recent run if it never completed (running, interrupted or failed)
    ///
    /// A failed run's log is still a valid prefix of the batch, so it resumes like an
    /// interrupted one.
    fn get_resumable_run(&self) -> StorageResult<Option<RunRecord>> {
        Ok(self
            .get_latest_run()?
            .filter(|run| run.status != RunStatus::Completed))
    }

    /// Updates the status of a run
    fn update_run_status(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    /// Marks a run as completed with a finish timestamp
    fn complete_run(&mut self, run_id: i64) -> StorageResult<()>;

    // ===== Result Log =====

    /// Appends one domain result to a run's log
    ///
    /// Fails with `ConstraintViolation` if the run already has a result at this position.
    fn append_result(&mut self, run_id: i64, result: &DomainResult) -> StorageResult<()>;

    /// Loads a run's full log in input order
    fn load_results(&self, run_id: i64) -> StorageResult<Vec<DomainResult>>;

    /// Counts results in a run
    fn count_results(&self, run_id: i64) -> StorageResult<u64>;

    /// Counts results in a run with the given status
    fn count_results_by_status(&self, run_id: i64, status: DomainStatus) -> StorageResult<u64>;
}
