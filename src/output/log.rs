//! The append-only result log and its single writer

use crate::output::results_file::write_results_file;
use crate::output::traits::{OutputResult, ResultSink};
use crate::output::{compute_statistics, DomainResult, RunStatistics};
use crate::storage::{RunStatus, Storage};
use std::collections::HashSet;
use std::path::PathBuf;

/// Ordered results of one run
///
/// Only ever grows. Owned by the run and handed to the [`Aggregator`], which gives it
/// back through [`Aggregator::into_log`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultLog {
    entries: Vec<DomainResult>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from previously persisted entries
    pub fn from_entries(entries: Vec<DomainResult>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainResult> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[DomainResult] {
        &self.entries
    }

    /// Input positions already present in the log
    pub fn positions(&self) -> HashSet<usize> {
        self.entries.iter().map(|r| r.position).collect()
    }

    fn append(&mut self, result: DomainResult) {
        self.entries.push(result);
    }
}

/// Records per-domain results for one run
///
/// Each result is written to storage first, then added to the in-memory log; the JSON
/// results file (if configured) is rewritten from the full log afterwards.
pub struct Aggregator<S: Storage> {
    storage: S,
    run_id: i64,
    log: ResultLog,
    results_path: Option<PathBuf>,
}

impl<S: Storage> Aggregator<S> {
    /// Takes ownership of the run's log; pass an empty log for a fresh run
    pub fn new(storage: S, run_id: i64, log: ResultLog, results_path: Option<PathBuf>) -> Self {
        Self {
            storage,
            run_id,
            log,
            results_path,
        }
    }

    /// Opens an aggregator on an existing run, loading its log from storage
    pub fn resume(storage: S, run_id: i64, results_path: Option<PathBuf>) -> OutputResult<Self> {
        let log = ResultLog::from_entries(storage.load_results(run_id)?);
        tracing::info!("Loaded {} recorded results for run {}", log.len(), run_id);
        Ok(Self::new(storage, run_id, log, results_path))
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    pub fn statistics(&self) -> RunStatistics {
        compute_statistics(&self.log)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Gives the log back to the run
    pub fn into_log(self) -> ResultLog {
        self.log
    }
}

impl<S: Storage> ResultSink for Aggregator<S> {
    fn record_domain_result(&mut self, result: DomainResult) -> OutputResult<RunStatistics> {
        self.storage.append_result(self.run_id, &result)?;
        self.log.append(result);

        if let Some(path) = &self.results_path {
            write_results_file(path, &self.log)?;
        }

        Ok(compute_statistics(&self.log))
    }

    fn log(&self) -> &ResultLog {
        &self.log
    }

    fn finalize(&mut self, status: RunStatus) -> OutputResult<()> {
        match status {
            RunStatus::Completed => self.storage.complete_run(self.run_id)?,
            other => self.storage.update_run_status(self.run_id, other)?,
        }
        tracing::info!("Run {} finished as {}", self.run_id, status.to_db_string());
        Ok(())
    }
}
