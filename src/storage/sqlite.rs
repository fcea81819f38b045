//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::output::DomainResult;
use crate::state::DomainStatus;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::ScoutError;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path` and makes sure the schema exists
    pub fn new(path: &Path) -> Result<Self, ScoutError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, ScoutError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Failed),
    })
}

/// A `domain_results` row before its JSON columns are decoded
struct ResultRow {
    position: i64,
    domain: String,
    url: String,
    status: String,
    candidates: String,
    validated: String,
    truncated: bool,
}

impl ResultRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            position: row.get(0)?,
            domain: row.get(1)?,
            url: row.get(2)?,
            status: row.get(3)?,
            candidates: row.get(4)?,
            validated: row.get(5)?,
            truncated: row.get(6)?,
        })
    }

    fn into_result(self) -> StorageResult<DomainResult> {
        let status = DomainStatus::from_db_string(&self.status).ok_or_else(|| {
            StorageError::Serialization(format!("unknown domain status '{}'", self.status))
        })?;
        let address_candidates = serde_json::from_str(&self.candidates)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let validated_addresses = serde_json::from_str(&self.validated)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        Ok(DomainResult {
            position: usize::try_from(self.position).map_err(|_| {
                StorageError::Serialization(format!("negative position {}", self.position))
            })?,
            domain: self.domain,
            url: self.url,
            status,
            address_candidates,
            validated_addresses,
            truncated: self.truncated,
        })
    }
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;

        Ok(run)
    }

    fn update_run_status(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1 WHERE id = ?2",
            params![status.to_db_string(), run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn complete_run(&mut self, run_id: i64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![RunStatus::Completed.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Result Log =====

    fn append_result(&mut self, run_id: i64, result: &DomainResult) -> StorageResult<()> {
        let candidates = serde_json::to_string(&result.address_candidates)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let validated = serde_json::to_string(&result.validated_addresses)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        let inserted = self.conn.execute(
            "INSERT INTO domain_results
             (run_id, position, domain, url, status, candidates, validated, truncated, processed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                run_id,
                result.position as i64,
                result.domain,
                result.url,
                result.status.to_db_string(),
                candidates,
                validated,
                result.truncated,
                now
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, msg))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::ConstraintViolation(msg.unwrap_or_else(|| {
                    format!(
                        "run {} already has a result at position {}",
                        run_id, result.position
                    )
                })))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn load_results(&self, run_id: i64) -> StorageResult<Vec<DomainResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT position, domain, url, status, candidates, validated, truncated
             FROM domain_results WHERE run_id = ?1 ORDER BY position",
        )?;

        let rows = stmt
            .query_map(params![run_id], ResultRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(ResultRow::into_result).collect()
    }

    fn count_results(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM domain_results WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_results_by_status(&self, run_id: i64, status: DomainStatus) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM domain_results WHERE run_id = ?1 AND status = ?2",
            params![run_id, status.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
