//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Address-Scout database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track batch runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Append-only result log, one row per processed domain
CREATE TABLE IF NOT EXISTS domain_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    position INTEGER NOT NULL,
    domain TEXT NOT NULL,
    url TEXT NOT NULL,
    status TEXT NOT NULL,
    candidates TEXT NOT NULL,
    validated TEXT NOT NULL,
    truncated INTEGER NOT NULL DEFAULT 0,
    processed_at TEXT NOT NULL,
    UNIQUE(run_id, position)
);

CREATE INDEX IF NOT EXISTS idx_domain_results_run ON domain_results(run_id);
CREATE INDEX IF NOT EXISTS idx_domain_results_status ON domain_results(status);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
