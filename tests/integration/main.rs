//! Integration tests for Address-Scout
//!
//! Every test drives real HTTP through wiremock mock servers and, where storage is
//! involved, a temporary SQLite database.

mod common;
mod crawl_tests;
mod pipeline_tests;
