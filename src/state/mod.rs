//! State module for tracking per-domain progress
//!
//! # Components
//!
//! - `DomainStatus`: final outcome of a domain (reachable, no addresses, unreachable)
//! - `CrawlPhase`: lifecycle of a single domain crawl

mod crawl_phase;
mod domain_status;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use domain_status::DomainStatus;
