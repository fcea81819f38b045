//! Crawler module for fetching one domain's pages
//!
//! This module contains the per-domain crawling logic, including:
//! - HTTP fetching with typed outcomes and no retries
//! - HTML parsing for page text and anchor hrefs
//! - The same-origin frontier that drives the fetcher for one domain

mod fetcher;
mod parser;
mod site;

pub use fetcher::{build_http_client, fetch_url, FetchOutcome, SoftErrorReason};
pub use parser::{parse_page, resolve_href, ParsedPage};
pub use site::{CrawlLimits, CrawlOutput, SiteCrawler};
