//! Per-domain crawl driver
//!
//! A `SiteCrawler` owns nothing across domains: every call to [`SiteCrawler::crawl`] starts
//! with a fresh frontier and fresh visited sets, fetches the seed, then drains same-origin
//! links one page at a time until the frontier is empty, the page budget is spent, or the
//! cancellation token fires.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{fetch_url, FetchOutcome};
use crate::crawler::parser::{parse_page, resolve_href};
use crate::state::CrawlPhase;
use crate::url::{canonical_url, same_origin};
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Limits applied to a single domain crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Link hops followed from the seed (1 = seed plus the links found on it)
    pub max_depth: u32,

    /// Maximum number of fetch attempts, seed included
    pub max_pages: Option<u32>,

    /// Timeout for each individual request
    pub request_timeout: Duration,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for CrawlLimits {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_pages: config.max_pages_per_domain,
            request_timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// What one domain crawl produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutput {
    /// Text of every fetched page in fetch order, joined by newlines.
    /// `None` is the unreachable marker: the seed was never fetched.
    pub text: Option<String>,

    /// Pages fetched successfully, seed included
    pub pages_fetched: u32,

    /// Link fetches that ended in a soft or hard error
    pub pages_skipped: u32,

    /// The frontier was abandoned early (page budget or cancellation)
    pub truncated: bool,
}

impl CrawlOutput {
    fn unreachable(truncated: bool) -> Self {
        Self {
            truncated,
            ..Self::default()
        }
    }

    pub fn is_unreachable(&self) -> bool {
        self.text.is_none()
    }
}

/// Drives the fetcher over one domain's same-origin pages
#[derive(Debug, Clone)]
pub struct SiteCrawler {
    client: Client,
    limits: CrawlLimits,
}

/// Mutable state of one crawl; dropped when the crawl returns
struct Frontier<'a> {
    seed: &'a Url,
    max_depth: u32,
    queue: VecDeque<(Url, u32)>,
    visited_hrefs: HashSet<String>,
    visited_urls: HashSet<String>,
}

impl<'a> Frontier<'a> {
    fn new(seed: &'a Url, max_depth: u32) -> Self {
        let mut visited_urls = HashSet::new();
        visited_urls.insert(canonical_url(seed));

        Self {
            seed,
            max_depth,
            queue: VecDeque::new(),
            visited_hrefs: HashSet::new(),
            visited_urls,
        }
    }

    /// Enqueues the links found on a page fetched at `depth`
    ///
    /// A link is accepted when it resolves, shares the seed's origin, and is new to this
    /// crawl. Single-hop crawls key "new" on the raw href. Multi-hop crawls key it on the
    /// canonical URL, which bounds the crawl on cyclic link graphs.
    fn enqueue_links(&mut self, hrefs: Vec<String>, page_url: &Url, depth: u32) {
        if depth >= self.max_depth {
            return;
        }

        for href in hrefs {
            let Some(resolved) = resolve_href(&href, page_url) else {
                tracing::trace!("Unresolvable href '{}' on {}", href, page_url);
                continue;
            };

            if !same_origin(&resolved, self.seed) {
                tracing::trace!("Skipping off-origin link {}", resolved);
                continue;
            }

            // Raw href for single-hop crawls, canonical URL for deeper ones
            let is_new = if self.max_depth > 1 {
                self.visited_urls.insert(canonical_url(&resolved))
            } else {
                self.visited_hrefs.insert(href)
            };
            if !is_new {
                continue;
            }

            self.queue.push_back((resolved, depth + 1));
        }
    }
}

impl SiteCrawler {
    pub fn new(client: Client, limits: CrawlLimits) -> Self {
        Self { client, limits }
    }

    /// Crawls one domain starting at `seed`
    ///
    /// A seed that is not fetched ends the crawl at once with the unreachable marker; no
    /// links are ever taken from a failed seed. After that, a failing link is counted as
    /// skipped and the crawl moves on.
    ///
    /// When `cancel` fires, the frontier is abandoned and whatever text was gathered so
    /// far is returned with `truncated` set.
    pub async fn crawl(&self, seed: &Url, cancel: &CancellationToken) -> CrawlOutput {
        let mut phase = CrawlPhase::Idle;
        let mut frontier = Frontier::new(seed, self.limits.max_depth);

        phase.advance(CrawlPhase::FetchingSeed);
        let Some(outcome) = self.fetch(seed, cancel).await else {
            tracing::debug!("Crawl of {} cancelled before the seed was fetched", seed);
            phase.advance(CrawlPhase::Done);
            return CrawlOutput::unreachable(true);
        };

        let body = match outcome {
            FetchOutcome::Fetched { body, .. } => body,
            FetchOutcome::SoftError(reason) => {
                tracing::warn!("Seed {} not fetched: {}", seed, reason);
                phase.advance(CrawlPhase::Done);
                return CrawlOutput::unreachable(false);
            }
            FetchOutcome::HardError(reason) => {
                tracing::warn!("Seed {} failed: {}", seed, reason);
                phase.advance(CrawlPhase::Done);
                return CrawlOutput::unreachable(false);
            }
        };

        let page = parse_page(&body);
        let mut texts = vec![page.text];
        let mut output = CrawlOutput {
            pages_fetched: 1,
            ..CrawlOutput::default()
        };
        frontier.enqueue_links(page.hrefs, seed, 0);

        phase.advance(CrawlPhase::Draining);
        tracing::debug!("{} links queued from seed {}", frontier.queue.len(), seed);

        while let Some((url, depth)) = frontier.queue.pop_front() {
            if let Some(max_pages) = self.limits.max_pages {
                if output.pages_fetched + output.pages_skipped >= max_pages {
                    tracing::debug!("Page budget of {} reached for {}", max_pages, seed);
                    output.truncated = true;
                    break;
                }
            }

            let Some(outcome) = self.fetch(&url, cancel).await else {
                tracing::debug!(
                    "Crawl of {} cancelled with {} pages left",
                    seed,
                    frontier.queue.len() + 1
                );
                output.truncated = true;
                break;
            };

            match outcome {
                FetchOutcome::Fetched { body, .. } => {
                    let page = parse_page(&body);
                    texts.push(page.text);
                    output.pages_fetched += 1;
                    // Resolve against the requested URL so the origin check compares like with like
                    frontier.enqueue_links(page.hrefs, &url, depth);
                }
                FetchOutcome::SoftError(reason) => {
                    tracing::debug!("Skipping {}: {}", url, reason);
                    output.pages_skipped += 1;
                }
                FetchOutcome::HardError(reason) => {
                    tracing::debug!("Skipping {}: {}", url, reason);
                    output.pages_skipped += 1;
                }
            }
        }

        phase.advance(CrawlPhase::Done);
        output.text = Some(texts.join("\n"));
        output
    }

    /// Fetches one URL, giving up if the token fires first
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Option<FetchOutcome> {
        if cancel.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            outcome = fetch_url(&self.client, url.as_str(), self.limits.request_timeout) => Some(outcome),
        }
    }
}
