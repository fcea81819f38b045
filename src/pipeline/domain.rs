//! One domain, start to finish
//!
//! crawl -> normalize -> extract -> validate -> `DomainResult`. Each stage consumes only
//! the previous stage's output and reports failure as a typed value, so the only way
//! out of [`DomainPipeline::process`] without a result is run-level cancellation.

use crate::config::Config;
use crate::crawler::{build_http_client, CrawlLimits, CrawlOutput, SiteCrawler};
use crate::extract::Extractor;
use crate::output::DomainResult;
use crate::state::DomainStatus;
use crate::text::normalize;
use crate::url::seed_url;
use crate::validate::Validator;
use crate::ScoutError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// What came out of processing one domain
#[derive(Debug, Clone, PartialEq)]
pub enum DomainOutcome {
    /// Ready to be appended to the log
    Completed(DomainResult),

    /// The run was cancelled while this domain was in flight; nothing to record
    Cancelled,
}

/// The per-domain stages, shared by every worker
#[derive(Debug, Clone)]
pub struct DomainPipeline {
    crawler: SiteCrawler,
    extractor: Extractor,
    validator: Validator,
    domain_budget: Option<Duration>,
}

impl DomainPipeline {
    pub fn new(
        crawler: SiteCrawler,
        extractor: Extractor,
        validator: Validator,
        domain_budget: Option<Duration>,
    ) -> Self {
        Self {
            crawler,
            extractor,
            validator,
            domain_budget,
        }
    }

    /// Builds the pipeline described by the configuration
    pub fn from_config(config: &Config) -> Result<Self, ScoutError> {
        let limits = CrawlLimits::from(&config.crawler);
        let client = build_http_client(&config.user_agent, limits.request_timeout)?;
        let validator = Validator::from_config(config)?;

        Ok(Self::new(
            SiteCrawler::new(client, limits),
            Extractor::default(),
            validator,
            config.crawler.domain_budget_seconds.map(Duration::from_secs),
        ))
    }

    /// Processes the domain at `position` of the input list
    pub async fn process(
        &self,
        position: usize,
        domain: &str,
        cancel: &CancellationToken,
    ) -> DomainOutcome {
        let seed = match seed_url(domain) {
            Ok(seed) => seed,
            Err(e) => {
                tracing::warn!("Cannot build a seed URL for '{}': {}", domain, e);
                return DomainOutcome::Completed(DomainResult::new(
                    position,
                    domain,
                    domain,
                    DomainStatus::Unreachable,
                ));
            }
        };

        let output = self.crawl_within_budget(&seed, cancel).await;
        if cancel.is_cancelled() {
            return DomainOutcome::Cancelled;
        }

        let mut result =
            DomainResult::new(position, domain, seed.as_str(), DomainStatus::Unreachable);
        result.truncated = output.truncated;

        if output.is_unreachable() {
            return DomainOutcome::Completed(result);
        }

        let clean_text = normalize(output.text.as_deref());
        let Some(candidates) = self.extractor.extract(clean_text.as_deref()) else {
            result.status = DomainStatus::ReachableNoAddress;
            return DomainOutcome::Completed(result);
        };

        result.status = DomainStatus::Reachable;
        result.address_candidates = candidates.texts();

        let structured = candidates.structured();
        tracing::debug!(
            "{}: {} candidates, {} complete addresses",
            domain,
            candidates.len(),
            structured.len()
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => DomainOutcome::Cancelled,
            validated = self.validator.validate_all(&structured) => {
                result.validated_addresses = validated;
                DomainOutcome::Completed(result)
            }
        }
    }

    /// Runs the crawl, cancelling a child token when the domain budget runs out
    async fn crawl_within_budget(
        &self,
        seed: &url::Url,
        cancel: &CancellationToken,
    ) -> CrawlOutput {
        let domain_cancel = cancel.child_token();
        let crawl = self.crawler.crawl(seed, &domain_cancel);

        let Some(budget) = self.domain_budget else {
            return crawl.await;
        };

        tokio::pin!(crawl);
        tokio::select! {
            output = &mut crawl => output,
            _ = tokio::time::sleep(budget) => {
                tracing::info!("Domain budget of {:?} spent on {}", budget, seed);
                domain_cancel.cancel();
                crawl.await
            }
        }
    }
}
