//! Bounded, ordered worker pool
//!
//! Up to `workers` domains are processed concurrently as tokio tasks. Handles are kept in
//! dispatch order and awaited from the front, so the single writer records results in
//! input order no matter which task finishes first.

use crate::output::{DomainResult, OutputResult, ResultSink, RunStatistics};
use crate::pipeline::domain::{DomainOutcome, DomainPipeline};
use crate::state::DomainStatus;
use crate::url::seed_url;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How a batch went
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Domains in the input list
    pub total: usize,

    /// Domains skipped because the log already held their result
    pub already_recorded: usize,

    /// Domains recorded during this batch
    pub recorded: usize,

    /// The run token fired before the batch finished
    pub interrupted: bool,

    /// Statistics over the whole log at the end of the batch
    pub statistics: RunStatistics,
}

struct InFlight {
    position: usize,
    domain: String,
    /// Seed URL the domain crawls from; two spellings of one site share it
    site_key: String,
    handle: JoinHandle<DomainOutcome>,
}

/// Key identifying the site a domain string points at
///
/// Falls back to the raw string when no seed URL can be built; such a domain is
/// recorded without any request anyway.
fn site_key(domain: &str) -> String {
    seed_url(domain)
        .map(|seed| seed.to_string())
        .unwrap_or_else(|_| domain.to_string())
}

/// Processes every domain not already in the sink's log
///
/// Dispatch stops as soon as `cancel` fires; in-flight domains are awaited but their
/// (cancelled) outcomes are not recorded. Two domain strings that lead to the same seed
/// URL never run concurrently.
pub async fn run_batch<S: ResultSink>(
    pipeline: Arc<DomainPipeline>,
    domains: &[String],
    sink: &mut S,
    workers: usize,
    cancel: &CancellationToken,
) -> OutputResult<BatchReport> {
    let workers = workers.max(1);
    let done = sink.log().positions();
    let mut report = BatchReport {
        total: domains.len(),
        ..BatchReport::default()
    };
    let mut in_flight: VecDeque<InFlight> = VecDeque::with_capacity(workers);

    for (position, domain) in domains.iter().enumerate() {
        if done.contains(&position) {
            report.already_recorded += 1;
            continue;
        }
        if cancel.is_cancelled() {
            break;
        }

        let key = site_key(domain);
        while in_flight.iter().any(|task| task.site_key == key) || in_flight.len() >= workers {
            record_next(&mut in_flight, sink, &mut report).await?;
        }

        let task_pipeline = Arc::clone(&pipeline);
        let task_domain = domain.clone();
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            task_pipeline
                .process(position, &task_domain, &task_cancel)
                .await
        });

        in_flight.push_back(InFlight {
            position,
            domain: domain.clone(),
            site_key: key,
            handle,
        });
    }

    while !in_flight.is_empty() {
        record_next(&mut in_flight, sink, &mut report).await?;
    }

    report.interrupted = cancel.is_cancelled();
    report.statistics = crate::output::compute_statistics(sink.log());
    Ok(report)
}

/// Awaits the oldest in-flight domain and records its result
async fn record_next<S: ResultSink>(
    in_flight: &mut VecDeque<InFlight>,
    sink: &mut S,
    report: &mut BatchReport,
) -> OutputResult<()> {
    let Some(task) = in_flight.pop_front() else {
        return Ok(());
    };

    let result = match task.handle.await {
        Ok(DomainOutcome::Completed(result)) => result,
        Ok(DomainOutcome::Cancelled) => {
            tracing::debug!("{} cancelled before completion", task.domain);
            return Ok(());
        }
        Err(e) => {
            // A panicking worker still yields a result so the batch can move on
            tracing::error!("Worker for {} failed: {}", task.domain, e);
            DomainResult::new(
                task.position,
                task.domain.as_str(),
                task.domain.as_str(),
                DomainStatus::Unreachable,
            )
        }
    };

    let domain = result.domain.clone();
    let status = result.status;
    let stats = sink.record_domain_result(result)?;
    report.recorded += 1;

    tracing::info!(
        "[{}/{}] {} -> {}",
        task.position + 1,
        report.total,
        domain,
        status
    );
    tracing::info!("{}", stats);

    Ok(())
}
