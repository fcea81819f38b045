//! Run statistics
//!
//! Statistics are always recomputed from the full result log, never kept as running
//! counters, so they cannot drift from what the log actually holds.

use crate::output::ResultLog;
use crate::state::DomainStatus;
use crate::storage::{Storage, StorageResult};
use serde::Serialize;
use std::fmt;

/// Counts over every domain processed so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Domains processed; the denominator of every percentage
    pub total: u64,

    /// Seed fetched (with or without addresses)
    pub reachable: u64,

    /// Seed fetched and at least one candidate found
    pub with_addresses: u64,

    /// Seed fetched, no candidate found
    pub no_address: u64,

    pub unreachable: u64,

    /// At least one address resolved by the geocoder
    pub validated: u64,

    /// Crawl stopped early by a budget
    pub truncated: u64,
}

impl RunStatistics {
    /// Share of `count` in `total`, as a percentage (0.0 for an empty log)
    pub fn percentage(&self, count: u64) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (count as f64 / self.total as f64) * 100.0
        }
    }

    pub fn reachable_pct(&self) -> f64 {
        self.percentage(self.reachable)
    }

    pub fn unreachable_pct(&self) -> f64 {
        self.percentage(self.unreachable)
    }

    pub fn no_address_pct(&self) -> f64 {
        self.percentage(self.no_address)
    }

    pub fn validated_pct(&self) -> f64 {
        self.percentage(self.validated)
    }

    fn tally(&mut self, status: DomainStatus, validated: bool, truncated: bool) {
        self.total += 1;
        match status {
            DomainStatus::Reachable => {
                self.reachable += 1;
                self.with_addresses += 1;
            }
            DomainStatus::ReachableNoAddress => {
                self.reachable += 1;
                self.no_address += 1;
            }
            DomainStatus::Unreachable => self.unreachable += 1,
        }
        if validated {
            self.validated += 1;
        }
        if truncated {
            self.truncated += 1;
        }
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} reachable={} ({:.1}%) no-address={} ({:.1}%) unreachable={} ({:.1}%) validated={} ({:.1}%)",
            self.total,
            self.reachable,
            self.reachable_pct(),
            self.no_address,
            self.no_address_pct(),
            self.unreachable,
            self.unreachable_pct(),
            self.validated,
            self.validated_pct()
        )
    }
}

/// Computes statistics from the full log
pub fn compute_statistics(log: &ResultLog) -> RunStatistics {
    let mut stats = RunStatistics::default();
    for result in log.iter() {
        stats.tally(result.status, result.is_validated(), result.truncated);
    }
    stats
}

/// Loads statistics for a run straight from storage
pub fn load_statistics(storage: &dyn Storage, run_id: i64) -> StorageResult<RunStatistics> {
    let mut stats = RunStatistics {
        total: storage.count_results(run_id)?,
        ..RunStatistics::default()
    };

    for status in DomainStatus::all() {
        let count = storage.count_results_by_status(run_id, status)?;
        match status {
            DomainStatus::Reachable => stats.with_addresses = count,
            DomainStatus::ReachableNoAddress => stats.no_address = count,
            DomainStatus::Unreachable => stats.unreachable = count,
        }
    }
    stats.reachable = stats.with_addresses + stats.no_address;

    // Validation and truncation live inside the row payload
    for result in storage.load_results(run_id)? {
        if result.is_validated() {
            stats.validated += 1;
        }
        if result.truncated {
            stats.truncated += 1;
        }
    }

    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Run Statistics ===\n");

    println!("Domains processed: {}", stats.total);
    println!();

    println!("By Status:");
    println!(
        "  Reachable: {} ({:.1}%)",
        stats.reachable,
        stats.reachable_pct()
    );
    println!(
        "    with addresses: {} ({:.1}%)",
        stats.with_addresses,
        stats.percentage(stats.with_addresses)
    );
    println!(
        "    no addresses: {} ({:.1}%)",
        stats.no_address,
        stats.no_address_pct()
    );
    println!(
        "  Unreachable: {} ({:.1}%)",
        stats.unreachable,
        stats.unreachable_pct()
    );
    println!();

    println!(
        "Validated: {} ({:.1}%)",
        stats.validated,
        stats.validated_pct()
    );

    if stats.truncated > 0 {
        println!("Truncated by budget: {}", stats.truncated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::StructuredAddress;
    use crate::output::DomainResult;
    use crate::validate::ValidatedAddress;

    fn scenario_log() -> ResultLog {
        let unreachable =
            DomainResult::new(0, "down.com", "http://down.com", DomainStatus::Unreachable);
        let quiet = DomainResult::new(
            1,
            "quiet.com",
            "http://quiet.com",
            DomainStatus::ReachableNoAddress,
        );
        let mut found = DomainResult::new(2, "shop.com", "http://shop.com", DomainStatus::Reachable);
        found
            .address_candidates
            .insert("123 Main St, Springfield, IL 62704".into());
        found.validated_addresses.push(ValidatedAddress {
            address: StructuredAddress::default(),
            latitude: 1.0,
            longitude: 2.0,
            canonical_text: "Springfield".into(),
        });

        ResultLog::from_entries(vec![unreachable, quiet, found])
    }

    #[test]
    fn test_three_domain_statistics() {
        let stats = compute_statistics(&scenario_log());

        assert_eq!(stats.total, 3);
        assert_eq!(stats.unreachable, 1);
        assert_eq!(stats.no_address, 1);
        assert_eq!(stats.reachable, 2);
        assert_eq!(stats.validated, 1);

        assert_eq!(format!("{:.1}", stats.unreachable_pct()), "33.3");
        assert_eq!(format!("{:.1}", stats.no_address_pct()), "33.3");
        assert_eq!(format!("{:.1}", stats.reachable_pct()), "66.7");
    }

    #[test]
    fn test_empty_log() {
        let stats = compute_statistics(&ResultLog::new());
        assert_eq!(stats, RunStatistics::default());
        assert_eq!(stats.reachable_pct(), 0.0);
    }

    #[test]
    fn test_display() {
        let line = compute_statistics(&scenario_log()).to_string();
        assert!(line.starts_with("total=3 reachable=2 (66.7%)"));
        assert!(line.contains("validated=1 (33.3%)"));
    }

    #[test]
    fn test_load_statistics_matches_log() {
        use crate::storage::SqliteStorage;

        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("hash").unwrap();
        let log = scenario_log();
        for result in log.iter() {
            storage.append_result(run_id, result).unwrap();
        }

        assert_eq!(
            load_statistics(&storage, run_id).unwrap(),
            compute_statistics(&log)
        );
    }
}
