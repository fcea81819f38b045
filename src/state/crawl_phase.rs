use std::fmt;

/// Lifecycle of a single domain crawl
///
/// `Idle -> FetchingSeed -> Draining -> Done`, with a direct `FetchingSeed -> Done`
/// edge for a failed seed. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Frontier holds only the seed; nothing fetched yet
    Idle,

    /// Seed request in flight
    FetchingSeed,

    /// Seed fetched; draining same-origin links from the frontier
    Draining,

    /// Frontier exhausted, budget spent, cancelled, or seed failed
    Done,
}

impl CrawlPhase {
    /// Returns true if `next` is a legal successor of this phase
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::FetchingSeed)
                | (Self::FetchingSeed, Self::Draining)
                | (Self::FetchingSeed, Self::Done)
                | (Self::Draining, Self::Done)
        )
    }

    /// Moves to `next`, logging and refusing illegal transitions
    pub fn advance(&mut self, next: CrawlPhase) -> bool {
        if self.can_transition_to(next) {
            tracing::trace!("Crawl phase {} -> {}", self, next);
            *self = next;
            true
        } else {
            tracing::warn!("Ignoring invalid crawl phase transition {} -> {}", self, next);
            false
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::FetchingSeed => "fetching_seed",
            Self::Draining => "draining",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}
