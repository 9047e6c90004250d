//! Results publication port
//!
//! Defines the interface through which a closed voting session announces
//! its outcome. Implementations live at the consumer edge (chat layer,
//! CLI); the coordinator guarantees each session publishes at most once.

use async_trait::async_trait;
use cinevote_domain::{Record, Tally};
use serde::{Deserialize, Serialize};

/// What ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseCause {
    /// The deadline timer fired.
    Expired,
    /// The session was closed explicitly before the deadline.
    Cancelled,
}

/// The published outcome of one voting session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Canonical ranking: vote count descending, input order among ties.
    pub ranking: Vec<Tally>,
    /// The winner, when the top count is held by exactly one candidate.
    pub winner: Option<Tally>,
    /// The full top-count subset when the top is shared; the consumer runs
    /// tie resolution over it.
    pub tied: Vec<Record>,
    pub cause: CloseCause,
}

impl SessionOutcome {
    pub fn is_tied(&self) -> bool {
        self.tied.len() > 1
    }
}

/// Consumer of session outcomes.
#[async_trait]
pub trait ResultsPublisher: Send + Sync {
    /// Announce a closed session's outcome.
    async fn publish(&self, outcome: SessionOutcome);
}

/// No-op publisher for tests and fire-and-forget sessions.
pub struct NoPublisher;

#[async_trait]
impl ResultsPublisher for NoPublisher {
    async fn publish(&self, _outcome: SessionOutcome) {}
}
