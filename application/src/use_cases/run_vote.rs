//! Voting coordination use case
//!
//! Owns live [`VotingSession`]s behind a mutex so every mutation is
//! serialized, runs one cancellable deadline timer per session, and
//! guarantees the outcome is published exactly once: whichever of
//! {timer fire, explicit close} performs the open→closed transition owns
//! publication, the loser is a no-op.

use crate::ports::event_log::{ActivityEvent, EventLog, NoEventLog};
use crate::ports::results_publisher::{CloseCause, ResultsPublisher, SessionOutcome};
use cinevote_domain::{
    Record, SessionSpecError, Tally, VoteError, VoterId, VotingSession,
};
use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur when starting a session
#[derive(Error, Debug)]
pub enum StartVoteError {
    #[error(transparent)]
    Spec(#[from] SessionSpecError),

    #[error("a voting session is already active in scope '{0}'")]
    AlreadyActive(String),
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteToggle {
    Cast,
    Retracted,
}

/// Point-in-time view of a session, for rendering.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub candidates: Vec<Record>,
    pub counts: Vec<usize>,
    pub max_votes_per_user: usize,
    pub remaining: Duration,
    pub active: bool,
}

/// Handle to one live session. Cloneable; all clones share the session.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<VotingSession>>,
    cancel: CancellationToken,
    publisher: Arc<dyn ResultsPublisher>,
    event_log: Arc<dyn EventLog>,
    scope: String,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl SessionHandle {
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub async fn is_active(&self) -> bool {
        self.session.lock().await.is_active()
    }

    pub async fn status(&self) -> SessionStatus {
        let session = self.session.lock().await;
        let counts = (0..session.candidates().len())
            .map(|i| session.vote_count(i).unwrap_or(0))
            .collect();
        SessionStatus {
            candidates: session.candidates().to_vec(),
            counts,
            max_votes_per_user: session.max_votes_per_user(),
            remaining: session.time_remaining(),
            active: session.is_active(),
        }
    }

    pub async fn cast_vote(&self, voter: VoterId, index: usize) -> Result<(), VoteError> {
        let mut session = self.session.lock().await;
        session.cast_vote(voter, index)?;
        debug!("Voter {} cast vote for candidate {}", voter, index);
        self.event_log.log(ActivityEvent::new(
            "vote_cast",
            serde_json::json!({ "scope": self.scope, "voter": voter.0, "candidate": index }),
        ));
        Ok(())
    }

    pub async fn retract_vote(&self, voter: VoterId, index: usize) -> Result<(), VoteError> {
        let mut session = self.session.lock().await;
        session.retract_vote(voter, index)?;
        debug!("Voter {} retracted vote for candidate {}", voter, index);
        self.event_log.log(ActivityEvent::new(
            "vote_retracted",
            serde_json::json!({ "scope": self.scope, "voter": voter.0, "candidate": index }),
        ));
        Ok(())
    }

    /// Cast when the voter holds no vote on this candidate, retract when
    /// they do (the vote-button behavior).
    pub async fn toggle_vote(&self, voter: VoterId, index: usize) -> Result<VoteToggle, VoteError> {
        let holds_vote = {
            let session = self.session.lock().await;
            session.has_voted(voter, index)
        };
        if holds_vote {
            self.retract_vote(voter, index).await?;
            Ok(VoteToggle::Retracted)
        } else {
            self.cast_vote(voter, index).await?;
            Ok(VoteToggle::Cast)
        }
    }

    /// Current ranking (also available after close).
    pub async fn results(&self) -> Vec<Tally> {
        self.session.lock().await.results()
    }

    /// Close the session before the deadline.
    ///
    /// Returns the outcome when THIS call performed the transition; `None`
    /// when the session was already closed (the timer or an earlier close
    /// published it).
    pub async fn close(&self) -> Option<SessionOutcome> {
        self.cancel.cancel();

        let outcome = {
            let mut session = self.session.lock().await;
            if session.close() {
                Some(build_outcome(&session, CloseCause::Cancelled))
            } else {
                None
            }
        };

        if let Some(outcome) = outcome {
            info!("Session '{}' cancelled", self.scope);
            self.log_closed(&outcome);
            self.publisher.publish(outcome.clone()).await;
            return Some(outcome);
        }
        None
    }

    fn log_closed(&self, outcome: &SessionOutcome) {
        self.event_log.log(ActivityEvent::new(
            "session_closed",
            serde_json::json!({
                "scope": self.scope,
                "cause": outcome.cause,
                "winner": outcome.winner.as_ref().map(|t| t.candidate.title.clone()),
                "tied": outcome.tied.iter().map(|r| r.title.clone()).collect::<Vec<_>>(),
            }),
        ));
    }
}

/// Use case for running voting sessions.
///
/// At most one active session per scope (a chat channel, in the original
/// deployment). Independent scopes run fully in parallel with no shared
/// state.
pub struct VoteCoordinator {
    publisher: Arc<dyn ResultsPublisher>,
    event_log: Arc<dyn EventLog>,
    active: Mutex<HashMap<String, SessionHandle>>,
}

impl VoteCoordinator {
    pub fn new(publisher: Arc<dyn ResultsPublisher>) -> Self {
        Self {
            publisher,
            event_log: Arc::new(NoEventLog),
            active: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_event_log(mut self, event_log: Arc<dyn EventLog>) -> Self {
        self.event_log = event_log;
        self
    }

    /// Open a session over `candidates` and start its deadline timer.
    pub async fn start(
        &self,
        scope: impl Into<String>,
        candidates: Vec<Record>,
        max_votes_per_user: usize,
        duration: Duration,
    ) -> Result<SessionHandle, StartVoteError> {
        let scope = scope.into();
        let session = VotingSession::new(candidates, max_votes_per_user, duration)?;

        let mut active = self.active.lock().await;
        if let Some(existing) = active.get(&scope)
            && existing.is_active().await
        {
            return Err(StartVoteError::AlreadyActive(scope));
        }

        info!(
            "Opening voting session in '{}': {} candidates, quota {}, {} minute(s)",
            scope,
            session.candidates().len(),
            max_votes_per_user,
            duration.num_minutes()
        );
        self.event_log.log(ActivityEvent::new(
            "session_opened",
            serde_json::json!({
                "scope": scope,
                "candidates": session.candidates().iter().map(|r| r.title.clone()).collect::<Vec<_>>(),
                "max_votes_per_user": max_votes_per_user,
                "minutes": duration.num_minutes(),
            }),
        ));

        let handle = SessionHandle {
            session: Arc::new(Mutex::new(session)),
            cancel: CancellationToken::new(),
            publisher: Arc::clone(&self.publisher),
            event_log: Arc::clone(&self.event_log),
            scope: scope.clone(),
        };
        active.insert(scope, handle.clone());

        spawn_deadline_timer(&handle, duration);
        Ok(handle)
    }

    /// The active session for a scope, if any.
    pub async fn session(&self, scope: &str) -> Option<SessionHandle> {
        self.active.lock().await.get(scope).cloned()
    }
}

/// Schedule the single wake-up for a session's deadline.
fn spawn_deadline_timer(handle: &SessionHandle, duration: Duration) {
    let handle = handle.clone();
    let sleep = duration.to_std().unwrap_or_default();

    tokio::spawn(async move {
        tokio::select! {
            _ = handle.cancel.cancelled() => {
                // Explicit close owns publication; nothing to do.
            }
            _ = tokio::time::sleep(sleep) => {
                let outcome = {
                    let mut session = handle.session.lock().await;
                    if session.close() {
                        Some(build_outcome(&session, CloseCause::Expired))
                    } else {
                        None
                    }
                };
                match outcome {
                    Some(outcome) => {
                        info!("Session '{}' expired, publishing results", handle.scope);
                        handle.log_closed(&outcome);
                        handle.publisher.publish(outcome).await;
                    }
                    None => {
                        warn!("Session '{}' was already closed at deadline", handle.scope);
                    }
                }
            }
        }
    });
}

fn build_outcome(session: &VotingSession, cause: CloseCause) -> SessionOutcome {
    let ranking = session.results();
    let leaders = session.leaders();
    let (winner, tied) = if leaders.len() > 1 {
        (None, leaders)
    } else {
        (ranking.first().cloned(), Vec::new())
    };
    SessionOutcome {
        ranking,
        winner,
        tied,
        cause,
    }
}
