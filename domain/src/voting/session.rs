//! The time-boxed voting session state machine.
//!
//! A session is created over a fixed candidate set and moves through exactly
//! two states: open, then closed. Vote mutations are rejected once closed.
//! The session itself holds no timer and does no I/O; the application layer
//! owns the deadline and calls [`VotingSession::close`] when it fires.
//!
//! All vote failures are recoverable rejections reported back to the voter;
//! none of them crash the session.

use crate::record::Record;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Allowed candidate counts.
pub const CANDIDATE_BOUNDS: RangeInclusive<usize> = 2..=10;
/// Allowed per-user vote quotas.
pub const QUOTA_BOUNDS: RangeInclusive<usize> = 1..=5;
/// Allowed session durations, in minutes.
pub const DURATION_MINUTE_BOUNDS: RangeInclusive<i64> = 1..=60;

/// A voter's chat-platform identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VoterId(pub u64);

impl std::fmt::Display for VoterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejected session parameters.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionSpecError {
    #[error("candidate count {0} out of range (2-10)")]
    CandidateCount(usize),

    #[error("max votes per user {0} out of range (1-5)")]
    Quota(usize),

    #[error("duration of {0} minute(s) out of range (1-60)")]
    Duration(i64),
}

/// Vote rejections. Reported to the voter, never fatal to the session.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VoteError {
    #[error("the voting session has already closed")]
    SessionClosed,

    #[error("candidate {0} does not exist")]
    InvalidCandidate(usize),

    #[error("you already voted for this candidate")]
    DuplicateVote,

    #[error("you already used your {max} vote(s)")]
    QuotaExceeded { max: usize },

    #[error("you have not voted for this candidate")]
    NoSuchVote,
}

/// One row of the ranking: a candidate and its vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub candidate: Record,
    pub votes: usize,
}

/// In-memory aggregation of votes over a fixed candidate set.
///
/// # Example
///
/// ```
/// use cinevote_domain::record::Record;
/// use cinevote_domain::voting::{VoterId, VotingSession};
/// use chrono::Duration;
///
/// let candidates = vec![
///     Record::synthetic("Dune", "Ana"),
///     Record::synthetic("Heat", "Bob"),
/// ];
/// let mut session = VotingSession::new(candidates, 1, Duration::minutes(5)).unwrap();
/// session.cast_vote(VoterId(1), 0).unwrap();
/// assert_eq!(session.results()[0].candidate.title, "Dune");
/// ```
#[derive(Debug, Clone)]
pub struct VotingSession {
    candidates: Vec<Record>,
    max_votes_per_user: usize,
    deadline: DateTime<Utc>,
    /// Index-aligned with `candidates`; every entry present even when empty.
    ballots: Vec<HashSet<VoterId>>,
    /// Per-voter cast sequence, for quota enforcement and retraction.
    cast_order: HashMap<VoterId, Vec<usize>>,
    active: bool,
}

impl VotingSession {
    /// Create an open session, validating candidate count, quota and
    /// duration bounds.
    pub fn new(
        candidates: Vec<Record>,
        max_votes_per_user: usize,
        duration: Duration,
    ) -> Result<Self, SessionSpecError> {
        if !CANDIDATE_BOUNDS.contains(&candidates.len()) {
            return Err(SessionSpecError::CandidateCount(candidates.len()));
        }
        if !QUOTA_BOUNDS.contains(&max_votes_per_user) {
            return Err(SessionSpecError::Quota(max_votes_per_user));
        }
        if duration < Duration::minutes(*DURATION_MINUTE_BOUNDS.start())
            || duration > Duration::minutes(*DURATION_MINUTE_BOUNDS.end())
        {
            return Err(SessionSpecError::Duration(duration.num_minutes()));
        }

        let ballots = vec![HashSet::new(); candidates.len()];
        Ok(Self {
            candidates,
            max_votes_per_user,
            deadline: Utc::now() + duration,
            ballots,
            cast_order: HashMap::new(),
            active: true,
        })
    }

    pub fn candidates(&self) -> &[Record] {
        &self.candidates
    }

    pub fn max_votes_per_user(&self) -> usize {
        self.max_votes_per_user
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Time until the deadline, clamped at zero.
    pub fn time_remaining(&self) -> Duration {
        (self.deadline - Utc::now()).max(Duration::zero())
    }

    /// Whether this voter currently holds a vote on this candidate.
    pub fn has_voted(&self, voter: VoterId, index: usize) -> bool {
        self.ballots
            .get(index)
            .is_some_and(|b| b.contains(&voter))
    }

    /// How many votes this voter has cast so far.
    pub fn votes_cast_by(&self, voter: VoterId) -> usize {
        self.cast_order.get(&voter).map_or(0, Vec::len)
    }

    /// Vote count for one candidate.
    pub fn vote_count(&self, index: usize) -> Option<usize> {
        self.ballots.get(index).map(HashSet::len)
    }

    /// Cast a vote for the candidate at `index`.
    pub fn cast_vote(&mut self, voter: VoterId, index: usize) -> Result<(), VoteError> {
        if !self.active {
            return Err(VoteError::SessionClosed);
        }
        if index >= self.candidates.len() {
            return Err(VoteError::InvalidCandidate(index));
        }
        if self.ballots[index].contains(&voter) {
            return Err(VoteError::DuplicateVote);
        }
        if self.votes_cast_by(voter) >= self.max_votes_per_user {
            return Err(VoteError::QuotaExceeded {
                max: self.max_votes_per_user,
            });
        }

        self.ballots[index].insert(voter);
        self.cast_order.entry(voter).or_default().push(index);
        Ok(())
    }

    /// Retract a previously cast vote, restoring the exact pre-vote state.
    pub fn retract_vote(&mut self, voter: VoterId, index: usize) -> Result<(), VoteError> {
        if !self.active {
            return Err(VoteError::SessionClosed);
        }
        if !self.has_voted(voter, index) {
            return Err(VoteError::NoSuchVote);
        }

        self.ballots[index].remove(&voter);
        if let Some(cast) = self.cast_order.get_mut(&voter) {
            cast.retain(|&i| i != index);
            if cast.is_empty() {
                self.cast_order.remove(&voter);
            }
        }
        Ok(())
    }

    /// The canonical ranking: vote count descending, ties keep candidate
    /// input order (stable sort). Used both for display and for winner
    /// determination.
    pub fn results(&self) -> Vec<Tally> {
        let mut tallies: Vec<Tally> = self
            .candidates
            .iter()
            .zip(&self.ballots)
            .map(|(candidate, voters)| Tally {
                candidate: candidate.clone(),
                votes: voters.len(),
            })
            .collect();
        tallies.sort_by(|a, b| b.votes.cmp(&a.votes));
        tallies
    }

    /// The top of the ranking. When [`VotingSession::leaders`] has more than
    /// one entry this alone cannot disambiguate; the caller runs tie
    /// resolution.
    pub fn winner(&self) -> Option<Tally> {
        self.results().into_iter().next()
    }

    /// All candidates sharing the maximum vote count, in input order.
    pub fn leaders(&self) -> Vec<Record> {
        let Some(max) = self.ballots.iter().map(HashSet::len).max() else {
            return Vec::new();
        };
        self.candidates
            .iter()
            .zip(&self.ballots)
            .filter(|(_, voters)| voters.len() == max)
            .map(|(candidate, _)| candidate.clone())
            .collect()
    }

    pub fn is_tied(&self) -> bool {
        self.leaders().len() > 1
    }

    /// Transition to closed. Returns true only for the call that actually
    /// performed the transition; that caller owns result publication.
    pub fn close(&mut self) -> bool {
        if self.active {
            self.active = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_candidates() -> Vec<Record> {
        vec![
            Record::synthetic("Dune", "Ana"),
            Record::synthetic("Heat", "Bob"),
        ]
    }

    fn open_session(max_votes: usize) -> VotingSession {
        VotingSession::new(two_candidates(), max_votes, Duration::minutes(5)).unwrap()
    }

    #[test]
    fn test_bounds_validation() {
        let one = vec![Record::synthetic("Dune", "Ana")];
        assert_eq!(
            VotingSession::new(one, 1, Duration::minutes(5)).unwrap_err(),
            SessionSpecError::CandidateCount(1)
        );
        assert_eq!(
            VotingSession::new(two_candidates(), 0, Duration::minutes(5)).unwrap_err(),
            SessionSpecError::Quota(0)
        );
        assert_eq!(
            VotingSession::new(two_candidates(), 6, Duration::minutes(5)).unwrap_err(),
            SessionSpecError::Quota(6)
        );
        assert_eq!(
            VotingSession::new(two_candidates(), 1, Duration::minutes(61)).unwrap_err(),
            SessionSpecError::Duration(61)
        );
        assert_eq!(
            VotingSession::new(two_candidates(), 1, Duration::seconds(30)).unwrap_err(),
            SessionSpecError::Duration(0)
        );
    }

    #[test]
    fn test_cast_and_count() {
        let mut session = open_session(2);
        session.cast_vote(VoterId(1), 0).unwrap();
        session.cast_vote(VoterId(2), 0).unwrap();
        session.cast_vote(VoterId(1), 1).unwrap();

        assert_eq!(session.vote_count(0), Some(2));
        assert_eq!(session.vote_count(1), Some(1));
        assert_eq!(session.votes_cast_by(VoterId(1)), 2);
    }

    #[test]
    fn test_duplicate_vote_rejected() {
        let mut session = open_session(2);
        session.cast_vote(VoterId(1), 0).unwrap();
        assert_eq!(
            session.cast_vote(VoterId(1), 0),
            Err(VoteError::DuplicateVote)
        );
    }

    #[test]
    fn test_invalid_candidate_rejected() {
        let mut session = open_session(1);
        assert_eq!(
            session.cast_vote(VoterId(1), 9),
            Err(VoteError::InvalidCandidate(9))
        );
    }

    #[test]
    fn test_quota_rejection_leaves_first_vote_untouched() {
        let mut session = open_session(1);
        session.cast_vote(VoterId(1), 0).unwrap();

        assert_eq!(
            session.cast_vote(VoterId(1), 1),
            Err(VoteError::QuotaExceeded { max: 1 })
        );
        assert_eq!(session.vote_count(0), Some(1));
        assert_eq!(session.vote_count(1), Some(0));
        assert!(session.has_voted(VoterId(1), 0));
    }

    #[test]
    fn test_cast_then_retract_restores_pre_vote_state() {
        let pristine = open_session(1);
        let mut session = pristine.clone();

        session.cast_vote(VoterId(1), 0).unwrap();
        session.retract_vote(VoterId(1), 0).unwrap();

        assert_eq!(session.ballots, pristine.ballots);
        assert_eq!(session.cast_order, pristine.cast_order);
        assert_eq!(session.votes_cast_by(VoterId(1)), 0);
    }

    #[test]
    fn test_retract_without_vote_rejected() {
        let mut session = open_session(1);
        assert_eq!(
            session.retract_vote(VoterId(1), 0),
            Err(VoteError::NoSuchVote)
        );
        // Out-of-range index is also "no such vote" on retraction.
        assert_eq!(
            session.retract_vote(VoterId(1), 9),
            Err(VoteError::NoSuchVote)
        );
    }

    #[test]
    fn test_closed_session_rejects_mutations() {
        let mut session = open_session(1);
        session.cast_vote(VoterId(1), 0).unwrap();
        assert!(session.close());

        assert_eq!(
            session.cast_vote(VoterId(2), 0),
            Err(VoteError::SessionClosed)
        );
        assert_eq!(
            session.retract_vote(VoterId(1), 0),
            Err(VoteError::SessionClosed)
        );
    }

    #[test]
    fn test_close_transition_happens_once() {
        let mut session = open_session(1);
        assert!(session.is_active());
        assert!(session.close());
        assert!(!session.close());
        assert!(!session.is_active());
    }

    #[test]
    fn test_results_stable_under_ties() {
        let candidates = vec![
            Record::synthetic("X", "Ana"),
            Record::synthetic("Y", "Bob"),
            Record::synthetic("Z", "Carol"),
        ];
        let mut session = VotingSession::new(candidates, 5, Duration::minutes(5)).unwrap();

        // X:2, Y:2, Z:1
        session.cast_vote(VoterId(1), 0).unwrap();
        session.cast_vote(VoterId(2), 0).unwrap();
        session.cast_vote(VoterId(1), 1).unwrap();
        session.cast_vote(VoterId(2), 1).unwrap();
        session.cast_vote(VoterId(1), 2).unwrap();

        let results = session.results();
        let ranked: Vec<_> = results
            .iter()
            .map(|t| (t.candidate.title.as_str(), t.votes))
            .collect();
        assert_eq!(ranked, vec![("X", 2), ("Y", 2), ("Z", 1)]);

        // winner() alone cannot disambiguate X vs Y.
        assert_eq!(session.winner().unwrap().candidate.title, "X");
        assert!(session.is_tied());
        let leaders: Vec<_> = session.leaders().iter().map(|r| r.title.clone()).collect();
        assert_eq!(leaders, vec!["X", "Y"]);
    }

    #[test]
    fn test_zero_votes_is_a_full_tie() {
        let session = open_session(1);
        assert_eq!(session.leaders().len(), 2);
        assert!(session.is_tied());
    }

    #[test]
    fn test_time_remaining_clamped_at_zero() {
        let session = open_session(1);
        assert!(session.time_remaining() > Duration::zero());
        assert!(session.time_remaining() <= Duration::minutes(5));
    }
}
