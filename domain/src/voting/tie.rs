//! Tie resolution for voting sessions.
//!
//! When [`VotingSession::leaders`](super::VotingSession::leaders) returns
//! more than one candidate, the caller picks a resolution mode: a uniform
//! random choice, or a runoff session over exactly the tied set. A runoff
//! follows the full session lifecycle and may itself tie, in which case
//! resolution recurses.

use super::session::{SessionSpecError, VotingSession};
use crate::record::Record;
use chrono::Duration;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Fixed runoff deadline, shorter than a normal round.
pub const RUNOFF_MINUTES: i64 = 2;
/// Runoff quota: one vote per voter.
pub const RUNOFF_MAX_VOTES: usize = 1;

/// How to break a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreaker {
    /// Uniformly choose one of the tied leaders; terminal.
    Random,
    /// Run a fresh session over the tied leaders only.
    Runoff,
}

/// Result of tie resolution.
#[derive(Debug)]
pub enum TieOutcome {
    /// A single winner was chosen; no further state.
    Decided(Record),
    /// A new open runoff session over the tied leaders.
    Runoff(VotingSession),
}

/// Break a tie over the full top-count subset (at least two leaders).
pub fn break_tie(leaders: Vec<Record>, mode: TieBreaker) -> Result<TieOutcome, SessionSpecError> {
    if leaders.len() < 2 {
        return Err(SessionSpecError::CandidateCount(leaders.len()));
    }

    match mode {
        TieBreaker::Random => {
            let mut rng = rand::thread_rng();
            // len >= 2 checked above, choose cannot fail
            let winner = leaders
                .choose(&mut rng)
                .cloned()
                .ok_or(SessionSpecError::CandidateCount(0))?;
            Ok(TieOutcome::Decided(winner))
        }
        TieBreaker::Runoff => {
            let session = VotingSession::new(
                leaders,
                RUNOFF_MAX_VOTES,
                Duration::minutes(RUNOFF_MINUTES),
            )?;
            Ok(TieOutcome::Runoff(session))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting::VoterId;

    fn leaders() -> Vec<Record> {
        vec![
            Record::synthetic("X", "Ana"),
            Record::synthetic("Y", "Bob"),
        ]
    }

    #[test]
    fn test_random_mode_picks_a_leader() {
        let candidates = leaders();
        match break_tie(candidates.clone(), TieBreaker::Random).unwrap() {
            TieOutcome::Decided(winner) => {
                assert!(candidates.contains(&winner));
            }
            TieOutcome::Runoff(_) => panic!("random mode must be terminal"),
        }
    }

    #[test]
    fn test_runoff_session_shape() {
        match break_tie(leaders(), TieBreaker::Runoff).unwrap() {
            TieOutcome::Runoff(session) => {
                assert_eq!(session.candidates().len(), 2);
                assert_eq!(session.max_votes_per_user(), RUNOFF_MAX_VOTES);
                assert!(session.is_active());
            }
            TieOutcome::Decided(_) => panic!("runoff mode must return a session"),
        }
    }

    #[test]
    fn test_runoff_can_tie_again_and_recurse() {
        let TieOutcome::Runoff(mut runoff) = break_tie(leaders(), TieBreaker::Runoff).unwrap()
        else {
            panic!("expected runoff");
        };

        runoff.cast_vote(VoterId(1), 0).unwrap();
        runoff.cast_vote(VoterId(2), 1).unwrap();
        runoff.close();
        assert!(runoff.is_tied());

        // The tied runoff feeds straight back into resolution.
        let again = break_tie(runoff.leaders(), TieBreaker::Runoff).unwrap();
        assert!(matches!(again, TieOutcome::Runoff(_)));
    }

    #[test]
    fn test_fewer_than_two_leaders_rejected() {
        let single = vec![Record::synthetic("X", "Ana")];
        assert_eq!(
            break_tie(single, TieBreaker::Random).unwrap_err(),
            SessionSpecError::CandidateCount(1)
        );
    }
}
