//! Voting sessions and tie resolution.

pub mod session;
pub mod tie;

pub use session::{
    CANDIDATE_BOUNDS, DURATION_MINUTE_BOUNDS, QUOTA_BOUNDS, SessionSpecError, Tally, VoteError,
    VoterId, VotingSession,
};
pub use tie::{RUNOFF_MAX_VOTES, RUNOFF_MINUTES, TieBreaker, TieOutcome, break_tie};
