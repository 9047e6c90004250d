//! Domain layer for cinevote
//!
//! This crate contains the core business logic: the structured document
//! model and record parser, title/proposer matching, and the voting session
//! state machine with tie resolution. It has no dependencies on
//! infrastructure or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Shortlist
//!
//! The shared shortlist lives in a remote rich-text document. Parsing turns
//! a [`doc::DocumentSnapshot`] into an ordered list of [`record::Record`]s;
//! resolving a record strikes it through in the document, never in memory.
//!
//! ## Voting
//!
//! A [`voting::VotingSession`] is a time-boxed round over a fixed candidate
//! set with per-user quotas. Ranking is stable; ties are resolved by the
//! caller via [`voting::break_tie`].

pub mod doc;
pub mod matcher;
pub mod record;
pub mod util;
pub mod voting;

// Re-export commonly used types
pub use doc::{
    Block, DocumentSnapshot, Element, Paragraph, TextRun,
    parser::{ParseConfig, find_cutoff, parse_records},
};
pub use matcher::{
    DEFAULT_FUZZY_THRESHOLD, MatcherConfig, SearchScope, find_by_proposer, find_by_title,
};
pub use record::{Record, RecordError, TextRange, UNKNOWN_PROPOSER};
pub use voting::{
    SessionSpecError, Tally, TieBreaker, TieOutcome, VoteError, VoterId, VotingSession, break_tie,
};
