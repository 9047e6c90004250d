//! Application layer for cinevote
//!
//! Use cases and ports. The catalog use case turns document snapshots into
//! shortlist operations; the vote coordinator runs time-boxed sessions with
//! a cancellable deadline timer. Adapters for the ports live in the
//! infrastructure layer and at the consumer edge.

pub mod ports;
pub mod use_cases;

pub use ports::{
    ActivityEvent, CloseCause, DocumentStore, DocumentStoreError, EventLog, NoEventLog,
    NoPublisher, ResultsPublisher, SessionOutcome,
};
pub use use_cases::{
    CatalogError, CatalogService, SearchBy, SessionHandle, SessionStatus, StartVoteError,
    VoteCoordinator, VoteToggle,
};
