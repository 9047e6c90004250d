//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod catalog;
pub mod run_vote;

pub use catalog::{CatalogError, CatalogService, SearchBy};
pub use run_vote::{
    SessionHandle, SessionStatus, StartVoteError, VoteCoordinator, VoteToggle,
};
