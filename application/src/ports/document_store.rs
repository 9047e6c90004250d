//! Document store port
//!
//! Defines the interface for fetching and mutating the remote shortlist
//! document. The core never talks to a wire directly; adapters live in the
//! infrastructure layer.

use async_trait::async_trait;
use cinevote_domain::{DocumentSnapshot, TextRange};
use thiserror::Error;

/// Errors that can occur against the document collaborator
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Collaborator unreachable. Surfaced to the caller; the core does not
    /// retry.
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// The remote document, reduced to exactly two operations.
///
/// `fetch` returns an immutable snapshot; `apply_strike` submits one
/// range-scoped strikethrough mutation as a single atomic batch. There is
/// no atomicity across a fetch-then-strike pair: any write invalidates
/// previously fetched offsets, so callers re-fetch and re-parse before
/// mutating again.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the current document snapshot.
    async fn fetch(&self) -> Result<DocumentSnapshot, DocumentStoreError>;

    /// Set the strikethrough style over `[range.start, range.end)`.
    async fn apply_strike(&self, range: TextRange) -> Result<(), DocumentStoreError>;
}
