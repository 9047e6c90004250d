//! The parsed shortlist record.
//!
//! A [`Record`] is one entry of the shared movie shortlist: a title, the
//! person who proposed it, whether it has been watched (struck through in
//! the source document), and the text range to restyle when resolving it.
//!
//! Records are plain values recreated on every parse. Resolving one mutates
//! the *document*; the next parse reflects the new state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Proposer used when a line carries no separator.
pub const UNKNOWN_PROPOSER: &str = "Unknown";

/// Record-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// Resolve was attempted on a record that has no addressable range
    /// (synthetic records are never written back).
    #[error("record has no text range to write back")]
    MissingRange,

    #[error("invalid text range: start {start} is past end {end}")]
    InvalidRange { start: usize, end: usize },
}

/// Absolute `[start, end)` offsets into the snapshot's text coordinate space.
///
/// Valid only until the next document mutation. Callers must re-fetch and
/// re-parse before reusing a range after any write (stale-offset hazard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Create a range, rejecting inverted offsets.
    pub fn new(start: usize, end: usize) -> Result<Self, RecordError> {
        if start > end {
            return Err(RecordError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One entry of the shortlist.
///
/// # Example
///
/// ```
/// use cinevote_domain::record::Record;
///
/// let record = Record::synthetic("Dune", "Ana");
/// assert!(record.is_pending());
/// assert_eq!(record.to_string(), "Dune - Ana");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub proposer: String,
    /// True once the entry is struck through in the source document.
    pub resolved: bool,
    /// Addressable range of the source text. `None` only for synthetic
    /// records that are never written back.
    pub range: Option<TextRange>,
}

impl Record {
    pub fn new(
        title: impl Into<String>,
        proposer: impl Into<String>,
        resolved: bool,
        range: Option<TextRange>,
    ) -> Self {
        Self {
            title: title.into(),
            proposer: proposer.into(),
            resolved,
            range,
        }
    }

    /// Create a record with no document range (test fixtures, ad-hoc lists).
    pub fn synthetic(title: impl Into<String>, proposer: impl Into<String>) -> Self {
        Self::new(title, proposer, false, None)
    }

    /// Not yet watched.
    pub fn is_pending(&self) -> bool {
        !self.resolved
    }

    /// The range to restyle, or [`RecordError::MissingRange`].
    pub fn range_for_write(&self) -> Result<TextRange, RecordError> {
        self.range.ok_or(RecordError::MissingRange)
    }

    /// Render for listings: resolved entries get a strike marker.
    pub fn display_line(&self) -> String {
        if self.resolved {
            format!("~~{}~~ - {}", self.title, self.proposer)
        } else {
            format!("{} - {}", self.title, self.proposer)
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.title, self.proposer)
    }
}
