//! Catalog use case
//!
//! Shortlist operations against the document store: listing, random pick,
//! search, candidate drawing for votes, and resolving (striking) a record.
//!
//! Every operation fetches a fresh snapshot and re-parses; records are
//! never cached across calls, so offsets handed out here are as current as
//! the last fetch. Callers that mutate must still treat any held record as
//! stale afterwards.

use crate::ports::document_store::{DocumentStore, DocumentStoreError};
use crate::ports::event_log::{ActivityEvent, EventLog, NoEventLog};
use cinevote_domain::record::RecordError;
use cinevote_domain::{
    MatcherConfig, ParseConfig, Record, SearchScope, find_by_proposer, find_by_title,
    parse_records, util,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Document store error: {0}")]
    Store(#[from] DocumentStoreError),

    #[error(transparent)]
    InvalidRecord(#[from] RecordError),

    #[error("not enough pending records: have {available}, requested {requested}")]
    NotEnoughPending { available: usize, requested: usize },
}

/// Which field a search query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBy {
    Title,
    Proposer,
}

/// Use case for shortlist operations.
pub struct CatalogService<S: DocumentStore> {
    store: Arc<S>,
    parse_config: ParseConfig,
    matcher_config: MatcherConfig,
    event_log: Arc<dyn EventLog>,
}

impl<S: DocumentStore> CatalogService<S> {
    pub fn new(store: Arc<S>, parse_config: ParseConfig, matcher_config: MatcherConfig) -> Self {
        Self {
            store,
            parse_config,
            matcher_config,
            event_log: Arc::new(NoEventLog),
        }
    }

    pub fn with_event_log(mut self, event_log: Arc<dyn EventLog>) -> Self {
        self.event_log = event_log;
        self
    }

    /// Fetch and parse the current shortlist.
    async fn records(&self) -> Result<Vec<Record>, CatalogError> {
        let snapshot = self.store.fetch().await?;
        let records = parse_records(&snapshot, &self.parse_config);
        debug!("Parsed {} records from snapshot", records.len());
        Ok(records)
    }

    /// All records admitted by the scope, in document order.
    pub async fn list(&self, scope: SearchScope) -> Result<Vec<Record>, CatalogError> {
        let records = self.records().await?;
        Ok(records.into_iter().filter(|r| scope.admits(r)).collect())
    }

    /// Uniformly pick one record in scope, optionally restricted to a
    /// proposer (case-insensitive substring). `None` when nothing matches.
    pub async fn random_pick(
        &self,
        scope: SearchScope,
        proposer: Option<&str>,
    ) -> Result<Option<Record>, CatalogError> {
        let records = self.records().await?;
        let candidates: Vec<Record> = match proposer {
            Some(query) => find_by_proposer(&records, query)
                .into_iter()
                .filter(|r| scope.admits(r))
                .collect(),
            None => records.into_iter().filter(|r| scope.admits(r)).collect(),
        };
        Ok(util::choose_uniform(&candidates))
    }

    /// Search the shortlist. Title search uses the exact/substring/fuzzy
    /// buckets; proposer search is substring only.
    pub async fn search(
        &self,
        query: &str,
        by: SearchBy,
        scope: SearchScope,
    ) -> Result<Vec<Record>, CatalogError> {
        let records = self.records().await?;
        let in_scope: Vec<Record> = records.into_iter().filter(|r| scope.admits(r)).collect();

        Ok(match by {
            SearchBy::Title => find_by_title(&in_scope, query, &self.matcher_config),
            SearchBy::Proposer => find_by_proposer(&in_scope, query),
        })
    }

    /// Draw `count` distinct pending records at random, for a voting round.
    pub async fn draw_candidates(&self, count: usize) -> Result<Vec<Record>, CatalogError> {
        let pending = self.list(SearchScope::Pending).await?;
        if pending.len() < count {
            return Err(CatalogError::NotEnoughPending {
                available: pending.len(),
                requested: count,
            });
        }
        Ok(util::sample_uniform(&pending, count))
    }

    /// Mark a record as watched by striking its range in the document.
    ///
    /// The record must carry a range, and the range must come from a parse
    /// of the document's current state: resolving with stale offsets
    /// corrupts unrelated content. Serialize resolves against re-parses.
    pub async fn resolve(&self, record: &Record) -> Result<(), CatalogError> {
        let range = record.range_for_write()?;
        self.store.apply_strike(range).await?;

        info!("Resolved '{}' ({} - {})", record.title, range.start, range.end);
        self.event_log.log(ActivityEvent::new(
            "record_resolved",
            serde_json::json!({
                "title": record.title,
                "proposer": record.proposer,
                "start": range.start,
                "end": range.end,
            }),
        ));
        Ok(())
    }
}
