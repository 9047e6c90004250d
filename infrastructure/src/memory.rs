//! In-memory document store.
//!
//! Holds one [`DocumentSnapshot`] behind a lock and applies strikes by
//! flipping the style flag on overlapping runs. Used for offline snapshot
//! mode and as a fake in tests.

use async_trait::async_trait;
use cinevote_application::ports::{DocumentStore, DocumentStoreError};
use cinevote_domain::{Block, DocumentSnapshot, Element, TextRange};
use std::sync::Mutex;

pub struct InMemoryDocumentStore {
    snapshot: Mutex<DocumentSnapshot>,
}

impl InMemoryDocumentStore {
    pub fn new(snapshot: DocumentSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    /// Current snapshot contents, struck flags included.
    pub fn current(&self) -> DocumentSnapshot {
        self.snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch(&self) -> Result<DocumentSnapshot, DocumentStoreError> {
        Ok(self.current())
    }

    async fn apply_strike(&self, range: TextRange) -> Result<(), DocumentStoreError> {
        let mut snapshot = self
            .snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        for block in &mut snapshot.blocks {
            let Block::Paragraph(paragraph) = block else {
                continue;
            };
            for element in &mut paragraph.elements {
                let Element::TextRun(run) = element else {
                    continue;
                };
                // Half-open overlap test against [range.start, range.end).
                if run.start_offset < range.end && range.start < run.end_offset {
                    run.struck = true;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryDocumentStore {
        InMemoryDocumentStore::new(DocumentSnapshot::new(vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::line("Heat - Ben\n", 12, 23),
        ]))
    }

    #[tokio::test]
    async fn test_strike_marks_overlapping_runs_only() {
        let store = store();
        store
            .apply_strike(TextRange::new(1, 12).unwrap())
            .await
            .unwrap();

        let snapshot = store.fetch().await.unwrap();
        let struck: Vec<bool> = snapshot
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => p.text_runs().next().map(|r| r.struck),
                Block::SectionBreak => None,
            })
            .collect();
        assert_eq!(struck, vec![true, false]);
    }

    #[tokio::test]
    async fn test_strike_outside_all_runs_is_noop() {
        let store = store();
        store
            .apply_strike(TextRange::new(100, 110).unwrap())
            .await
            .unwrap();

        let snapshot = store.fetch().await.unwrap();
        assert_eq!(snapshot, store.current());
        for block in &snapshot.blocks {
            if let Block::Paragraph(p) = block {
                assert!(p.text_runs().all(|r| !r.struck));
            }
        }
    }
}
