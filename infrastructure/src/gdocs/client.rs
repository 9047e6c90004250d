//! HTTP adapter for the [`DocumentStore`] port.
//!
//! Talks to the hosted document API over REST: `GET documents/{id}` for
//! snapshots and `POST documents/{id}:batchUpdate` for strike mutations.
//! Authenticates with a bearer token on every request.

use super::protocol::{BatchUpdateRequest, WireDocument, into_snapshot};
use async_trait::async_trait;
use cinevote_application::ports::{DocumentStore, DocumentStoreError};
use cinevote_domain::{DocumentSnapshot, TextRange};
use tracing::{debug, instrument};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://docs.googleapis.com/v1";

/// Remote document client backed by `reqwest`.
pub struct GdocsDocumentStore {
    client: reqwest::Client,
    base_url: String,
    doc_id: String,
    api_token: String,
}

impl GdocsDocumentStore {
    pub fn new(doc_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            doc_id: doc_id.into(),
            api_token: api_token.into(),
        }
    }

    /// Override the API base URL (for tests and self-hosted mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn document_url(&self) -> String {
        format!("{}/documents/{}", self.base_url, self.doc_id)
    }

    fn batch_update_url(&self) -> String {
        format!("{}/documents/{}:batchUpdate", self.base_url, self.doc_id)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DocumentStoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DocumentStoreError::RequestFailed(format!(
            "HTTP {}: {}",
            status.as_u16(),
            body
        )))
    }
}

#[async_trait]
impl DocumentStore for GdocsDocumentStore {
    #[instrument(skip(self), fields(doc_id = %self.doc_id))]
    async fn fetch(&self) -> Result<DocumentSnapshot, DocumentStoreError> {
        let response = self
            .client
            .get(self.document_url())
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| DocumentStoreError::Connection(e.to_string()))?;

        let document: WireDocument = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DocumentStoreError::RequestFailed(format!("Malformed body: {}", e)))?;

        let snapshot = into_snapshot(document);
        debug!(blocks = snapshot.blocks.len(), "Fetched document snapshot");
        Ok(snapshot)
    }

    #[instrument(skip(self), fields(doc_id = %self.doc_id))]
    async fn apply_strike(&self, range: TextRange) -> Result<(), DocumentStoreError> {
        let payload = BatchUpdateRequest::strike(range.start, range.end);

        let response = self
            .client
            .post(self.batch_update_url())
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DocumentStoreError::Connection(e.to_string()))?;

        Self::check_status(response).await?;
        debug!(start = range.start, end = range.end, "Applied strike");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_include_doc_id() {
        let store = GdocsDocumentStore::new("doc-123", "token")
            .with_base_url("http://localhost:9999/v1");
        assert_eq!(store.document_url(), "http://localhost:9999/v1/documents/doc-123");
        assert_eq!(
            store.batch_update_url(),
            "http://localhost:9999/v1/documents/doc-123:batchUpdate"
        );
    }
}
