//! Remote document adapter: wire protocol and HTTP client.

pub mod client;
pub mod protocol;

pub use client::{DEFAULT_BASE_URL, GdocsDocumentStore};
pub use protocol::{BatchUpdateRequest, WireDocument, into_snapshot};
