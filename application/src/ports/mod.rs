//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and consumer adapters
//! must implement.

pub mod document_store;
pub mod event_log;
pub mod results_publisher;

pub use document_store::{DocumentStore, DocumentStoreError};
pub use event_log::{ActivityEvent, EventLog, NoEventLog};
pub use results_publisher::{CloseCause, NoPublisher, ResultsPublisher, SessionOutcome};
