//! Infrastructure layer for cinevote
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gdocs;
pub mod logging;
pub mod memory;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileDocumentConfig, FileListConfig, FileMatcherConfig,
    FileVotingConfig,
};
pub use gdocs::GdocsDocumentStore;
pub use logging::JsonlEventLogger;
pub use memory::InMemoryDocumentStore;
