//! Configuration loading and file formats

pub mod file_config;
pub mod loader;

pub use file_config::{
    FileConfig, FileDocumentConfig, FileListConfig, FileMatcherConfig, FileVotingConfig,
};
pub use loader::ConfigLoader;
