//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain config types
//! where appropriate.

use cinevote_domain::{MatcherConfig, ParseConfig};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Remote document and parsing settings
    pub document: FileDocumentConfig,
    /// Title search settings
    pub matcher: FileMatcherConfig,
    /// Voting round defaults
    pub voting: FileVotingConfig,
    /// Listing settings
    pub list: FileListConfig,
}

/// `[document]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDocumentConfig {
    /// Remote document identifier.
    pub doc_id: String,
    /// Bearer token for the document API. Usually supplied via the
    /// CINEVOTE_DOCUMENT_API_TOKEN environment variable, not the file.
    pub api_token: String,
    /// Literal delimiter strings marking the archive tail.
    pub delimiters: Vec<String>,
    /// Treat bare 4-digit year lines as delimiters.
    pub year_delimiters: bool,
    /// Title/proposer separator (split on last occurrence).
    pub separator: String,
}

impl Default for FileDocumentConfig {
    fn default() -> Self {
        let parse = ParseConfig::default();
        Self {
            doc_id: String::new(),
            api_token: String::new(),
            delimiters: parse.delimiters,
            year_delimiters: parse.year_delimiters,
            separator: parse.separator,
        }
    }
}

impl FileDocumentConfig {
    /// Convert into the domain parser configuration.
    pub fn to_parse_config(&self) -> ParseConfig {
        ParseConfig {
            delimiters: self.delimiters.clone(),
            year_delimiters: self.year_delimiters,
            separator: self.separator.clone(),
        }
    }
}

/// `[matcher]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMatcherConfig {
    /// Fuzzy similarity threshold, 0-100.
    pub fuzzy_threshold: f64,
}

impl Default for FileMatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: cinevote_domain::DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl FileMatcherConfig {
    pub fn to_matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            fuzzy_threshold: self.fuzzy_threshold,
        }
    }
}

/// `[voting]` section. These are round defaults; the hard bounds
/// (2-10 candidates, 1-5 votes, 1-60 minutes) live in the domain and are
/// enforced at session creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    pub default_candidates: usize,
    pub default_max_votes: usize,
    pub default_minutes: i64,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        Self {
            default_candidates: 3,
            default_max_votes: 1,
            default_minutes: 5,
        }
    }
}

/// `[list]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileListConfig {
    /// Records per page in listings.
    pub page_size: usize,
}

impl Default for FileListConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.document.to_parse_config(), ParseConfig::default());
        assert_eq!(config.matcher.fuzzy_threshold, 70.0);
        assert_eq!(config.voting.default_minutes, 5);
        assert_eq!(config.list.page_size, 10);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [document]
            doc_id = "abc123"
            separator = " :: "

            [matcher]
            fuzzy_threshold = 85.0
            "#,
        )
        .unwrap();

        assert_eq!(config.document.doc_id, "abc123");
        assert_eq!(config.document.separator, " :: ");
        // Untouched fields keep defaults.
        assert!(config.document.year_delimiters);
        assert_eq!(config.matcher.fuzzy_threshold, 85.0);
        assert_eq!(config.voting, FileVotingConfig::default());
    }
}
