//! Title and proposer search over parsed records.
//!
//! Title search classifies every candidate into exactly one bucket, first
//! matching rule wins: exact (case-insensitive equality), substring
//! (case-insensitive containment), or fuzzy (normalized edit distance above
//! a threshold). The result is the concatenation exact + substring + fuzzy,
//! each bucket preserving candidate order. An empty result means "no
//! match", never an error.

use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Default fuzzy threshold on the 0-100 similarity scale.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 70.0;

/// Which records a search or pick considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Unresolved records only.
    Pending,
    /// Resolved records only.
    Resolved,
    /// Everything.
    All,
}

impl SearchScope {
    pub fn admits(&self, record: &Record) -> bool {
        match self {
            SearchScope::Pending => record.is_pending(),
            SearchScope::Resolved => record.resolved,
            SearchScope::All => true,
        }
    }
}

/// Matcher tuning. The threshold is a configurable default, not law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum similarity (exclusive) for the fuzzy bucket, 0-100.
    pub fuzzy_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

/// Normalized Levenshtein similarity on a 0-100 scale.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Search titles. Exact matches come first (input order preserved among
/// them), then substring matches, then fuzzy matches above the threshold.
/// No record appears twice.
pub fn find_by_title(records: &[Record], query: &str, config: &MatcherConfig) -> Vec<Record> {
    let query_lower = query.to_lowercase();

    let mut exact = Vec::new();
    let mut substring = Vec::new();
    let mut fuzzy = Vec::new();

    for record in records {
        let title_lower = record.title.to_lowercase();
        if title_lower == query_lower {
            exact.push(record.clone());
        } else if title_lower.contains(&query_lower) {
            substring.push(record.clone());
        } else if similarity(&query_lower, &title_lower) > config.fuzzy_threshold {
            fuzzy.push(record.clone());
        }
    }

    exact.extend(substring);
    exact.extend(fuzzy);
    exact
}

/// Case-insensitive substring search over the proposer field. No fuzzy step.
pub fn find_by_proposer(records: &[Record], query: &str) -> Vec<Record> {
    let query_lower = query.to_lowercase();
    records
        .iter()
        .filter(|r| r.proposer.to_lowercase().contains(&query_lower))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortlist(titles: &[&str]) -> Vec<Record> {
        titles.iter().map(|t| Record::synthetic(*t, "Ana")).collect()
    }

    #[test]
    fn test_exact_before_substring_and_no_stray_matches() {
        let records = shortlist(&["Dune", "Dune Part Two", "Dunkirk"]);
        let found = find_by_title(&records, "Dune", &MatcherConfig::default());

        let titles: Vec<_> = found.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Dune Part Two"]);
    }

    #[test]
    fn test_exact_matches_keep_input_order() {
        let records = vec![
            Record::synthetic("Heat", "Ana"),
            Record::synthetic("heat", "Bob"),
        ];
        let found = find_by_title(&records, "HEAT", &MatcherConfig::default());

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].proposer, "Ana");
        assert_eq!(found[1].proposer, "Bob");
    }

    #[test]
    fn test_fuzzy_catches_near_misses() {
        let records = shortlist(&["The Godfather"]);
        let found = find_by_title(&records, "The Godfathr", &MatcherConfig::default());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_fuzzy_threshold_is_configurable() {
        let records = shortlist(&["Dunkirk"]);
        let strict = MatcherConfig::default();
        assert!(find_by_title(&records, "Dune", &strict).is_empty());

        let loose = MatcherConfig {
            fuzzy_threshold: 30.0,
        };
        assert_eq!(find_by_title(&records, "Dune", &loose).len(), 1);
    }

    #[test]
    fn test_each_record_appears_once() {
        // "dune" is exact for the query, also a substring of itself; it must
        // land in exactly one bucket.
        let records = shortlist(&["Dune"]);
        let found = find_by_title(&records, "dune", &MatcherConfig::default());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let records = shortlist(&["Heat"]);
        assert!(find_by_title(&records, "Solaris", &MatcherConfig::default()).is_empty());
    }

    #[test]
    fn test_find_by_proposer_substring_case_insensitive() {
        let records = vec![
            Record::synthetic("Dune", "Ana Torres"),
            Record::synthetic("Heat", "Bob"),
            Record::synthetic("Solaris", "ana"),
        ];
        let found = find_by_proposer(&records, "ANA");

        let titles: Vec<_> = found.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Solaris"]);
    }

    #[test]
    fn test_scope_admits() {
        let mut record = Record::synthetic("Dune", "Ana");
        assert!(SearchScope::Pending.admits(&record));
        assert!(!SearchScope::Resolved.admits(&record));
        assert!(SearchScope::All.admits(&record));

        record.resolved = true;
        assert!(!SearchScope::Pending.admits(&record));
        assert!(SearchScope::Resolved.admits(&record));
    }
}
