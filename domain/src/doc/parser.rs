//! Record extraction from a document snapshot.
//!
//! Parsing is a pure function of the snapshot and the [`ParseConfig`]: the
//! same inputs always yield the same record list. No state is kept between
//! calls and nothing is written back from here.
//!
//! The document has a human convention: active entries live at the top, and
//! an archive tail (old years, watched lists) is demarcated by a delimiter
//! line or a page/section break. Everything at or after the cutoff is
//! ignored.

use super::{Block, DocumentSnapshot};
use crate::record::{Record, TextRange, UNKNOWN_PROPOSER};
use serde::{Deserialize, Serialize};

/// Delimiter and separator configuration for the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Literal delimiter strings that mark the archive tail. A run whose
    /// trimmed text equals or contains one of these triggers the cutoff.
    pub delimiters: Vec<String>,
    /// Treat a line that is exactly a bare 4-digit year (e.g. "2023") as a
    /// delimiter too. Year headers only count as whole lines; substring
    /// matching would cut on titles like "Blade Runner 2049".
    pub year_delimiters: bool,
    /// Separator between title and proposer. Split on the LAST occurrence.
    pub separator: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            delimiters: vec!["-----".to_string(), "───".to_string(), "---".to_string()],
            year_delimiters: true,
            separator: " - ".to_string(),
        }
    }
}

impl ParseConfig {
    /// Whether a trimmed run's text triggers the cutoff: equality with or
    /// containment of a literal delimiter, or a bare year line.
    fn triggers_cutoff(&self, trimmed: &str) -> bool {
        self.delimiters
            .iter()
            .any(|d| trimmed == d || trimmed.contains(d.as_str()))
            || self.is_bare_year(trimmed)
    }

    /// Whether a full paragraph is nothing but a delimiter line and should
    /// be skipped rather than parsed as a record.
    fn is_pure_delimiter(&self, trimmed: &str) -> bool {
        self.delimiters.iter().any(|d| trimmed == d) || self.is_bare_year(trimmed)
    }

    fn is_bare_year(&self, trimmed: &str) -> bool {
        self.year_delimiters
            && trimmed.len() == 4
            && trimmed.chars().all(|c| c.is_ascii_digit())
    }
}

/// Find the block index where active content ends, if any.
///
/// Single forward scan. A delimiter hit returns its block index immediately
/// and wins over every break marker, including ones seen earlier. Break
/// markers (section breaks, in-paragraph page breaks) only matter when no
/// delimiter is ever hit, and then the LAST one seen is the cutoff. The
/// first-match/last-match asymmetry is observed shortlist behavior, kept
/// as is.
///
/// A cutoff of `Some(0)` truncates the whole document.
pub fn find_cutoff(blocks: &[Block], config: &ParseConfig) -> Option<usize> {
    let mut last_break = None;

    for (i, block) in blocks.iter().enumerate() {
        match block {
            Block::SectionBreak => {
                last_break = Some(i);
            }
            Block::Paragraph(paragraph) => {
                if paragraph.has_page_break() {
                    last_break = Some(i);
                }
                for run in paragraph.text_runs() {
                    if config.triggers_cutoff(run.content.trim()) {
                        return Some(i);
                    }
                }
            }
        }
    }

    last_break
}

/// Parse the snapshot into records, in document order.
///
/// Per paragraph: run contents are concatenated, the strike style is a
/// union over runs (any struck run marks the whole record resolved), and
/// the range spans the minimum start to the maximum end offset over runs
/// with non-empty content. Paragraphs that are empty, pure delimiter
/// lines, or yield an empty title are silently skipped.
pub fn parse_records(snapshot: &DocumentSnapshot, config: &ParseConfig) -> Vec<Record> {
    let blocks = match find_cutoff(&snapshot.blocks, config) {
        Some(cutoff) => &snapshot.blocks[..cutoff],
        None => &snapshot.blocks[..],
    };

    let mut records = Vec::new();

    for block in blocks {
        let Block::Paragraph(paragraph) = block else {
            continue;
        };

        let mut text = String::new();
        let mut struck = false;
        let mut start: Option<usize> = None;
        let mut end: Option<usize> = None;

        for run in paragraph.text_runs() {
            if run.struck {
                struck = true;
            }
            if !run.content.is_empty() {
                start = Some(start.map_or(run.start_offset, |s| s.min(run.start_offset)));
                end = Some(end.map_or(run.end_offset, |e| e.max(run.end_offset)));
            }
            text.push_str(&run.content);
        }

        let trimmed = text.trim();
        if trimmed.is_empty() || config.is_pure_delimiter(trimmed) {
            continue;
        }

        let range = match (start, end) {
            (Some(start), Some(end)) => TextRange::new(start, end).ok(),
            _ => None,
        };

        if let Some(record) = parse_line(trimmed, struck, range, config) {
            records.push(record);
        }
    }

    records
}

/// Split one shortlist line into title and proposer.
///
/// The separator splits on its last occurrence, so "A - B - C" is the title
/// "A - B" proposed by "C". Without a separator the whole line is the title
/// and the proposer is [`UNKNOWN_PROPOSER`]. An empty title yields no record.
fn parse_line(
    trimmed: &str,
    resolved: bool,
    range: Option<TextRange>,
    config: &ParseConfig,
) -> Option<Record> {
    let (title, proposer) = match trimmed.rsplit_once(config.separator.as_str()) {
        Some((title, proposer)) => (title.trim(), proposer.trim()),
        None => (trimmed, UNKNOWN_PROPOSER),
    };

    if title.is_empty() {
        return None;
    }

    Some(Record::new(title, proposer, resolved, range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Element, Paragraph, TextRun};

    fn snapshot(blocks: Vec<Block>) -> DocumentSnapshot {
        DocumentSnapshot::new(blocks)
    }

    #[test]
    fn test_parse_is_deterministic() {
        let doc = snapshot(vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::line("Heat - Bob\n", 12, 23),
        ]);
        let config = ParseConfig::default();

        let first = parse_records(&doc, &config);
        let second = parse_records(&doc, &config);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_basic_line_split() {
        let doc = snapshot(vec![Block::line("Dune - Ana\n", 1, 12)]);
        let records = parse_records(&doc, &ParseConfig::default());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Dune");
        assert_eq!(records[0].proposer, "Ana");
        assert!(records[0].is_pending());
        assert_eq!(records[0].range, Some(TextRange { start: 1, end: 12 }));
    }

    #[test]
    fn test_split_on_last_separator() {
        let doc = snapshot(vec![Block::line("A - B - C\n", 0, 10)]);
        let records = parse_records(&doc, &ParseConfig::default());

        assert_eq!(records[0].title, "A - B");
        assert_eq!(records[0].proposer, "C");
    }

    #[test]
    fn test_missing_separator_yields_unknown_proposer() {
        let doc = snapshot(vec![Block::line("Stalker\n", 0, 8)]);
        let records = parse_records(&doc, &ParseConfig::default());

        assert_eq!(records[0].title, "Stalker");
        assert_eq!(records[0].proposer, UNKNOWN_PROPOSER);
    }

    #[test]
    fn test_empty_title_is_discarded() {
        let doc = snapshot(vec![Block::line(" - Ana\n", 0, 7)]);
        let records = parse_records(&doc, &ParseConfig::default());
        assert!(records.is_empty());
    }

    #[test]
    fn test_blank_and_delimiter_paragraphs_are_skipped() {
        // "---" here is also a cutoff trigger, so use it as the final block:
        // nothing after it would survive anyway, and nothing before it is a
        // delimiter line.
        let doc = snapshot(vec![
            Block::line("\n", 0, 1),
            Block::line("Dune - Ana\n", 1, 12),
            Block::line("---\n", 12, 16),
        ]);
        let records = parse_records(&doc, &ParseConfig::default());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Dune");
    }

    #[test]
    fn test_strike_union_across_runs() {
        let paragraph = Paragraph::from_runs(vec![
            TextRun::new("Dune ", 1, 6),
            TextRun::new("- ", 6, 8).struck(),
            TextRun::new("Ana\n", 8, 12),
        ]);
        let doc = snapshot(vec![Block::Paragraph(paragraph)]);
        let records = parse_records(&doc, &ParseConfig::default());

        assert_eq!(records.len(), 1);
        assert!(records[0].resolved);
    }

    #[test]
    fn test_range_spans_min_start_to_max_end_of_nonempty_runs() {
        let paragraph = Paragraph::from_runs(vec![
            TextRun::new("", 0, 0),
            TextRun::new("Dune", 5, 9),
            TextRun::new(" - Ana\n", 9, 16),
        ]);
        let doc = snapshot(vec![Block::Paragraph(paragraph)]);
        let records = parse_records(&doc, &ParseConfig::default());

        assert_eq!(records[0].range, Some(TextRange { start: 5, end: 16 }));
    }

    #[test]
    fn test_delimiter_cutoff_stops_extraction() {
        let doc = snapshot(vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::line("-----\n", 12, 18),
            Block::line("Old Pick - Carol\n", 18, 35),
        ]);
        let records = parse_records(&doc, &ParseConfig::default());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Dune");
    }

    #[test]
    fn test_delimiter_as_substring_still_cuts() {
        let doc = snapshot(vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::line("Archive ----- 2022\n", 12, 31),
            Block::line("Old Pick - Carol\n", 31, 48),
        ]);
        let records = parse_records(&doc, &ParseConfig::default());

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_delimiter_before_break_wins() {
        // Delimiter in block 1, section break later: cutoff is the
        // delimiter block, nothing at or after it parses.
        let blocks = vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::line("-----\n", 12, 18),
            Block::SectionBreak,
            Block::line("Old Pick - Carol\n", 18, 35),
        ];
        assert_eq!(find_cutoff(&blocks, &ParseConfig::default()), Some(1));

        let records = parse_records(&snapshot(blocks), &ParseConfig::default());
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_delimiter_after_break_overrides_it() {
        // The break is earlier, but the delimiter still decides the cutoff.
        let blocks = vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::SectionBreak,
            Block::line("Heat - Bob\n", 12, 23),
            Block::line("-----\n", 23, 29),
        ];
        assert_eq!(find_cutoff(&blocks, &ParseConfig::default()), Some(3));
    }

    #[test]
    fn test_break_fallback_uses_last_break() {
        let blocks = vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::SectionBreak,
            Block::line("Heat - Bob\n", 12, 23),
            Block::SectionBreak,
            Block::line("Old Pick - Carol\n", 23, 40),
        ];
        assert_eq!(find_cutoff(&blocks, &ParseConfig::default()), Some(3));

        let records = parse_records(&snapshot(blocks), &ParseConfig::default());
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Heat"]);
    }

    #[test]
    fn test_page_break_inside_paragraph_counts_as_break() {
        let blocks = vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::Paragraph(Paragraph::new(vec![Element::PageBreak])),
            Block::line("Old Pick - Carol\n", 12, 29),
        ];
        assert_eq!(find_cutoff(&blocks, &ParseConfig::default()), Some(1));
    }

    #[test]
    fn test_cutoff_at_block_zero_truncates_everything() {
        let blocks = vec![
            Block::line("-----\n", 0, 6),
            Block::line("Old Pick - Carol\n", 6, 23),
        ];
        assert_eq!(find_cutoff(&blocks, &ParseConfig::default()), Some(0));

        let records = parse_records(&snapshot(blocks), &ParseConfig::default());
        assert!(records.is_empty());
    }

    #[test]
    fn test_no_cutoff_processes_whole_document() {
        let blocks = vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::line("Heat - Bob\n", 12, 23),
        ];
        assert_eq!(find_cutoff(&blocks, &ParseConfig::default()), None);
        assert_eq!(parse_records(&snapshot(blocks), &ParseConfig::default()).len(), 2);
    }

    #[test]
    fn test_bare_year_line_is_a_delimiter() {
        let doc = snapshot(vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::line("2023\n", 12, 17),
            Block::line("Old Pick - Carol\n", 17, 34),
        ]);
        let records = parse_records(&doc, &ParseConfig::default());
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_year_inside_title_does_not_cut() {
        let doc = snapshot(vec![
            Block::line("Blade Runner 2049 - Bob\n", 1, 25),
            Block::line("Heat - Ana\n", 25, 36),
        ]);
        let records = parse_records(&doc, &ParseConfig::default());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Blade Runner 2049");
    }

    #[test]
    fn test_year_delimiters_can_be_disabled() {
        let config = ParseConfig {
            year_delimiters: false,
            ..ParseConfig::default()
        };
        let doc = snapshot(vec![
            Block::line("Dune - Ana\n", 1, 12),
            Block::line("2023\n", 12, 17),
            Block::line("Old Pick - Carol\n", 17, 34),
        ]);
        let records = parse_records(&doc, &config);

        // "2023" now parses as a record with an unknown proposer.
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].title, "2023");
    }
}
