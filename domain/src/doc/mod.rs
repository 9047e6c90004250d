//! Structured document model.
//!
//! A [`DocumentSnapshot`] is an ordered sequence of block elements as fetched
//! from the remote document. Block kinds are a tagged enum and consumers
//! switch on the tag explicitly; there is no attribute probing.
//!
//! Offsets on [`TextRun`] are absolute character positions in the snapshot's
//! coordinate space. They stay valid only until the next document mutation.

pub mod parser;

use serde::{Deserialize, Serialize};

/// A contiguous run of styled text inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// Raw text content, including any trailing newline the source kept.
    pub content: String,
    /// Whether the strikethrough style is set on this run.
    #[serde(default)]
    pub struck: bool,
    /// Absolute start offset of this run in the snapshot.
    pub start_offset: usize,
    /// Absolute end offset (exclusive) of this run in the snapshot.
    pub end_offset: usize,
}

impl TextRun {
    pub fn new(content: impl Into<String>, start_offset: usize, end_offset: usize) -> Self {
        Self {
            content: content.into(),
            struck: false,
            start_offset,
            end_offset,
        }
    }

    /// Mark this run as struck through.
    pub fn struck(mut self) -> Self {
        self.struck = true;
        self
    }
}

/// An element inside a paragraph: either a page break marker or a text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    PageBreak,
    TextRun(TextRun),
}

/// A paragraph block: an ordered sequence of elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub elements: Vec<Element>,
}

impl Paragraph {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Build a paragraph from text runs only.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        Self {
            elements: runs.into_iter().map(Element::TextRun).collect(),
        }
    }

    /// Iterate over the text runs, skipping page breaks.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            Element::TextRun(run) => Some(run),
            Element::PageBreak => None,
        })
    }

    /// Whether any element in this paragraph is a page break.
    pub fn has_page_break(&self) -> bool {
        self.elements.iter().any(|e| matches!(e, Element::PageBreak))
    }
}

/// A top-level block: a section/page boundary or a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    SectionBreak,
    Paragraph(Paragraph),
}

impl Block {
    /// Convenience constructor for a single-run paragraph.
    pub fn line(content: impl Into<String>, start_offset: usize, end_offset: usize) -> Self {
        Block::Paragraph(Paragraph::from_runs(vec![TextRun::new(
            content,
            start_offset,
            end_offset,
        )]))
    }
}

/// An immutable snapshot of the remote document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Document title, when the source exposes one.
    pub title: Option<String>,
    /// Ordered block content.
    pub blocks: Vec<Block>,
}

impl DocumentSnapshot {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            title: None,
            blocks,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_runs_skip_page_breaks() {
        let paragraph = Paragraph::new(vec![
            Element::TextRun(TextRun::new("a", 0, 1)),
            Element::PageBreak,
            Element::TextRun(TextRun::new("b", 1, 2)),
        ]);

        let contents: Vec<_> = paragraph.text_runs().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b"]);
        assert!(paragraph.has_page_break());
    }

    #[test]
    fn test_block_serde_tagging() {
        let block = Block::line("Dune - Ana\n", 10, 21);
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"kind\":\"paragraph\""));

        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);

        let brk: Block = serde_json::from_str(r#"{"kind":"section_break"}"#).unwrap();
        assert_eq!(brk, Block::SectionBreak);
    }

    #[test]
    fn test_struck_defaults_to_false_in_serde() {
        let run: TextRun = serde_json::from_str(
            r#"{"content":"x","start_offset":0,"end_offset":1}"#,
        )
        .unwrap();
        assert!(!run.struck);
    }
}
