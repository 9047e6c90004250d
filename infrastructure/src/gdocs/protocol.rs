//! Wire types for the remote document API.
//!
//! The document endpoint returns a deeply nested JSON tree in camelCase.
//! These structs mirror the wire shape exactly; [`into_snapshot`] converts
//! a fetched [`WireDocument`] into the flat domain [`DocumentSnapshot`],
//! dropping everything the shortlist does not care about (styling beyond
//! strikethrough, tables, footnotes).
//!
//! Offsets on the wire are absolute character indices into the document and
//! are carried through unchanged so strike requests can target them later.

use cinevote_domain::{Block, DocumentSnapshot, Element, Paragraph, TextRun};
use serde::{Deserialize, Serialize};

/// Top-level document response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: WireBody,
}

/// Document body: an ordered list of structural elements.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBody {
    #[serde(default)]
    pub content: Vec<WireStructuralElement>,
}

/// A top-level structural element. Exactly one of the payload fields is set;
/// unknown kinds (tables, tables of contents) leave both empty and are
/// skipped during conversion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStructuralElement {
    #[serde(default)]
    pub section_break: Option<serde_json::Value>,
    #[serde(default)]
    pub paragraph: Option<WireParagraph>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireParagraph {
    #[serde(default)]
    pub elements: Vec<WireParagraphElement>,
}

/// An element inside a paragraph. `start_index`/`end_index` are absolute
/// offsets in the document's coordinate space.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireParagraphElement {
    #[serde(default)]
    pub start_index: usize,
    #[serde(default)]
    pub end_index: usize,
    #[serde(default)]
    pub text_run: Option<WireTextRun>,
    #[serde(default)]
    pub page_break: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTextRun {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub text_style: WireTextStyle,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTextStyle {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strikethrough: bool,
}

/// Convert a wire document into the domain snapshot.
///
/// Structural elements that are neither a section break nor a paragraph are
/// dropped. Paragraph elements with no recognized payload are dropped too.
pub fn into_snapshot(document: WireDocument) -> DocumentSnapshot {
    let blocks = document
        .body
        .content
        .into_iter()
        .filter_map(|element| {
            if element.section_break.is_some() {
                Some(Block::SectionBreak)
            } else {
                element.paragraph.map(|p| Block::Paragraph(into_paragraph(p)))
            }
        })
        .collect();

    let snapshot = DocumentSnapshot::new(blocks);
    match document.title {
        Some(title) => snapshot.with_title(title),
        None => snapshot,
    }
}

fn into_paragraph(paragraph: WireParagraph) -> Paragraph {
    let elements = paragraph
        .elements
        .into_iter()
        .filter_map(|element| {
            if element.page_break.is_some() {
                Some(Element::PageBreak)
            } else {
                element.text_run.map(|run| {
                    let mut text_run =
                        TextRun::new(run.content, element.start_index, element.end_index);
                    if run.text_style.strikethrough {
                        text_run = text_run.struck();
                    }
                    Element::TextRun(text_run)
                })
            }
        })
        .collect();
    Paragraph::new(elements)
}

/// Payload for a `batchUpdate` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    pub requests: Vec<UpdateRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateRequest {
    UpdateTextStyle(UpdateTextStyleRequest),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyleRequest {
    pub range: WireRange,
    pub text_style: WireTextStyle,
    /// Field mask naming which style properties the update touches.
    pub fields: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl BatchUpdateRequest {
    /// Build a single-request update that sets strikethrough over the range.
    pub fn strike(start_index: usize, end_index: usize) -> Self {
        Self {
            requests: vec![UpdateRequest::UpdateTextStyle(UpdateTextStyleRequest {
                range: WireRange {
                    start_index,
                    end_index,
                },
                text_style: WireTextStyle {
                    strikethrough: true,
                },
                fields: "strikethrough",
            })],
        }
    }
}
