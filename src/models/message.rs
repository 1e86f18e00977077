//! Chat messages and their on-screen layout.

use msgview_core::{MessageSegment, is_inline};
use serde::{Deserialize, Deserializer};

/// One chat message as delivered by the history feed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatMessage {
    #[serde(deserialize_with = "id_string")]
    pub message_id: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub segments: Vec<MessageSegment>,
}

/// Message ids arrive as strings or as plain numbers.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(n) => n.to_string(),
    })
}

/// A visual row of a message body, holding segment indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentRow {
    /// Consecutive inline segments sharing one line
    Inline(Vec<usize>),
    /// A segment on its own line
    Block(usize),
}

/// Group `segments` into rows.
///
/// Runs of inline segments share a row; every block segment gets its own.
/// Unknown segment types are laid out as blocks.
pub fn layout_rows(segments: &[MessageSegment]) -> Vec<SegmentRow> {
    let mut rows = Vec::new();
    let mut run: Vec<usize> = Vec::new();

    for (index, segment) in segments.iter().enumerate() {
        if is_inline(&segment.type_tag).unwrap_or(false) {
            run.push(index);
            continue;
        }
        if !run.is_empty() {
            rows.push(SegmentRow::Inline(std::mem::take(&mut run)));
        }
        rows.push(SegmentRow::Block(index));
    }
    if !run.is_empty() {
        rows.push(SegmentRow::Inline(run));
    }

    rows
}
