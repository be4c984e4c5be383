//! Note domain model.
//!
//! # Responsibility
//! - Define `Note` and the `ContentItem` tagged union composing its body.
//! - Provide the draft/save-enabled helpers shared by screen reducers.
//!
//! # Invariants
//! - `id == 0` means the note has not been assigned a database identity.
//! - `content` order is the display order; indices are positions.
//! - A note edit replaces the full content sequence, never a slice of it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Database-assigned note identity. `0` marks an unsaved draft.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// One ordered element of a note body.
///
/// Closed sum type: a note body is a sequence of free text segments and
/// image references, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    /// Free-form text segment.
    Text { text: String },
    /// Path to an image file; internal once the store has imported it.
    Image { path: String },
}

impl ContentItem {
    /// Creates a text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates an image reference.
    pub fn image(path: impl Into<String>) -> Self {
        Self::Image { path: path.into() }
    }

    /// Returns `true` for a text segment that is empty or whitespace-only.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text { text } if text.trim().is_empty())
    }

    /// Returns the image path when this item is an image reference.
    pub fn image_path(&self) -> Option<&str> {
        match self {
            Self::Image { path } => Some(path.as_str()),
            Self::Text { .. } => None,
        }
    }
}

/// A titled, ordered sequence of content items with pin/timestamp metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Database identity; `0` until the first insert assigns one.
    pub id: NoteId,
    /// Display title.
    pub title: String,
    /// Ordered body items.
    pub content: Vec<ContentItem>,
    /// Last update timestamp in epoch milliseconds.
    pub updated_at: i64,
    /// Pinned notes are listed ahead of the rest.
    pub is_pinned: bool,
}

impl Note {
    /// Creates an unsaved draft (`id == 0`).
    pub fn draft(
        title: impl Into<String>,
        content: Vec<ContentItem>,
        updated_at: i64,
        is_pinned: bool,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            content,
            updated_at,
            is_pinned,
        }
    }

    /// Returns whether this note carries a database identity.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Collects every image path referenced by the body, deduplicated.
    ///
    /// Used to diff two versions of a note when garbage-collecting files.
    pub fn image_paths(&self) -> BTreeSet<String> {
        self.content
            .iter()
            .filter_map(|item| item.image_path().map(str::to_string))
            .collect()
    }

    /// Returns whether the body carries anything worth saving:
    /// at least one image or one non-blank text segment.
    pub fn has_substance(&self) -> bool {
        self.content.iter().any(|item| !item.is_blank_text())
    }
}
