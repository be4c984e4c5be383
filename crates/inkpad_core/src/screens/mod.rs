//! Per-screen state machines.
//!
//! # Responsibility
//! - Translate UI commands into service calls and next screen states.
//!
//! # Invariants
//! - Non-terminal transitions are pure state functions.
//! - `Save`/`Delete` perform their service call before entering the
//!   terminal `Finished` state.

pub mod create;
pub mod edit;
pub mod notes;

pub(crate) use edit_content::{edit_text_at, push_image};

mod edit_content {
    use crate::model::note::ContentItem;

    /// Rewrites the text of the item at `index`, leaving images and other
    /// positions untouched.
    pub(crate) fn edit_text_at(
        content: &[ContentItem],
        index: usize,
        text: &str,
    ) -> Vec<ContentItem> {
        content
            .iter()
            .enumerate()
            .map(|(position, item)| {
                if position == index && matches!(item, ContentItem::Text { .. }) {
                    ContentItem::text(text)
                } else {
                    item.clone()
                }
            })
            .collect()
    }

    /// Appends an image, dropping a trailing blank text item first and
    /// re-adding one after so typing can continue below the image.
    pub(crate) fn push_image(content: &[ContentItem], path: &str) -> Vec<ContentItem> {
        let mut next = content.to_vec();
        if next.last().is_some_and(ContentItem::is_blank_text) {
            next.pop();
        }
        next.push(ContentItem::image(path));
        next.push(ContentItem::text(""));
        next
    }

}
