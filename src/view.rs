//! Display projection of the gallery.
//!
//! Pure functions from records to what a UI shows. Nothing here is a source
//! of truth; callers re-project after every save and delete.

use crate::gallery::PendingDeletion;
use crate::store::SavedRecord;
use serde::Serialize;

/// Cut `text` to `budget` characters, appending `...` if anything was cut.
pub fn truncate_label(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// One gallery card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub id: i64,
    /// Embedded PNG for the thumbnail.
    pub image: String,
    /// Truncated text.
    pub label: String,
    /// Full text, for hover.
    pub tooltip: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    pub items: Vec<DisplayItem>,
    /// Shown iff there is no valid record.
    pub show_empty_state: bool,
}

pub fn project(records: &[SavedRecord], label_chars: usize) -> GalleryView {
    let items = records
        .iter()
        .map(|r| DisplayItem {
            id: r.id,
            image: r.img.clone(),
            label: truncate_label(&r.text, label_chars),
            tooltip: r.text.clone(),
            date: r.date.clone(),
        })
        .collect::<Vec<_>>();
    GalleryView {
        show_empty_state: items.is_empty(),
        items,
    }
}

/// Quoted, truncated name for the delete-confirmation prompt.
pub fn delete_prompt(pending: &PendingDeletion, prompt_chars: usize) -> String {
    format!("'{}'", truncate_label(&pending.display_label, prompt_chars))
}
