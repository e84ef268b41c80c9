//! CLI output formatting.
//!
//! Output is **content-first**: every saved record is shown by its id and the
//! text it encodes, with the date as trailing context. Long text is truncated
//! with the same label budget the gallery view uses.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! Generated https://example.com (300px, dots / square)
//!     Logo: attached
//!     Preview: out/preview.png
//!     Downloaded: out/my-qr-code.png
//! Saved 1772884800000 https://example.com/... 3/7/2026
//! ```
//!
//! ## List
//!
//! ```text
//! Saved QR codes
//! 1772884800001 https://example.com/... 3/7/2026
//! 1772884800000 hello 3/7/2026
//! ```
//!
//! With no saved records the list is replaced by a single empty-state line.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::render::RenderOptions;
use crate::store::SavedRecord;
use crate::view::{DisplayItem, GalleryView, truncate_label};
use std::path::Path;

pub const EMPTY_STATE: &str = "No saved QR codes yet. Generate one and save it to start your gallery.";

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn item_line(item: &DisplayItem) -> String {
    format!("{} {} {}", item.id, item.label, item.date)
}

// ============================================================================
// Generate
// ============================================================================

/// What the `generate` command produced, for display.
#[derive(Debug, Default)]
pub struct GenerateReport<'a> {
    pub preview: Option<&'a Path>,
    pub download: Option<&'a Path>,
    pub saved: Option<&'a SavedRecord>,
}

pub fn format_generate_output(
    options: &RenderOptions,
    report: &GenerateReport<'_>,
    label_chars: usize,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Generated {} ({}px, {} / {})",
        truncate_label(&options.data, label_chars),
        options.width,
        options.dots_options.kind,
        options.corners_square_options.kind,
    )];
    if options.image.is_some() {
        lines.push(format!("{}Logo: attached", indent(1)));
    }
    if let Some(path) = report.preview {
        lines.push(format!("{}Preview: {}", indent(1), path.display()));
    }
    if let Some(path) = report.download {
        lines.push(format!("{}Downloaded: {}", indent(1), path.display()));
    }
    if let Some(record) = report.saved {
        lines.push(format_saved_record(record, label_chars));
    }
    lines
}

pub fn print_generate_output(
    options: &RenderOptions,
    report: &GenerateReport<'_>,
    label_chars: usize,
) {
    for line in format_generate_output(options, report, label_chars) {
        println!("{}", line);
    }
}

pub fn format_saved_record(record: &SavedRecord, label_chars: usize) -> String {
    format!(
        "Saved {} {} {}",
        record.id,
        truncate_label(&record.text, label_chars),
        record.date
    )
}

// ============================================================================
// List
// ============================================================================

pub fn format_gallery(view: &GalleryView) -> Vec<String> {
    if view.show_empty_state {
        return vec![EMPTY_STATE.to_string()];
    }
    let mut lines = vec!["Saved QR codes".to_string()];
    lines.extend(view.items.iter().map(item_line));
    lines
}

pub fn print_gallery(view: &GalleryView) {
    for line in format_gallery(view) {
        println!("{}", line);
    }
}

// ============================================================================
// Delete
// ============================================================================

pub fn format_delete_outcome(id: i64, deleted: bool) -> String {
    if deleted {
        format!("Deleted {}", id)
    } else {
        format!("Kept {}", id)
    }
}
