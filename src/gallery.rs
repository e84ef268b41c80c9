//! The saved gallery: save, list, and delete with confirmation.
//!
//! Saving always creates a new record at the front of the list; records are
//! never edited afterwards. Deleting is a two-step exchange:
//!
//! ```text
//!   NoPending ──request_delete──▶ PendingConfirm ──confirm_delete──▶ NoPending
//!                                   │      ▲   └────cancel_delete───▶ NoPending
//!                                   └──────┘ request_delete (replaces target)
//! ```
//!
//! Only `confirm_delete` touches storage. Removing an id that is already gone
//! is a no-op, so confirming the same deletion twice leaves the same list.
//!
//! ## Record ids
//!
//! Ids are millisecond timestamps from the [`Clock`]. A new id is forced above
//! the largest id already stored, so two saves within the same millisecond
//! (or after the clock stepped backwards) still get distinct ids. A stored id
//! of `i64::MAX` leaves no room above it, and saving then fails with
//! [`GalleryError::IdsExhausted`]. Duplicate save requests are not merged:
//! two saves make two records.

use crate::data_url;
use crate::store::{KeyValueStore, RecordStore, SavedRecord, StoreError, entry_id};
use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Failed to persist gallery: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No record id left above {0}")]
    IdsExhausted(i64),
}

/// Time source for record ids and date labels.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A deletion awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub target_id: i64,
    /// Full text of the record; truncated only when displayed.
    pub display_label: String,
}

pub struct Gallery<S: KeyValueStore> {
    store: RecordStore<S>,
    clock: Box<dyn Clock>,
    pending: Option<PendingDeletion>,
}

impl<S: KeyValueStore> Gallery<S> {
    pub fn new(store: RecordStore<S>) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    pub fn with_clock(store: RecordStore<S>, clock: Box<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            pending: None,
        }
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// Valid records, most recent first.
    pub fn records(&self) -> Vec<SavedRecord> {
        self.store.load()
    }

    /// Save a new record for `png` and prepend it to the stored list.
    pub fn save(&mut self, png: &[u8], source_text: &str) -> Result<SavedRecord, GalleryError> {
        let mut entries = self.store.load_raw();
        let now = self.clock.now();
        let newest = entries.iter().filter_map(entry_id).max();

        let id = next_id(now.timestamp_millis(), newest)
            .ok_or(GalleryError::IdsExhausted(newest.unwrap_or(i64::MAX)))?;
        let record = SavedRecord {
            id,
            img: data_url::encode("image/png", png),
            text: source_text.to_string(),
            date: date_label(&now),
        };
        entries.insert(0, serde_json::to_value(&record)?);
        self.store.save_all(&entries)?;

        info!(id = record.id, "saved to gallery");
        Ok(record)
    }

    /// Remove `id` from storage. Returns whether anything was removed.
    pub fn delete(&mut self, id: i64) -> Result<bool, GalleryError> {
        let mut entries = self.store.load_raw();
        let before = entries.len();
        entries.retain(|entry| entry_id(entry) != Some(id));
        if entries.len() == before {
            debug!(id, "delete of absent record ignored");
            return Ok(false);
        }
        self.store.save_all(&entries)?;
        info!(id, "deleted from gallery");
        Ok(true)
    }

    /// Begin confirming a deletion, replacing any pending one.
    pub fn request_delete(&mut self, id: i64, label: impl Into<String>) -> &PendingDeletion {
        self.pending.insert(PendingDeletion {
            target_id: id,
            display_label: label.into(),
        })
    }

    pub fn pending(&self) -> Option<&PendingDeletion> {
        self.pending.as_ref()
    }

    /// Carry out the pending deletion.
    ///
    /// Returns the deleted target, or `None` when nothing was pending. If
    /// storage fails the deletion stays pending.
    pub fn confirm_delete(&mut self) -> Result<Option<i64>, GalleryError> {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        let id = pending.target_id;
        if let Err(e) = self.delete(id) {
            self.pending = Some(pending);
            return Err(e);
        }
        Ok(Some(id))
    }

    /// Drop the pending deletion. Returns whether one was pending.
    pub fn cancel_delete(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

/// Next record id: the clock, unless that would not exceed the newest id.
///
/// `None` when the newest stored id is already `i64::MAX`.
pub fn next_id(now_millis: i64, newest: Option<i64>) -> Option<i64> {
    match newest {
        Some(n) if n >= now_millis => n.checked_add(1),
        _ => Some(now_millis),
    }
}

/// Short local date, e.g. `3/7/2026`.
pub fn date_label(now: &DateTime<Local>) -> String {
    now.format("%-m/%-d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_helpers::{FixedClock, memory_gallery};
    use serde_json::json;

    // =========================================================================
    // Save
    // =========================================================================

    #[test]
    fn save_prepends_and_grows_by_one() {
        let mut gallery = memory_gallery();
        gallery.save(b"one", "first").unwrap();
        let before = gallery.records().len();

        let record = gallery.save(b"two", "https://example.com").unwrap();
        let records = gallery.records();
        assert_eq!(records.len(), before + 1);
        assert_eq!(records[0], record);
        assert_eq!(records[0].text, "https://example.com");
        assert_eq!(records[1].text, "first");
    }

    #[test]
    fn save_embeds_png_as_data_url() {
        let mut gallery = memory_gallery();
        let record = gallery.save(b"\x89PNG", "x").unwrap();
        assert_eq!(record.img, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn save_labels_with_local_date() {
        let mut gallery = memory_gallery();
        let record = gallery.save(b"png", "x").unwrap();
        assert_eq!(record.date, "3/7/2026");
    }

    #[test]
    fn ids_stay_unique_at_same_instant() {
        let mut gallery = memory_gallery();
        let a = gallery.save(b"a", "a").unwrap();
        let b = gallery.save(b"b", "b").unwrap();
        let c = gallery.save(b"c", "c").unwrap();
        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn save_keeps_entries_without_id() {
        let mut kv = MemoryStore::new();
        kv.set("savedQRs", json!([{"text": "legacy"}]).to_string())
            .unwrap();
        let mut gallery = Gallery::with_clock(
            RecordStore::new(kv, "savedQRs"),
            Box::new(FixedClock::default()),
        );
        gallery.save(b"png", "new").unwrap();

        assert_eq!(gallery.records().len(), 1);
        let raw = gallery.store().load_raw();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[1], json!({"text": "legacy"}));
    }

    #[test]
    fn next_id_follows_clock_or_newest() {
        assert_eq!(next_id(1000, None), Some(1000));
        assert_eq!(next_id(1000, Some(10)), Some(1000));
        assert_eq!(next_id(1000, Some(1000)), Some(1001));
        assert_eq!(next_id(1000, Some(5000)), Some(5001));
        assert_eq!(next_id(1000, Some(i64::MAX)), None);
    }

    #[test]
    fn save_above_max_id_fails_without_writing() {
        let mut kv = MemoryStore::new();
        let stored = json!([{"id": i64::MAX, "img": "", "text": "last", "date": "1/1/2026"}]);
        kv.set("savedQRs", stored.to_string()).unwrap();
        let mut gallery = Gallery::with_clock(
            RecordStore::new(kv, "savedQRs"),
            Box::new(FixedClock::default()),
        );

        assert!(matches!(
            gallery.save(b"png", "new"),
            Err(GalleryError::IdsExhausted(i64::MAX))
        ));
        assert_eq!(gallery.records().len(), 1);
        assert_eq!(gallery.records()[0].text, "last");
    }

    // =========================================================================
    // Delete confirmation
    // =========================================================================

    #[test]
    fn request_delete_does_not_touch_storage() {
        let mut gallery = memory_gallery();
        let record = gallery.save(b"png", "keep me").unwrap();
        let pending = gallery.request_delete(record.id, "keep me").clone();
        assert_eq!(pending.target_id, record.id);
        assert_eq!(gallery.records().len(), 1);
    }

    #[test]
    fn confirm_removes_and_clears_pending() {
        let mut gallery = memory_gallery();
        let a = gallery.save(b"a", "a").unwrap();
        let b = gallery.save(b"b", "b").unwrap();

        gallery.request_delete(a.id, "a");
        assert_eq!(gallery.confirm_delete().unwrap(), Some(a.id));
        assert_eq!(gallery.pending(), None);
        assert_eq!(gallery.records(), vec![b]);
    }

    #[test]
    fn confirm_without_pending_is_noop() {
        let mut gallery = memory_gallery();
        gallery.save(b"a", "a").unwrap();
        assert_eq!(gallery.confirm_delete().unwrap(), None);
        assert_eq!(gallery.records().len(), 1);
    }

    #[test]
    fn cancel_clears_pending_without_storage_change() {
        let mut gallery = memory_gallery();
        let a = gallery.save(b"a", "a").unwrap();
        gallery.request_delete(a.id, "a");
        assert!(gallery.cancel_delete());
        assert!(!gallery.cancel_delete());
        assert_eq!(gallery.records().len(), 1);
    }

    #[test]
    fn second_request_replaces_target() {
        let mut gallery = memory_gallery();
        let a = gallery.save(b"a", "a").unwrap();
        let b = gallery.save(b"b", "b").unwrap();
        gallery.request_delete(a.id, "a");
        gallery.request_delete(b.id, "b");

        assert_eq!(gallery.confirm_delete().unwrap(), Some(b.id));
        assert_eq!(gallery.records(), vec![a]);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut gallery = memory_gallery();
        let a = gallery.save(b"a", "a").unwrap();
        gallery.save(b"b", "b").unwrap();

        assert!(gallery.delete(a.id).unwrap());
        let once = gallery.records();
        assert!(!gallery.delete(a.id).unwrap());
        assert_eq!(gallery.records(), once);
    }

    #[test]
    fn confirming_absent_target_is_not_an_error() {
        let mut gallery = memory_gallery();
        gallery.save(b"a", "a").unwrap();
        gallery.request_delete(42, "gone");
        assert_eq!(gallery.confirm_delete().unwrap(), Some(42));
        assert_eq!(gallery.records().len(), 1);
    }

    #[test]
    fn date_label_drops_padding() {
        let clock = FixedClock::default();
        assert_eq!(date_label(&clock.now()), "3/7/2026");
    }
}
