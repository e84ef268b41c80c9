//! End-to-end session flows against the real raster engine and a file store.
//!
//! Everything runs inside a temp directory: the store file, the preview
//! surface, and downloads.

use chrono::{DateTime, Local, TimeZone};
use qrstyle::config::AppConfig;
use qrstyle::data_url;
use qrstyle::gallery::{Clock, Gallery};
use qrstyle::render::{RasterEngine, RenderPass};
use qrstyle::session::{Session, SessionError};
use qrstyle::store::{FileStore, RecordStore};
use qrstyle::types::{ContentMode, CornerStyle, DotPattern};
use std::path::Path;
use tempfile::TempDir;

struct Noon;

impl Clock for Noon {
    fn now(&self) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap()
    }
}

fn open(dir: &Path) -> Session<RasterEngine, FileStore> {
    let config = AppConfig::default();
    let store = FileStore::open(dir.join("data/store.json"));
    let gallery = Gallery::with_clock(RecordStore::new(store, "savedQRs"), Box::new(Noon));
    let engine = RasterEngine::new(dir.join("downloads")).with_surface(dir.join("preview.png"));
    Session::new(&config, engine, gallery)
}

fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory(bytes).unwrap();
    (image.width(), image.height())
}

#[test]
fn url_generate_restyle_and_save() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(tmp.path());
    assert!(session.gallery_view().show_empty_state);

    session.switch_mode(ContentMode::Url);
    session.set_input("https://example.com");
    assert_eq!(session.generate().unwrap(), RenderPass::Created);
    assert!(tmp.path().join("preview.png").exists());

    assert_eq!(
        session.set_dot_pattern(DotPattern::Dots).unwrap(),
        Some(RenderPass::Updated)
    );
    let record = session.save_to_gallery().unwrap().unwrap();
    assert_eq!(record.text, "https://example.com");
    assert_eq!(record.date, "3/7/2026");

    let (mime, png) = data_url::decode(&record.img).unwrap();
    assert_eq!(mime, "image/png");
    assert_eq!(png_dimensions(&png), (300, 300));
    assert_eq!(png, session.renderer().export_raster_bytes().unwrap());

    let view = session.gallery_view();
    assert!(!view.show_empty_state);
    assert_eq!(view.items[0].id, record.id);
}

#[test]
fn gallery_survives_a_new_session() {
    let tmp = TempDir::new().unwrap();
    let mut first = open(tmp.path());
    first.set_input("persist me");
    first.generate().unwrap();
    let a = first.save_to_gallery().unwrap().unwrap();
    let b = first.save_to_gallery().unwrap().unwrap();
    assert!(b.id > a.id);
    drop(first);

    let second = open(tmp.path());
    let ids: Vec<i64> = second.gallery_view().items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

#[test]
fn confirm_and_cancel_delete() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(tmp.path());
    session.set_input("a fairly long bit of text to delete");
    session.generate().unwrap();
    let record = session.save_to_gallery().unwrap().unwrap();

    session.request_delete(record.id).unwrap();
    assert_eq!(
        session.delete_prompt().as_deref(),
        Some("'a fairly long bit ...'")
    );
    assert!(session.cancel_delete());
    assert_eq!(session.gallery_view().items.len(), 1);

    session.request_delete(record.id).unwrap();
    assert_eq!(session.confirm_delete().unwrap(), Some(record.id));
    assert!(session.gallery_view().show_empty_state);
    assert!(open(tmp.path()).gallery_view().show_empty_state);
}

#[test]
fn download_writes_named_png() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(tmp.path());
    session.set_input("download me");
    session.generate().unwrap();
    session.set_corner_style(CornerStyle::ExtraRounded).unwrap();
    session.download();

    let bytes = std::fs::read(tmp.path().join("downloads/my-qr-code.png")).unwrap();
    assert_eq!(png_dimensions(&bytes), (300, 300));
}

#[test]
fn narrow_viewport_shrinks_render() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(tmp.path());
    session.set_input("shrink");
    session.generate().unwrap();
    session.resize(240).unwrap();

    let png = session.renderer().export_raster_bytes().unwrap();
    assert_eq!(png_dimensions(&png), (200, 200));
}

#[test]
fn failed_render_keeps_previous_artifact() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(tmp.path());
    session.set_input("keep");
    session.generate().unwrap();

    assert!(matches!(session.resize(40), Err(SessionError::Render(_))));
    let png = session.renderer().export_raster_bytes().unwrap();
    assert_eq!(png_dimensions(&png), (300, 300));
}

#[test]
fn empty_input_is_rejected_without_render() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(tmp.path());
    session.set_input("  ");
    assert!(matches!(session.generate(), Err(SessionError::Input(_))));
    assert!(!session.renderer().has_artifact());
    assert!(!tmp.path().join("preview.png").exists());
    assert_eq!(session.save_to_gallery().unwrap(), None);
}

#[test]
fn failed_first_render_leaves_session_idle() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(tmp.path());
    session.resize(50).unwrap();
    session.set_input("hello");

    assert!(matches!(session.generate(), Err(SessionError::Render(_))));
    assert!(!session.controls_enabled());
    assert!(!session.renderer().has_artifact());
    assert_eq!(session.save_to_gallery().unwrap(), None);

    session.resize(400).unwrap();
    assert_eq!(session.generate().unwrap(), RenderPass::Created);
    assert!(session.controls_enabled());
}
