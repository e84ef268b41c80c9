//! Shared test utilities for the qrstyle test suite.
//!
//! Provides canned render options, a deterministic clock, an in-memory
//! gallery, and a tiny logo file writer.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut gallery = memory_gallery();
//! let record = gallery.save(b"png", "hello").unwrap();
//! assert_eq!(record.date, "3/7/2026");
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use image::{Rgba, RgbaImage};

use crate::gallery::{Clock, Gallery};
use crate::render::{
    BackgroundOptions, CornersSquareOptions, DotsOptions, ImageOptions, RenderOptions,
};
use crate::store::{MemoryStore, RecordStore};
use crate::types::{Color, CornerStyle, DotPattern};

// =========================================================================
// Render options
// =========================================================================

/// 300px black-on-white square symbol for `data`, no logo.
pub fn sample_options(data: &str) -> RenderOptions {
    RenderOptions {
        width: 300,
        height: 300,
        data: data.to_string(),
        image: None,
        dots_options: DotsOptions {
            color: Color::BLACK,
            kind: DotPattern::Square,
        },
        background_options: BackgroundOptions {
            color: Color::WHITE,
        },
        corners_square_options: CornersSquareOptions {
            kind: CornerStyle::Square,
            color: Color::BLACK,
        },
        image_options: ImageOptions {
            cross_origin: "anonymous".to_string(),
            margin: 5,
            image_size: 0.4,
        },
    }
}

// =========================================================================
// Files
// =========================================================================

/// Write an 8×8 solid red PNG to `dir/name` and return its path.
pub fn write_logo_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]))
        .save(&path)
        .unwrap();
    path
}

// =========================================================================
// Gallery
// =========================================================================

/// Clock frozen at a single instant; defaults to 2026-03-07 12:00 local.
pub struct FixedClock(pub DateTime<Local>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Local.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Empty in-memory gallery under the stock storage key.
pub fn memory_gallery() -> Gallery<MemoryStore> {
    Gallery::with_clock(
        RecordStore::new(MemoryStore::new(), "savedQRs"),
        Box::new(FixedClock::default()),
    )
}
