//! Logo decoding off the session thread.
//!
//! Selecting a logo file schedules a decode on a worker thread; the result
//! comes back over an `mpsc` channel and is applied by whoever owns the
//! [`LogoLoader`]. Every request gets a sequence number and only the latest
//! one is ever applied: a slow decode finishing after a newer selection, or
//! after the selection was cleared, is dropped.
//!
//! A file that cannot be read or decoded is accepted as "no logo" so the
//! style machine always ends up in a defined state.

use crate::data_url;
use crate::types::LogoImage;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum LogoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported or corrupt image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Validate image bytes and wrap them as an embedded logo.
pub fn decode_logo(bytes: &[u8]) -> Result<LogoImage, LogoError> {
    let format = image::guess_format(bytes)?;
    image::load_from_memory_with_format(bytes, format)?;
    Ok(LogoImage {
        data_url: data_url::encode(format.to_mime_type(), bytes),
    })
}

/// Completion message of one decode request.
#[derive(Debug)]
pub struct LogoDecoded {
    pub seq: u64,
    pub result: Result<LogoImage, LogoError>,
}

pub struct LogoLoader {
    latest: u64,
    in_flight: usize,
    tx: Sender<LogoDecoded>,
    rx: Receiver<LogoDecoded>,
}

impl Default for LogoLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LogoLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            latest: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Start decoding `path`; supersedes every earlier request.
    pub fn request(&mut self, path: &Path) -> u64 {
        self.latest += 1;
        self.in_flight += 1;
        let seq = self.latest;
        let tx = self.tx.clone();
        let path = path.to_path_buf();
        std::thread::spawn(move || {
            let result = std::fs::read(&path)
                .map_err(LogoError::from)
                .and_then(|bytes| decode_logo(&bytes));
            // The loader may be gone; nothing to report to then.
            let _ = tx.send(LogoDecoded { seq, result });
        });
        debug!(seq, "logo decode requested");
        seq
    }

    /// Invalidate every outstanding request.
    pub fn cancel(&mut self) {
        self.latest += 1;
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Next finished decode, if one is ready.
    pub fn try_next(&mut self) -> Option<LogoDecoded> {
        let decoded = self.rx.try_recv().ok()?;
        self.in_flight -= 1;
        Some(decoded)
    }

    /// Block for the next finished decode; `None` once nothing is in flight.
    pub fn next_blocking(&mut self) -> Option<LogoDecoded> {
        if self.in_flight == 0 {
            return None;
        }
        let decoded = self.rx.recv().ok()?;
        self.in_flight -= 1;
        Some(decoded)
    }

    /// Logo value to commit for a finished decode.
    ///
    /// `None` means the result is stale and must be ignored; `Some(None)`
    /// means the decode failed and the logo is cleared.
    pub fn accept(&self, decoded: LogoDecoded) -> Option<Option<LogoImage>> {
        if decoded.seq != self.latest {
            debug!(seq = decoded.seq, latest = self.latest, "dropping stale logo");
            return None;
        }
        match decoded.result {
            Ok(logo) => Some(Some(logo)),
            Err(e) => {
                warn!("logo could not be loaded, continuing without one: {e}");
                Some(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_logo_png;
    use tempfile::TempDir;

    #[test]
    fn decode_logo_embeds_png() {
        let tmp = TempDir::new().unwrap();
        let path = write_logo_png(tmp.path(), "logo.png");
        let logo = decode_logo(&std::fs::read(path).unwrap()).unwrap();
        assert!(logo.data_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn decode_logo_rejects_non_images() {
        assert!(matches!(
            decode_logo(b"just some text"),
            Err(LogoError::Decode(_))
        ));
    }

    #[test]
    fn request_then_wait_accepts_latest() {
        let tmp = TempDir::new().unwrap();
        let path = write_logo_png(tmp.path(), "logo.png");
        let mut loader = LogoLoader::new();
        let seq = loader.request(&path);

        let decoded = loader.next_blocking().unwrap();
        assert_eq!(decoded.seq, seq);
        assert!(matches!(loader.accept(decoded), Some(Some(_))));
        assert!(loader.next_blocking().is_none());
    }

    #[test]
    fn superseded_request_is_dropped() {
        let tmp = TempDir::new().unwrap();
        let first = write_logo_png(tmp.path(), "a.png");
        let second = write_logo_png(tmp.path(), "b.png");
        let mut loader = LogoLoader::new();
        let old = loader.request(&first);
        let new = loader.request(&second);

        let mut accepted = Vec::new();
        while let Some(decoded) = loader.next_blocking() {
            let seq = decoded.seq;
            if loader.accept(decoded).is_some() {
                accepted.push(seq);
            }
        }
        assert_eq!(accepted, vec![new]);
        assert_ne!(old, new);
    }

    #[test]
    fn cancel_drops_outstanding_result() {
        let tmp = TempDir::new().unwrap();
        let path = write_logo_png(tmp.path(), "logo.png");
        let mut loader = LogoLoader::new();
        loader.request(&path);
        loader.cancel();

        let decoded = loader.next_blocking().unwrap();
        assert!(loader.accept(decoded).is_none());
    }

    #[test]
    fn missing_file_is_accepted_as_no_logo() {
        let tmp = TempDir::new().unwrap();
        let mut loader = LogoLoader::new();
        loader.request(&tmp.path().join("missing.png"));

        let decoded = loader.next_blocking().unwrap();
        assert!(matches!(decoded.result, Err(LogoError::Io(_))));
        assert_eq!(loader.accept(decoded), Some(None));
    }
}
