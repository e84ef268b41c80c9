//! # qrstyle
//!
//! Styled QR code generation with a local gallery. Type some text or a URL,
//! tweak colours, module shapes, finder corners, size and an optional center
//! logo, then download the result as a PNG or save it to a gallery that
//! persists between sessions.
//!
//! # Architecture
//!
//! ```text
//! user action → Session → StyleMachine → Renderer → RenderEngine
//!                  │                         │
//!                  │               export_raster_bytes (on save)
//!                  ▼                         ▼
//!               Gallery ───────────────▶ RecordStore → KeyValueStore
//!                  │
//!                  ▼
//!              view::project → GalleryView
//! ```
//!
//! The [`session::Session`] is the only stateful entry point. It owns one
//! style machine, one renderer with at most one live artifact, one logo loader
//! and one gallery; nothing lives in globals.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Session controller exposing every user action |
//! | [`style`] | Idle/Active state machine deciding when and what to render |
//! | [`render`] | Engine trait, the raster engine, and the construct-once renderer adapter |
//! | [`logo`] | Logo decode on a worker thread, last request wins |
//! | [`gallery`] | Save, list and confirm-to-delete over the record store |
//! | [`view`] | Pure projection of saved records into display items |
//! | [`store`] | Key-value persistence (file and memory) and the record list |
//! | [`config`] | `qrstyle.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Colours, dot patterns, corner styles, content mode, logo image |
//! | [`data_url`] | `data:<mime>;base64,` encoding and decoding |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Full Snapshots, Never Partial Updates
//!
//! Every render receives a complete [`render::RenderOptions`] built from the
//! whole current style. The engine never has to merge a partial update into
//! what it rendered before, so the artifact always matches the style exactly.
//!
//! ## Synchronous Rendering
//!
//! Rendering happens on the caller's thread. Exporting bytes for a save can
//! therefore never observe a half-finished render. The one slow, user-paced
//! operation, decoding a logo file, runs on a worker thread instead.
//!
//! ## Lax Record Policy
//!
//! Stored entries without an `id` are skipped when loading and counting, but
//! kept verbatim whenever the list is rewritten. Nothing is purged behind the
//! user's back.

pub mod config;
pub mod data_url;
pub mod gallery;
pub mod logo;
pub mod output;
pub mod render;
pub mod session;
pub mod store;
pub mod style;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
