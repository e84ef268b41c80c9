//! The session controller.
//!
//! A [`Session`] owns every piece of per-session mutable state: the style
//! machine, the renderer with its single artifact, the logo loader, and the
//! gallery with its pending deletion. UI layers hold one `Session` and call
//! its action methods; nothing lives in globals.
//!
//! Every style action runs the change through the style machine and, when the
//! machine says so, renders immediately with the snapshot current at that
//! moment.

use crate::config::AppConfig;
use crate::gallery::{Gallery, GalleryError, PendingDeletion};
use crate::logo::LogoLoader;
use crate::render::{RenderEngine, RenderError, RenderPass, Renderer};
use crate::store::{KeyValueStore, SavedRecord};
use crate::style::{InputError, StyleChange, StyleMachine};
use crate::types::{Color, ContentMode, CornerStyle, DotPattern};
use crate::view::{self, GalleryView};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
    #[error(transparent)]
    Gallery(#[from] GalleryError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

pub struct Session<E: RenderEngine, S: KeyValueStore> {
    style: StyleMachine,
    renderer: Renderer<E>,
    logo: LogoLoader,
    gallery: Gallery<S>,
    download_name: String,
    label_chars: usize,
    prompt_chars: usize,
}

impl<E: RenderEngine, S: KeyValueStore> Session<E, S> {
    pub fn new(config: &AppConfig, engine: E, gallery: Gallery<S>) -> Self {
        Self {
            style: StyleMachine::new(config),
            renderer: Renderer::new(engine),
            logo: LogoLoader::new(),
            gallery,
            download_name: config.download.name.clone(),
            label_chars: config.gallery.label_chars,
            prompt_chars: config.gallery.prompt_chars,
        }
    }

    pub fn style(&self) -> &StyleMachine {
        &self.style
    }

    pub fn renderer(&self) -> &Renderer<E> {
        &self.renderer
    }

    pub fn gallery(&self) -> &Gallery<S> {
        &self.gallery
    }

    pub fn controls_enabled(&self) -> bool {
        self.style.controls_enabled()
    }

    // =========================================================================
    // Content
    // =========================================================================

    pub fn switch_mode(&mut self, mode: ContentMode) {
        self.style.switch_mode(mode);
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.style.set_input(value);
    }

    /// Render the current input and commit it once the render succeeds.
    ///
    /// A failed render commits nothing: the content and the phase stay as
    /// they were.
    pub fn generate(&mut self) -> Result<RenderPass> {
        let options = self.style.generate()?;
        let pass = self.renderer.ensure_rendered(&options)?;
        self.style.commit(&options);
        Ok(pass)
    }

    // =========================================================================
    // Style
    // =========================================================================

    fn apply(&mut self, change: StyleChange) -> Result<Option<RenderPass>> {
        match self.style.apply(change) {
            Some(options) => Ok(Some(self.renderer.ensure_rendered(&options)?)),
            None => Ok(None),
        }
    }

    pub fn set_foreground(&mut self, color: Color) -> Result<Option<RenderPass>> {
        self.apply(StyleChange::Foreground(color))
    }

    pub fn set_background(&mut self, color: Color) -> Result<Option<RenderPass>> {
        self.apply(StyleChange::Background(color))
    }

    pub fn set_size(&mut self, px: u32) -> Result<Option<RenderPass>> {
        self.apply(StyleChange::Size(px))
    }

    pub fn set_dot_pattern(&mut self, pattern: DotPattern) -> Result<Option<RenderPass>> {
        self.apply(StyleChange::DotPattern(pattern))
    }

    pub fn set_corner_style(&mut self, style: CornerStyle) -> Result<Option<RenderPass>> {
        self.apply(StyleChange::CornerStyle(style))
    }

    /// The preview container changed width.
    pub fn resize(&mut self, container_width: u32) -> Result<Option<RenderPass>> {
        self.apply(StyleChange::ContainerWidth(container_width))
    }

    // =========================================================================
    // Logo
    // =========================================================================

    /// Start decoding a logo file. The logo is committed once the decode
    /// finishes, via [`poll_logo`](Self::poll_logo) or
    /// [`wait_for_logo`](Self::wait_for_logo).
    pub fn select_logo(&mut self, path: &Path) -> u64 {
        self.logo.request(path)
    }

    /// Remove the logo now, discarding any decode still running.
    pub fn clear_logo(&mut self) -> Result<Option<RenderPass>> {
        self.logo.cancel();
        self.apply(StyleChange::Logo(None))
    }

    /// Apply any finished decodes without blocking.
    pub fn poll_logo(&mut self) -> Result<Option<RenderPass>> {
        let mut pass = None;
        while let Some(decoded) = self.logo.try_next() {
            if let Some(logo) = self.logo.accept(decoded) {
                pass = self.apply(StyleChange::Logo(logo))?;
            }
        }
        Ok(pass)
    }

    /// Block until every outstanding decode has finished, applying the latest.
    pub fn wait_for_logo(&mut self) -> Result<Option<RenderPass>> {
        let mut pass = None;
        while let Some(decoded) = self.logo.next_blocking() {
            if let Some(logo) = self.logo.accept(decoded) {
                pass = self.apply(StyleChange::Logo(logo))?;
            }
        }
        Ok(pass)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Download the current artifact as `<download name>.png`.
    pub fn download(&self) {
        self.renderer.trigger_download(&self.download_name);
    }

    pub fn download_name(&self) -> &str {
        &self.download_name
    }

    /// Save the current artifact to the gallery.
    ///
    /// Returns `None` when nothing has been generated yet.
    pub fn save_to_gallery(&mut self) -> Result<Option<SavedRecord>> {
        if !self.style.is_active() {
            debug!("save ignored, nothing generated");
            return Ok(None);
        }
        let png = self.renderer.export_raster_bytes()?;
        let record = self.gallery.save(&png, self.style.content())?;
        Ok(Some(record))
    }

    // =========================================================================
    // Gallery
    // =========================================================================

    pub fn gallery_view(&self) -> GalleryView {
        view::project(&self.gallery.records(), self.label_chars)
    }

    /// Ask to delete a saved record; `None` if no record has that id.
    pub fn request_delete(&mut self, id: i64) -> Option<&PendingDeletion> {
        let label = self
            .gallery
            .records()
            .into_iter()
            .find(|r| r.id == id)?
            .text;
        Some(self.gallery.request_delete(id, label))
    }

    /// Prompt text for the pending deletion.
    pub fn delete_prompt(&self) -> Option<String> {
        self.gallery
            .pending()
            .map(|p| view::delete_prompt(p, self.prompt_chars))
    }

    pub fn confirm_delete(&mut self) -> Result<Option<i64>> {
        Ok(self.gallery.confirm_delete()?)
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.gallery.cancel_delete()
    }
}
