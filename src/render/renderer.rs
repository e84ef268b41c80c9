//! The renderer adapter: owner of the single live artifact.
//!
//! The first render creates the artifact and attaches it to the display
//! surface. Every later render updates that same artifact in place and never
//! attaches again. [`Renderer::reset`] is the only way back to a fresh
//! create.
//!
//! Rendering is synchronous, so [`Renderer::export_raster_bytes`] always sees
//! the most recently completed render; there is no in-flight render to race.

use super::engine::{RenderEngine, RenderError};
use super::options::RenderOptions;
use tracing::{debug, info, warn};

/// What a call to [`Renderer::ensure_rendered`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    Created,
    Updated,
}

pub struct Renderer<E: RenderEngine> {
    engine: E,
    artifact: Option<E::Artifact>,
}

impl<E: RenderEngine> Renderer<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            artifact: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn artifact(&self) -> Option<&E::Artifact> {
        self.artifact.as_ref()
    }

    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    /// Render `options`, creating the artifact on first use.
    ///
    /// A failed update leaves the previous render in place.
    pub fn ensure_rendered(&mut self, options: &RenderOptions) -> Result<RenderPass, RenderError> {
        match self.artifact.as_mut() {
            Some(artifact) => {
                self.engine.update(artifact, options)?;
                debug!(width = options.width, "updated artifact in place");
                Ok(RenderPass::Updated)
            }
            None => {
                let mut artifact = self.engine.create(options)?;
                self.engine.attach(&mut artifact)?;
                self.artifact = Some(artifact);
                debug!(width = options.width, "created and attached artifact");
                Ok(RenderPass::Created)
            }
        }
    }

    /// PNG bytes of the latest render.
    pub fn export_raster_bytes(&self) -> Result<Vec<u8>, RenderError> {
        let artifact = self.artifact.as_ref().ok_or(RenderError::NotRendered)?;
        self.engine.raw_data(artifact)
    }

    /// Write `<name>.png`. Fire-and-forget: failures are logged, not returned.
    pub fn trigger_download(&self, name: &str) {
        let Some(artifact) = &self.artifact else {
            debug!("download requested before anything was rendered");
            return;
        };
        match self.engine.download(artifact, name) {
            Ok(path) => info!(path = %path.display(), "downloaded"),
            Err(e) => warn!("download failed: {e}"),
        }
    }

    /// Drop the artifact so the next render creates and attaches anew.
    pub fn reset(&mut self) {
        self.artifact = None;
    }
}
