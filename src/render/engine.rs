//! Render engine trait and shared error type.
//!
//! The [`RenderEngine`] trait is the boundary to whatever actually encodes
//! and paints a symbol. The rest of the crate treats it as an opaque
//! capability: create an artifact from options, attach it to the display
//! surface, update it in place, export its raster bytes and download it.
//!
//! The production implementation is
//! [`RasterEngine`](super::raster_engine::RasterEngine).

use super::options::RenderOptions;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Content cannot be encoded: {0}")]
    Encode(String),
    #[error("A {width}px canvas cannot hold {modules} modules")]
    CanvasTooSmall { width: u32, modules: u32 },
    #[error("Invalid logo image: {0}")]
    Logo(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Nothing has been rendered yet")]
    NotRendered,
}

/// Trait for render engines.
///
/// An engine owns no artifact itself; the [`Renderer`](super::Renderer)
/// adapter holds the single live artifact and decides between `create` and
/// `update`.
pub trait RenderEngine {
    /// Engine-specific handle for one rendered symbol.
    type Artifact;

    /// Render a new artifact.
    fn create(&self, options: &RenderOptions) -> Result<Self::Artifact, RenderError>;

    /// Attach a freshly created artifact to the display surface.
    fn attach(&self, artifact: &mut Self::Artifact) -> Result<(), RenderError>;

    /// Re-render an existing artifact in place with a complete option set.
    ///
    /// On error the artifact must still hold its previous render.
    fn update(
        &self,
        artifact: &mut Self::Artifact,
        options: &RenderOptions,
    ) -> Result<(), RenderError>;

    /// PNG bytes of the artifact's current render.
    fn raw_data(&self, artifact: &Self::Artifact) -> Result<Vec<u8>, RenderError>;

    /// Write the artifact as `<name>.png`, returning the written path.
    fn download(&self, artifact: &Self::Artifact, name: &str) -> Result<PathBuf, RenderError>;
}
