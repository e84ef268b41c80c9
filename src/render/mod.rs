//! Rendering: from a style snapshot to a raster artifact.
//!
//! | Piece | Role |
//! |---|---|
//! | [`RenderOptions`] | Complete option set handed to an engine on every render |
//! | [`RenderEngine`] | Boundary trait: create, attach, update, export, download |
//! | [`RasterEngine`] | Production engine: `qrcode` matrix painted with `image` |
//! | [`Renderer`] | Adapter owning the single live artifact |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for sizing and module geometry (unit testable)
//! - **Options**: The data structure describing one render
//! - **Engine**: [`RenderEngine`] trait + [`RasterEngine`]
//! - **Renderer**: create-once, update-in-place lifecycle

mod calculations;
pub mod engine;
pub mod options;
pub mod raster_engine;
pub mod renderer;

pub use calculations::effective_size;
pub use engine::{RenderEngine, RenderError};
pub use options::{BackgroundOptions, CornersSquareOptions, DotsOptions, ImageOptions, RenderOptions};
pub use raster_engine::{RasterArtifact, RasterEngine};
pub use renderer::{RenderPass, Renderer};
