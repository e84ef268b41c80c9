//! The configuration object handed to a render engine.
//!
//! [`RenderOptions`] describes *what* to draw, never *how*. It is always a
//! complete snapshot: the style machine builds a fresh one from every field
//! of the current style on each change, so an engine never sees a partial
//! update. The serialized form uses the camelCase field names common to
//! styled-QR engines (`dotsOptions`, `cornersSquareOptions`, ...).

use crate::types::{Color, CornerStyle, DotPattern};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Content to encode.
    pub data: String,
    /// Optional logo as a `data:` URL.
    pub image: Option<String>,
    pub dots_options: DotsOptions,
    pub background_options: BackgroundOptions,
    pub corners_square_options: CornersSquareOptions,
    pub image_options: ImageOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotsOptions {
    pub color: Color,
    #[serde(rename = "type")]
    pub kind: DotPattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornersSquareOptions {
    #[serde(rename = "type")]
    pub kind: CornerStyle,
    pub color: Color,
}

/// Logo placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    pub cross_origin: String,
    /// Clear space around the logo, in pixels.
    pub margin: u32,
    /// Logo edge as a fraction of the symbol edge.
    pub image_size: f32,
}
