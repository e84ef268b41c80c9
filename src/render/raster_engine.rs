//! Pure Rust raster engine.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Encode content → module matrix | `qrcode::QrCode` (error correction level Q) |
//! | Canvas | `image::RgbaImage` |
//! | Logo decode | `base64` data URL + `image::load_from_memory` |
//! | Logo scale | `image::imageops::resize` with `Lanczos3` filter |
//! | Logo composite | `image::imageops::overlay` |
//! | Export | `image` PNG encoder |
//!
//! Modules are painted as rounded rectangles with per-corner radii; every
//! dot pattern and corner style is a choice of radii. A corner of a data
//! module is only rounded when both neighbours touching that corner are
//! light, so runs of dark modules join into continuous shapes.
//!
//! The display surface is an optional preview file. Attaching writes it
//! once; each later update rewrites the same file.

use super::calculations::{
    ModuleLayout, finder_origins, is_finder_module, logo_fit, module_layout,
};
use super::engine::{RenderEngine, RenderError};
use super::options::RenderOptions;
use crate::data_url;
use crate::types::{Color, CornerStyle, DotPattern};
use image::imageops::FilterType;
use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Corner radii in pixels: top-left, top-right, bottom-right, bottom-left.
type Radii = [f32; 4];

/// Raster engine painting onto an RGBA canvas.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone)]
pub struct RasterEngine {
    download_dir: PathBuf,
    surface: Option<PathBuf>,
}

/// A painted symbol.
#[derive(Debug, Clone)]
pub struct RasterArtifact {
    image: RgbaImage,
    attached: bool,
}

impl RasterArtifact {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl RasterEngine {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            surface: None,
        }
    }

    /// Mirror every render into a preview PNG at `path`.
    pub fn with_surface(mut self, path: impl Into<PathBuf>) -> Self {
        self.surface = Some(path.into());
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn present(&self, artifact: &RasterArtifact) -> Result<(), RenderError> {
        if let Some(path) = &self.surface {
            write_png(&artifact.image, path)?;
        }
        Ok(())
    }
}

impl RenderEngine for RasterEngine {
    type Artifact = RasterArtifact;

    fn create(&self, options: &RenderOptions) -> Result<RasterArtifact, RenderError> {
        Ok(RasterArtifact {
            image: paint(options)?,
            attached: false,
        })
    }

    fn attach(&self, artifact: &mut RasterArtifact) -> Result<(), RenderError> {
        self.present(artifact)?;
        artifact.attached = true;
        Ok(())
    }

    fn update(
        &self,
        artifact: &mut RasterArtifact,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        let next = RasterArtifact {
            image: paint(options)?,
            attached: artifact.attached,
        };
        if next.attached {
            self.present(&next)?;
        }
        *artifact = next;
        Ok(())
    }

    fn raw_data(&self, artifact: &RasterArtifact) -> Result<Vec<u8>, RenderError> {
        encode_png(&artifact.image)
    }

    fn download(&self, artifact: &RasterArtifact, name: &str) -> Result<PathBuf, RenderError> {
        let path = self.download_dir.join(format!("{name}.png"));
        write_png(&artifact.image, &path)?;
        Ok(path)
    }
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

fn write_png(image: &RgbaImage, path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, encode_png(image)?)?;
    Ok(())
}

/// Dark/light module grid.
struct Matrix {
    modules: u32,
    dark: Vec<bool>,
}

impl Matrix {
    fn from_code(code: &QrCode) -> Self {
        Self {
            modules: code.width() as u32,
            dark: code
                .to_colors()
                .into_iter()
                .map(|c| c == qrcode::Color::Dark)
                .collect(),
        }
    }

    /// Out-of-range coordinates read as light.
    fn is_dark(&self, x: i64, y: i64) -> bool {
        let n = self.modules as i64;
        if x < 0 || y < 0 || x >= n || y >= n {
            return false;
        }
        self.dark[(y * n + x) as usize]
    }

    /// Corners whose two touching neighbours are both light: TL, TR, BR, BL.
    fn free_corners(&self, x: u32, y: u32) -> [bool; 4] {
        let (x, y) = (x as i64, y as i64);
        let up = self.is_dark(x, y - 1);
        let down = self.is_dark(x, y + 1);
        let left = self.is_dark(x - 1, y);
        let right = self.is_dark(x + 1, y);
        [!up && !left, !up && !right, !down && !right, !down && !left]
    }
}

/// Pixel rectangle excluded from data modules to make room for a logo.
#[derive(Debug, Clone, Copy)]
struct Clearance {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Clearance {
    fn intersects(&self, x: u32, y: u32, size: u32) -> bool {
        x < self.x1 && x + size > self.x0 && y < self.y1 && y + size > self.y0
    }
}

/// Paint a complete symbol for `options`.
pub fn paint(options: &RenderOptions) -> Result<RgbaImage, RenderError> {
    let code = QrCode::with_error_correction_level(options.data.as_bytes(), EcLevel::Q)
        .map_err(|e| RenderError::Encode(format!("{e:?}")))?;
    let matrix = Matrix::from_code(&code);
    let canvas_edge = options.width.min(options.height);
    let layout = module_layout(canvas_edge, matrix.modules).ok_or(RenderError::CanvasTooSmall {
        width: canvas_edge,
        modules: matrix.modules,
    })?;

    let background = options.background_options.color;
    let mut canvas = RgbaImage::from_pixel(options.width, options.height, Rgba(background.to_rgba()));

    let logo = options
        .image
        .as_deref()
        .map(|url| place_logo(url, options, &layout, matrix.modules))
        .transpose()?;

    let dots = &options.dots_options;
    for y in 0..matrix.modules {
        for x in 0..matrix.modules {
            if is_finder_module(x, y, matrix.modules) || !matrix.is_dark(x as i64, y as i64) {
                continue;
            }
            let px = layout.offset + x * layout.dot;
            let py = layout.offset + y * layout.dot;
            if let Some((_, _, clearance)) = &logo
                && clearance.intersects(px, py, layout.dot)
            {
                continue;
            }
            let radii = dot_radii(dots.kind, matrix.free_corners(x, y), layout.dot as f32);
            fill_rounded(&mut canvas, px, py, layout.dot, layout.dot, radii, dots.color);
        }
    }

    let corners = &options.corners_square_options;
    for (mx, my) in finder_origins(matrix.modules) {
        paint_finder(
            &mut canvas,
            &layout,
            (mx, my),
            corners.kind,
            corners.color,
            background,
        );
    }

    if let Some((image, (lx, ly), _)) = logo {
        image::imageops::overlay(&mut canvas, &image, lx as i64, ly as i64);
    }

    debug!(
        modules = matrix.modules,
        dot = layout.dot,
        width = options.width,
        "painted symbol"
    );
    Ok(canvas)
}

/// Decode, scale and position the logo; returns the scaled image, its
/// top-left pixel and the clearance rectangle (logo plus margin).
fn place_logo(
    url: &str,
    options: &RenderOptions,
    layout: &ModuleLayout,
    modules: u32,
) -> Result<(RgbaImage, (u32, u32), Clearance), RenderError> {
    let (_, bytes) = data_url::decode(url)
        .ok_or_else(|| RenderError::Logo("not a base64 data URL".to_string()))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| RenderError::Logo(e.to_string()))?
        .to_rgba8();

    let symbol_px = layout.symbol_px(modules);
    let (w, h) = logo_fit(
        symbol_px,
        options.image_options.image_size,
        decoded.dimensions(),
    );
    let scaled = image::imageops::resize(&decoded, w, h, FilterType::Lanczos3);

    let x = layout.offset + (symbol_px - w) / 2;
    let y = layout.offset + (symbol_px - h) / 2;
    let margin = options.image_options.margin;
    let clearance = Clearance {
        x0: x.saturating_sub(margin),
        y0: y.saturating_sub(margin),
        x1: x + w + margin,
        y1: y + h + margin,
    };
    Ok((scaled, (x, y), clearance))
}

/// Radii for one data module given which of its corners are free.
fn dot_radii(pattern: DotPattern, free: [bool; 4], dot: f32) -> Radii {
    let when = |i: usize, r: f32| if free[i] { r } else { 0.0 };
    match pattern {
        DotPattern::Square => [0.0; 4],
        DotPattern::Dots => [dot / 2.0; 4],
        DotPattern::Rounded => {
            let r = dot * 0.35;
            [when(0, r), when(1, r), when(2, r), when(3, r)]
        }
        DotPattern::ExtraRounded => {
            let r = dot / 2.0;
            [when(0, r), when(1, r), when(2, r), when(3, r)]
        }
        // Leaf shape: only the top-left and bottom-right corners curve.
        DotPattern::Classy => {
            let r = dot / 2.0;
            [when(0, r), 0.0, when(2, r), 0.0]
        }
        DotPattern::ClassyRounded => {
            let r = dot / 2.0;
            let soft = dot / 4.0;
            [r, when(1, soft), r, when(3, soft)]
        }
    }
}

/// Paint one 7×7 finder pattern: outer ring, cleared gap, 3×3 center.
fn paint_finder(
    canvas: &mut RgbaImage,
    layout: &ModuleLayout,
    origin: (u32, u32),
    style: CornerStyle,
    color: Color,
    background: Color,
) {
    let d = layout.dot;
    let df = d as f32;
    let x = layout.offset + origin.0 * d;
    let y = layout.offset + origin.1 * d;

    let (outer, gap, center) = match style {
        CornerStyle::Square => (0.0, 0.0, 0.0),
        CornerStyle::Dot => (3.5 * df, 2.5 * df, 1.5 * df),
        CornerStyle::ExtraRounded => (2.5 * df, 1.5 * df, df),
    };
    fill_rounded(canvas, x, y, 7 * d, 7 * d, [outer; 4], color);
    fill_rounded(canvas, x + d, y + d, 5 * d, 5 * d, [gap; 4], background);
    fill_rounded(canvas, x + 2 * d, y + 2 * d, 3 * d, 3 * d, [center; 4], color);
}

/// Fill a rectangle whose corners are rounded with the given radii.
///
/// Pixels are sampled at their centers; anything outside the canvas is
/// clipped.
fn fill_rounded(
    canvas: &mut RgbaImage,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    radii: Radii,
    color: Color,
) {
    let pixel = Rgba(color.to_rgba());
    let (left, top) = (x as f32, y as f32);
    let (right, bottom) = (left + w as f32, top + h as f32);
    let x_end = (x + w).min(canvas.width());
    let y_end = (y + h).min(canvas.height());

    for py in y..y_end {
        for px in x..x_end {
            let (fx, fy) = (px as f32 + 0.5, py as f32 + 0.5);
            if inside_rounded(fx, fy, (left, top, right, bottom), radii) {
                canvas.put_pixel(px, py, pixel);
            }
        }
    }
}

fn inside_rounded(fx: f32, fy: f32, rect: (f32, f32, f32, f32), radii: Radii) -> bool {
    let (left, top, right, bottom) = rect;
    let [tl, tr, br, bl] = radii;
    let corners = [
        (left + tl, top + tl, tl, fx < left + tl && fy < top + tl),
        (right - tr, top + tr, tr, fx > right - tr && fy < top + tr),
        (right - br, bottom - br, br, fx > right - br && fy > bottom - br),
        (left + bl, bottom - bl, bl, fx < left + bl && fy > bottom - bl),
    ];
    corners.iter().all(|&(cx, cy, r, in_zone)| {
        !in_zone || r <= 0.0 || (fx - cx).powi(2) + (fy - cy).powi(2) <= r * r
    })
}
