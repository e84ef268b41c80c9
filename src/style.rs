//! The style configuration state machine.
//!
//! ```text
//!          generate (non-empty) + render ok → commit
//!   Idle ──────────────────────────────────────▶ Active ──┐
//!    │  ▲                                          ▲      │ commit / any StyleChange
//!    └──┘ empty input or failed render             └──────┘   → full RenderOptions
//! ```
//!
//! `Idle` means nothing has been committed yet and the style controls are
//! disabled. While `Idle`, style changes are still recorded so that the first
//! `generate` picks them up, but nothing renders. Once `Active`, every change
//! produces a complete [`RenderOptions`] built from the whole current style,
//! never a partial update.
//!
//! Switching the content-source mode or typing into an input never renders.
//! `generate` only builds the options for the active input; the caller
//! renders them and calls `commit` once the render has succeeded, so the
//! machine is never `Active` without a rendered artifact.

use crate::config::{AppConfig, LayoutConfig, LogoConfig};
use crate::render::{
    BackgroundOptions, CornersSquareOptions, DotsOptions, ImageOptions, RenderOptions,
    effective_size,
};
use crate::types::{Color, ContentMode, CornerStyle, DotPattern, LogoImage};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter some text or a URL first")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
}

/// The full set of user-adjustable rendering parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Last committed content; empty until the first generate.
    pub content: String,
    /// Requested edge length, within the slider range.
    pub size_px: u32,
    pub foreground: Color,
    pub background: Color,
    pub dot_pattern: DotPattern,
    pub corner_style: CornerStyle,
    pub logo: Option<LogoImage>,
}

/// One user edit to the style.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleChange {
    Foreground(Color),
    Background(Color),
    Size(u32),
    DotPattern(DotPattern),
    CornerStyle(CornerStyle),
    Logo(Option<LogoImage>),
    /// The preview container was resized.
    ContainerWidth(u32),
}

#[derive(Debug, Clone)]
pub struct StyleMachine {
    phase: Phase,
    mode: ContentMode,
    text_input: String,
    url_input: String,
    style: StyleConfig,
    container_width: u32,
    layout: LayoutConfig,
    logo_options: LogoConfig,
}

impl StyleMachine {
    pub fn new(config: &AppConfig) -> Self {
        let defaults = &config.style;
        Self {
            phase: Phase::Idle,
            mode: ContentMode::Text,
            text_input: String::new(),
            url_input: String::new(),
            style: StyleConfig {
                content: String::new(),
                size_px: defaults.size,
                foreground: defaults.foreground,
                background: defaults.background,
                dot_pattern: defaults.dot_pattern,
                corner_style: defaults.corner_style,
                logo: None,
            },
            container_width: config.layout.container_width,
            layout: config.layout.clone(),
            logo_options: config.logo.clone(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Style controls are usable only once content has been committed.
    pub fn controls_enabled(&self) -> bool {
        self.is_active()
    }

    pub fn mode(&self) -> ContentMode {
        self.mode
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Last committed content.
    pub fn content(&self) -> &str {
        &self.style.content
    }

    pub fn container_width(&self) -> u32 {
        self.container_width
    }

    /// Change which input field `generate` reads. Never renders.
    pub fn switch_mode(&mut self, mode: ContentMode) {
        self.mode = mode;
    }

    /// Replace the text of the active mode's input. Never renders.
    pub fn set_input(&mut self, value: impl Into<String>) {
        match self.mode {
            ContentMode::Text => self.text_input = value.into(),
            ContentMode::Url => self.url_input = value.into(),
        }
    }

    pub fn input(&self) -> &str {
        match self.mode {
            ContentMode::Text => &self.text_input,
            ContentMode::Url => &self.url_input,
        }
    }

    /// Options that would render the active input. Nothing is committed
    /// until [`commit`](Self::commit) is called with them.
    ///
    /// Whitespace-only input is rejected.
    pub fn generate(&self) -> Result<RenderOptions, InputError> {
        let content = self.input().trim();
        if content.is_empty() {
            return Err(InputError::EmptyContent);
        }
        let mut options = self.render_options();
        options.data = content.to_string();
        Ok(options)
    }

    /// Commit content whose render succeeded and become `Active`.
    pub fn commit(&mut self, rendered: &RenderOptions) {
        self.style.content = rendered.data.clone();
        if self.phase == Phase::Idle {
            debug!("style controls enabled");
        }
        self.phase = Phase::Active;
    }

    /// Apply one edit; returns the options to render iff `Active`.
    pub fn apply(&mut self, change: StyleChange) -> Option<RenderOptions> {
        match change {
            StyleChange::Foreground(c) => self.style.foreground = c,
            StyleChange::Background(c) => self.style.background = c,
            StyleChange::Size(px) => {
                self.style.size_px = px.clamp(self.layout.min_size, self.layout.max_size)
            }
            StyleChange::DotPattern(p) => self.style.dot_pattern = p,
            StyleChange::CornerStyle(c) => self.style.corner_style = c,
            StyleChange::Logo(logo) => self.style.logo = logo,
            StyleChange::ContainerWidth(w) => self.container_width = w,
        }
        self.is_active().then(|| self.render_options())
    }

    /// Edge length a render would use right now.
    pub fn rendered_size(&self) -> u32 {
        effective_size(self.style.size_px, self.container_width, self.layout.padding)
    }

    /// Complete options for the current style.
    pub fn render_options(&self) -> RenderOptions {
        let size = self.rendered_size();
        let style = &self.style;
        RenderOptions {
            width: size,
            height: size,
            data: style.content.clone(),
            image: style.logo.as_ref().map(|l| l.data_url.clone()),
            dots_options: DotsOptions {
                color: style.foreground,
                kind: style.dot_pattern,
            },
            background_options: BackgroundOptions {
                color: style.background,
            },
            corners_square_options: CornersSquareOptions {
                kind: style.corner_style,
                color: style.foreground,
            },
            image_options: ImageOptions {
                cross_origin: self.logo_options.cross_origin.clone(),
                margin: self.logo_options.margin,
                image_size: self.logo_options.image_size,
            },
        }
    }
}
