//! Application configuration.
//!
//! Handles loading, validating, and merging `qrstyle.toml`. Stock defaults are
//! the base layer; a user config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [style]
//! foreground = "#000000"     # Dot and corner color
//! background = "#ffffff"
//! size = 300                 # Requested edge length in pixels
//! dot_pattern = "square"     # square | dots | rounded | classy | classy-rounded | extra-rounded
//! corner_style = "square"    # square | dot | extra-rounded
//!
//! [layout]
//! container_width = 400      # Width of the preview container
//! padding = 40               # Subtracted from the container width when sizing
//! min_size = 100             # Size slider lower bound
//! max_size = 1000            # Size slider upper bound
//!
//! [logo]
//! margin = 5                 # Clear space around the logo, in pixels
//! image_size = 0.4           # Logo size as a fraction of the symbol
//! cross_origin = "anonymous"
//!
//! [gallery]
//! storage_key = "savedQRs"   # Key holding the saved list
//! store_file = "store.json"  # File inside the data directory
//! label_chars = 20           # Label truncation in the gallery list
//! prompt_chars = 18          # Label truncation in the delete prompt
//!
//! [download]
//! name = "my-qr-code"        # Download file name, `.png` is appended
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::{Color, CornerStyle, DotPattern};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `qrstyle.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Initial style applied to a new session.
    pub style: StyleDefaults,
    /// Container sizing.
    pub layout: LayoutConfig,
    /// Logo overlay placement.
    pub logo: LogoConfig,
    /// Saved gallery storage and labels.
    pub gallery: GalleryConfig,
    /// Download naming.
    pub download: DownloadConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if layout.min_size == 0 || layout.min_size > layout.max_size {
            return Err(ConfigError::Validation(
                "layout.min_size must be non-zero and not above layout.max_size".into(),
            ));
        }
        if self.style.size < layout.min_size || self.style.size > layout.max_size {
            return Err(ConfigError::Validation(format!(
                "style.size must be within {}-{}",
                layout.min_size, layout.max_size
            )));
        }
        if !(self.logo.image_size > 0.0 && self.logo.image_size <= 1.0) {
            return Err(ConfigError::Validation(
                "logo.image_size must be in (0, 1]".into(),
            ));
        }
        if self.gallery.storage_key.is_empty() {
            return Err(ConfigError::Validation(
                "gallery.storage_key must not be empty".into(),
            ));
        }
        if self.gallery.label_chars == 0 || self.gallery.prompt_chars == 0 {
            return Err(ConfigError::Validation(
                "gallery label budgets must be non-zero".into(),
            ));
        }
        if self.download.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "download.name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Style a session starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleDefaults {
    pub foreground: Color,
    pub background: Color,
    pub size: u32,
    pub dot_pattern: DotPattern,
    pub corner_style: CornerStyle,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: Color::WHITE,
            size: 300,
            dot_pattern: DotPattern::Square,
            corner_style: CornerStyle::Square,
        }
    }
}

/// Preview container sizing.
///
/// The rendered edge is `min(requested, container_width - padding)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub container_width: u32,
    pub padding: u32,
    pub min_size: u32,
    pub max_size: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            container_width: 400,
            padding: 40,
            min_size: 100,
            max_size: 1000,
        }
    }
}

/// Logo overlay options passed through to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoConfig {
    pub margin: u32,
    pub image_size: f32,
    pub cross_origin: String,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            margin: 5,
            image_size: 0.4,
            cross_origin: "anonymous".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Storage key holding the serialized record list.
    pub storage_key: String,
    /// Store file name inside the data directory.
    pub store_file: String,
    /// Character budget for gallery labels.
    pub label_chars: usize,
    /// Character budget for the delete-confirmation prompt.
    pub prompt_chars: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            storage_key: "savedQRs".to_string(),
            store_file: "store.json".to_string(),
            label_chars: 20,
            prompt_chars: 18,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownloadConfig {
    /// File stem of downloads; the extension is always `png`.
    pub name: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            name: "my-qr-code".to_string(),
        }
    }
}

// =============================================================================
// Config loading: defaults, user overlay, validation
// =============================================================================

/// The built-in settings as a TOML table, the layer a user file is laid over.
pub fn defaults_table() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
}

/// Lay the user's `qrstyle.toml` over `defaults` in place.
///
/// Sections are walked key by key, so `[style] foreground = ...` changes only
/// the foreground and leaves the rest of `[style]` at its default. Any value
/// that is not a section replaces the default outright.
pub fn overlay_onto(defaults: &mut toml::Value, user: toml::Value) {
    match (defaults, user) {
        (toml::Value::Table(section), toml::Value::Table(user_section)) => {
            for (key, value) in user_section {
                match section.get_mut(&key) {
                    Some(existing) => overlay_onto(existing, value),
                    None => {
                        section.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Build the session config from the defaults and an optional user file,
/// rejecting unknown keys and out-of-range values.
pub fn resolve_config(user: Option<toml::Value>) -> Result<AppConfig, ConfigError> {
    let mut value = defaults_table()?;
    if let Some(user) = user {
        overlay_onto(&mut value, user);
    }
    let config: AppConfig = value.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `qrstyle.toml` file.
///
/// A missing file yields the stock defaults; a present file must parse and
/// validate.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `qrstyle.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# qrstyle Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Initial style
# ---------------------------------------------------------------------------
[style]
foreground = "#000000"
background = "#ffffff"
# Requested edge length in pixels (clamped to the container, see [layout]).
size = 300
# square | dots | rounded | classy | classy-rounded | extra-rounded
dot_pattern = "square"
# square | dot | extra-rounded
corner_style = "square"

# ---------------------------------------------------------------------------
# Container sizing: rendered size = min(size, container_width - padding)
# ---------------------------------------------------------------------------
[layout]
container_width = 400
padding = 40
min_size = 100
max_size = 1000

# ---------------------------------------------------------------------------
# Logo overlay
# ---------------------------------------------------------------------------
[logo]
# Clear space around the logo, in pixels.
margin = 5
# Logo edge as a fraction of the symbol edge.
image_size = 0.4
cross_origin = "anonymous"

# ---------------------------------------------------------------------------
# Saved gallery
# ---------------------------------------------------------------------------
[gallery]
storage_key = "savedQRs"
store_file = "store.json"
label_chars = 20
prompt_chars = 18

# ---------------------------------------------------------------------------
# Downloads
# ---------------------------------------------------------------------------
[download]
# Written as <name>.png
name = "my-qr-code"
"##
}
