//! Shared value types used by the style machine, the renderer and the CLI.
//!
//! These are serialized into [`RenderOptions`](crate::render::RenderOptions)
//! and into `qrstyle.toml`, so their string forms are part of the wire
//! format: patterns are kebab-case, colors are lower-case `#rrggbb`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseValueError {
    #[error("invalid color '{0}': expected #rgb or #rrggbb")]
    Color(String),
    #[error("unknown dot pattern '{0}'")]
    DotPattern(String),
    #[error("unknown corner style '{0}'")]
    CornerStyle(String),
}

/// An opaque sRGB color, stored normalised as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 0xff,
        g: 0xff,
        b: 0xff,
    };

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

impl FromStr for Color {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseValueError::Color(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16);
        match hex.len() {
            // #rgb expands each nibble: #f0a → #ff00aa
            3 => {
                let nibble = |i| channel(i, 1).map(|v| v * 17);
                Ok(Color {
                    r: nibble(0).map_err(|_| err())?,
                    g: nibble(1).map_err(|_| err())?,
                    b: nibble(2).map_err(|_| err())?,
                })
            }
            6 => Ok(Color {
                r: channel(0, 2).map_err(|_| err())?,
                g: channel(2, 2).map_err(|_| err())?,
                b: channel(4, 2).map_err(|_| err())?,
            }),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Shape used to paint the data modules of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotPattern {
    #[default]
    Square,
    Dots,
    Rounded,
    Classy,
    ClassyRounded,
    ExtraRounded,
}

impl DotPattern {
    pub const ALL: [DotPattern; 6] = [
        DotPattern::Square,
        DotPattern::Dots,
        DotPattern::Rounded,
        DotPattern::Classy,
        DotPattern::ClassyRounded,
        DotPattern::ExtraRounded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DotPattern::Square => "square",
            DotPattern::Dots => "dots",
            DotPattern::Rounded => "rounded",
            DotPattern::Classy => "classy",
            DotPattern::ClassyRounded => "classy-rounded",
            DotPattern::ExtraRounded => "extra-rounded",
        }
    }
}

impl FromStr for DotPattern {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DotPattern::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseValueError::DotPattern(s.to_string()))
    }
}

impl fmt::Display for DotPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the three finder ("corner square") patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerStyle {
    #[default]
    Square,
    Dot,
    ExtraRounded,
}

impl CornerStyle {
    pub const ALL: [CornerStyle; 3] = [
        CornerStyle::Square,
        CornerStyle::Dot,
        CornerStyle::ExtraRounded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CornerStyle::Square => "square",
            CornerStyle::Dot => "dot",
            CornerStyle::ExtraRounded => "extra-rounded",
        }
    }
}

impl FromStr for CornerStyle {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CornerStyle::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseValueError::CornerStyle(s.to_string()))
    }
}

impl fmt::Display for CornerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which input field `generate` reads its content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    #[default]
    Text,
    Url,
}

/// A self-contained embedded image: `data:<mime>;base64,<payload>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoImage {
    pub data_url: String,
}
