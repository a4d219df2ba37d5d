//! Colours, the built-in theme table and background configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Opaque sRGB colour. Translucency is carried separately as an opacity on
/// each paint command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(Error::ConfigError(format!("invalid colour {:?}", s))),
        };
        let v = u32::from_str_radix(&expanded, 16)
            .map_err(|_| Error::ConfigError(format!("invalid colour {:?}", s)))?;
        Ok(Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Pastel,
    Dark,
    Minimal,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Pastel, ThemeName::Dark, ThemeName::Minimal];

    pub fn theme(self) -> &'static Theme {
        match self {
            ThemeName::Pastel => &PASTEL,
            ThemeName::Dark => &DARK,
            ThemeName::Minimal => &MINIMAL,
        }
    }
}

impl FromStr for ThemeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pastel" => Ok(ThemeName::Pastel),
            "dark" => Ok(ThemeName::Dark),
            "minimal" => Ok(ThemeName::Minimal),
            other => Err(Error::ConfigError(format!("unknown theme {:?}", other))),
        }
    }
}

/// Immutable colour and glyph bundle. Exactly one is active per render.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: ThemeName,
    pub bg1: Color,
    pub bg2: Color,
    /// Title gradient, left to right
    pub title_colors: [Color; 2],
    pub location_color: Color,
    pub card_color: Color,
    pub card_text_color: Color,
    pub time_color: Color,
    pub header_day_bg: Color,
    pub header_day_color: Color,
    pub dua_bg: Color,
    pub dua_text: Color,
    pub pattern_color: Color,
    pub accent: Color,
    pub moon_icon: &'static str,
    pub sun_icon: &'static str,
    pub star_icon: &'static str,
}

pub static PASTEL: Theme = Theme {
    name: ThemeName::Pastel,
    bg1: Color::rgb(0xfd, 0xe8, 0xf0),
    bg2: Color::rgb(0xfd, 0xf6, 0xe3),
    title_colors: [Color::rgb(0xe0, 0x7d, 0xa0), Color::rgb(0xc9, 0xa9, 0x6e)],
    location_color: Color::rgb(0xb0, 0x58, 0x70),
    card_color: Color::rgb(0xf9, 0xc8, 0xd8),
    card_text_color: Color::rgb(0x3d, 0x2c, 0x35),
    time_color: Color::rgb(0x5a, 0x30, 0x40),
    header_day_bg: Color::rgb(0x8b, 0x60, 0x60),
    header_day_color: Color::WHITE,
    dua_bg: Color::rgb(0xff, 0xf0, 0xf5),
    dua_text: Color::rgb(0x5a, 0x30, 0x40),
    pattern_color: Color::rgb(0xc9, 0xa9, 0x6e),
    accent: Color::rgb(0xe0, 0x7d, 0xa0),
    moon_icon: "🌙",
    sun_icon: "☀️",
    star_icon: "✨",
};

pub static DARK: Theme = Theme {
    name: ThemeName::Dark,
    bg1: Color::rgb(0x0d, 0x1b, 0x2a),
    bg2: Color::rgb(0x1a, 0x1a, 0x2e),
    title_colors: [Color::rgb(0xc9, 0xa9, 0x6e), Color::rgb(0xe8, 0xd5, 0xa0)],
    location_color: Color::rgb(0xa8, 0x95, 0x6a),
    card_color: Color::rgb(0x1e, 0x2d, 0x42),
    card_text_color: Color::rgb(0xe8, 0xd5, 0xb0),
    time_color: Color::rgb(0xc9, 0xa9, 0x6e),
    header_day_bg: Color::rgb(0xc9, 0xa9, 0x6e),
    header_day_color: Color::rgb(0x0d, 0x1b, 0x2a),
    dua_bg: Color::rgb(0x16, 0x22, 0x36),
    dua_text: Color::rgb(0xc9, 0xa9, 0x6e),
    pattern_color: Color::rgb(0xc9, 0xa9, 0x6e),
    accent: Color::rgb(0xc9, 0xa9, 0x6e),
    moon_icon: "🌙",
    sun_icon: "⭐",
    star_icon: "✨",
};

pub static MINIMAL: Theme = Theme {
    name: ThemeName::Minimal,
    bg1: Color::WHITE,
    bg2: Color::rgb(0xf8, 0xf4, 0xef),
    title_colors: [Color::rgb(0x33, 0x33, 0x33), Color::rgb(0x66, 0x66, 0x66)],
    location_color: Color::rgb(0x55, 0x55, 0x55),
    card_color: Color::rgb(0xf5, 0xf0, 0xea),
    card_text_color: Color::rgb(0x33, 0x33, 0x33),
    time_color: Color::rgb(0x55, 0x55, 0x55),
    header_day_bg: Color::rgb(0x33, 0x33, 0x33),
    header_day_color: Color::WHITE,
    dua_bg: Color::rgb(0xf0, 0xec, 0xe6),
    dua_text: Color::rgb(0x44, 0x44, 0x44),
    pattern_color: Color::rgb(0xcc, 0xbb, 0xaa),
    accent: Color::rgb(0x8b, 0x73, 0x55),
    moon_icon: "🌙",
    sun_icon: "☀️",
    star_icon: "★",
};

/// Axis of a two-stop background gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    #[default]
    Vertical,
    Horizontal,
    Diagonal,
}

/// Decoded background bitmap, kept as PNG bytes for embedding.
///
/// Deserialises from a file path.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PathBuf", into = "PathBuf")]
pub struct BackgroundImage {
    pub width: u32,
    pub height: u32,
    png: Arc<[u8]>,
    origin: PathBuf,
}

impl BackgroundImage {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let mut img = Self::from_bytes(&bytes)?;
        img.origin = path.to_path_buf();
        Ok(img)
    }

    /// Decode any format the `image` crate was built with and re-encode as PNG.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| Error::ConfigError(format!("unreadable background image: {}", e)))?;
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| Error::ConfigError(format!("failed to re-encode background image: {}", e)))?;
        Ok(Self {
            width: img.width(),
            height: img.height(),
            png: png.into(),
            origin: PathBuf::new(),
        })
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("origin", &self.origin)
            .finish()
    }
}

impl TryFrom<PathBuf> for BackgroundImage {
    type Error = Error;

    fn try_from(path: PathBuf) -> Result<Self> {
        BackgroundImage::load(path)
    }
}

impl From<BackgroundImage> for PathBuf {
    fn from(img: BackgroundImage) -> Self {
        img.origin
    }
}

fn default_overlay_opacity() -> f32 {
    0.3
}

fn default_pattern_opacity() -> f32 {
    0.15
}

/// Background fill, one variant per kind, each with only the fields it uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundConfig {
    Gradient {
        color1: Color,
        color2: Color,
        #[serde(default)]
        direction: GradientDirection,
    },
    /// Cover-fitted bitmap under a translucent tint
    Image {
        image: BackgroundImage,
        #[serde(default = "default_overlay_opacity")]
        overlay_opacity: f32,
    },
    /// Theme gradient with a tiled star motif on top
    Pattern {
        color: Color,
        #[serde(default = "default_pattern_opacity")]
        opacity: f32,
        #[serde(default)]
        direction: GradientDirection,
    },
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        BackgroundConfig::Gradient {
            color1: PASTEL.bg1,
            color2: PASTEL.bg2,
            direction: GradientDirection::Vertical,
        }
    }
}

impl BackgroundConfig {
    /// Copy `theme`'s gradient stops into a gradient background. Other
    /// variants are returned unchanged: images have no stops and patterns
    /// always borrow the active theme's.
    pub fn with_theme(self, theme: &Theme) -> Self {
        match self {
            BackgroundConfig::Gradient { direction, .. } => BackgroundConfig::Gradient {
                color1: theme.bg1,
                color2: theme.bg2,
                direction,
            },
            other => other,
        }
    }
}
