//! Ramadan calendar wallpaper generator
//!
//! Renders a 7-column Ramadan calendar (one card per day with suhoor and
//! iftar times, a header, weekday pills and two dua panels) onto a raster
//! image of any size. Prayer times come from the AlAdhan calendar API, with a
//! deterministic generated schedule when the API cannot be reached.
//!
//! # Pipeline
//!
//! - [`data`] obtains an ordered run of [`DayRecord`]s
//! - [`rendering::layout`] maps canvas size, card settings and the records to geometry
//! - [`rendering::paint`] paints that geometry onto a [`Surface`] display list
//! - [`rendering::raster`] rasterises the surface; [`export`] encodes it
//!
//! # Example
//!
//! ```no_run
//! use ramadan_wallpaper::{data, rendering, ThemeName, WallpaperConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let location = data::locations::resolve(Some("songkhla"), Some("hatyai"));
//! let days = data::offline(&location, &data::RamadanWindow::default()).days;
//! let config = WallpaperConfig::default()
//!     .with_theme(ThemeName::Dark)
//!     .with_location(location.display_name());
//!
//! let shot = rendering::render_png(&config, &days, &rendering::RasterOptions::default())?;
//! std::fs::write("ramadan.png", &shot.data)?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod data;
pub mod export;
pub mod rendering;
pub mod server;
pub mod theme;

pub use data::DayRecord;
pub use rendering::layout::{LayoutConfig, REFERENCE_WIDTH};
pub use rendering::paint::Surface;
pub use theme::{BackgroundConfig, Color, GradientDirection, Theme, ThemeName};

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self { width: 1080, height: 1920 }
    }
}

/// Named canvas sizes offered by the CLI and the query surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CanvasPreset {
    /// 1080×1920 story / reference size
    Story,
    /// 1170×2532
    Iphone,
    /// 1080×2400
    Android,
    /// 1080×1080
    Square,
    /// 2160×3840
    Hd,
}

impl CanvasPreset {
    pub fn size(self) -> CanvasSize {
        let (width, height) = match self {
            CanvasPreset::Story => (1080, 1920),
            CanvasPreset::Iphone => (1170, 2532),
            CanvasPreset::Android => (1080, 2400),
            CanvasPreset::Square => (1080, 1080),
            CanvasPreset::Hd => (2160, 3840),
        };
        CanvasSize { width, height }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        <Self as clap::ValueEnum>::from_str(name, true).ok()
    }
}

/// User-editable strings drawn on the wallpaper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub title: String,
    /// Shown under the title after a pin glyph; also names exported files
    pub location: String,
    /// Seven weekday labels starting on Sunday; anything else uses the built-in set
    pub day_labels: Vec<String>,
    pub dua_suhoor: String,
    pub dua_iftar: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            title: "Ramadan 2026".to_string(),
            location: "HATYAI".to_string(),
            day_labels: data::WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect(),
            dua_suhoor: "وَيْتُ صَوْمَ غَدٍ عَنْ أَدَاءِ فَرْضِ شَهْرِ رَمَضَانَ هٰذِهِ السَّنَةِ لِلّٰهِ تَعَالَ".to_string(),
            dua_iftar: "اللّٰهُمَّ لَكَ صُمْتُ وَبِكَ آمَنْتُ وَعَلَيْكَ تَوَكَّلْتُ وَعَلَى رِزْقِكَ أَفْطَرْتُ".to_string(),
        }
    }
}

impl TextConfig {
    /// The configured weekday labels when there are exactly seven non-empty
    /// ones, otherwise the built-in set.
    pub fn weekday_labels(&self) -> Vec<&str> {
        let labels: Vec<&str> = self.day_labels.iter().map(|s| s.trim()).collect();
        if labels.len() == 7 && labels.iter().all(|l| !l.is_empty()) {
            labels
        } else {
            data::WEEKDAY_LABELS.to_vec()
        }
    }
}

/// Day card appearance and grid geometry. Lengths are in reference-width
/// pixels (see [`REFERENCE_WIDTH`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub color: Color,
    pub opacity: f32,
    /// Corner radius as a fraction of card height
    pub radius: f32,
    pub show_icons: bool,
    pub height: f32,
    /// Vertical gap between rows
    pub gap: f32,
    /// Left and right margin of the grid
    pub margin_x: f32,
    /// Vertical shift of the whole grid
    pub offset_y: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            color: theme::PASTEL.card_color,
            opacity: 0.9,
            radius: 0.35,
            show_icons: true,
            height: 155.0,
            gap: 8.0,
            margin_x: 28.0,
            offset_y: 0.0,
        }
    }
}

/// Font families (CSS `font-family` lists) and reference-width sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Big day number
    pub ramadan: String,
    /// Times, month, labels
    pub body: String,
    pub title: String,
    pub num_size: f32,
    pub time_size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            ramadan: "'Fredoka One', cursive".to_string(),
            body: "'Noto Sans Thai', sans-serif".to_string(),
            title: "'Fredoka One', cursive".to_string(),
            num_size: 48.0,
            time_size: 16.0,
        }
    }
}

/// Complete, immutable description of one wallpaper.
///
/// Edits go through the `with_*` methods, which return a new snapshot.
///
/// ```
/// let cfg = ramadan_wallpaper::WallpaperConfig::default();
/// assert_eq!(cfg.canvas.width, 1080);
/// assert_eq!(cfg.theme, ramadan_wallpaper::ThemeName::Pastel);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallpaperConfig {
    pub canvas: CanvasSize,
    pub theme: ThemeName,
    pub text: TextConfig,
    pub background: BackgroundConfig,
    /// Faint decorative arcs in two corners
    pub show_geometric: bool,
    pub card: CardConfig,
    pub font: FontConfig,
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            theme: ThemeName::Pastel,
            text: TextConfig::default(),
            background: BackgroundConfig::default(),
            show_geometric: true,
            card: CardConfig::default(),
            font: FontConfig::default(),
        }
    }
}

impl WallpaperConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).map_err(|e| Error::ConfigError(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(Error::ConfigError(format!(
                "canvas must be positive, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        Ok(())
    }

    pub fn active_theme(&self) -> &'static Theme {
        self.theme.theme()
    }

    /// Switch theme. The theme's background gradient stops and card colour
    /// are copied over the current ones; later edits to those fields do not
    /// flow back into the theme.
    pub fn with_theme(self, name: ThemeName) -> Self {
        let theme = name.theme();
        Self {
            theme: name,
            background: self.background.with_theme(theme),
            card: CardConfig { color: theme.card_color, ..self.card },
            ..self
        }
    }

    pub fn with_canvas(self, width: u32, height: u32) -> Self {
        Self { canvas: CanvasSize { width, height }, ..self }
    }

    pub fn with_location(self, location: impl Into<String>) -> Self {
        Self { text: TextConfig { location: location.into(), ..self.text }, ..self }
    }

    pub fn with_background(self, background: BackgroundConfig) -> Self {
        Self { background, ..self }
    }

    pub fn with_card(self, card: CardConfig) -> Self {
        Self { card, ..self }
    }

    /// Geometry-relevant subset consumed by the layout engine.
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            card_height: self.card.height,
            card_gap: self.card.gap,
            margin_x: self.card.margin_x,
            offset_y: self.card.offset_y,
            card_radius: self.card.radius,
            num_size: self.font.num_size,
            time_size: self.font.time_size,
            show_icons: self.card.show_icons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WallpaperConfig::default();
        assert_eq!(config.canvas, CanvasSize { width: 1080, height: 1920 });
        assert_eq!(config.card.height, 155.0);
        assert_eq!(config.text.weekday_labels(), data::WEEKDAY_LABELS.to_vec());
        assert!(config.show_geometric);
    }

    #[test]
    fn theme_switch_copies_colours_without_residue() {
        let edited = WallpaperConfig::default().with_card(CardConfig {
            color: Color::rgb(1, 2, 3),
            ..CardConfig::default()
        });
        let dark = edited.with_theme(ThemeName::Dark);
        assert_eq!(dark.card.color, theme::DARK.card_color);
        assert_eq!(
            dark.background,
            BackgroundConfig::Gradient {
                color1: theme::DARK.bg1,
                color2: theme::DARK.bg2,
                direction: GradientDirection::Vertical,
            }
        );
        let minimal = dark.with_theme(ThemeName::Minimal);
        assert_eq!(minimal.card.color, theme::MINIMAL.card_color);
        assert_eq!(minimal.theme, ThemeName::Minimal);
    }

    #[test]
    fn theme_switch_leaves_geometry_alone() {
        let before = WallpaperConfig::default().with_card(CardConfig { gap: 0.0, ..CardConfig::default() });
        let after = before.clone().with_theme(ThemeName::Dark);
        assert_eq!(before.layout_config(), after.layout_config());
    }

    #[test]
    fn bad_weekday_labels_fall_back() {
        let mut text = TextConfig::default();
        text.day_labels = vec![];
        assert_eq!(text.weekday_labels().len(), 7);
        text.day_labels = vec!["S".into(); 6];
        assert_eq!(text.weekday_labels(), data::WEEKDAY_LABELS.to_vec());
        text.day_labels = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"].iter().map(|s| s.to_string()).collect();
        assert_eq!(text.weekday_labels()[4], "Th");
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let cfg = WallpaperConfig::from_toml_str(
            r##"
theme = "dark"
show_geometric = false

[canvas]
width = 2160
height = 3840

[card]
gap = 0.0
color = "#112233"

[background]
type = "pattern"
color = "#c9a96e"
opacity = 0.2
"##,
        )
        .unwrap();
        assert_eq!(cfg.theme, ThemeName::Dark);
        assert_eq!(cfg.canvas.width, 2160);
        assert_eq!(cfg.card.gap, 0.0);
        assert_eq!(cfg.card.height, 155.0);
        assert_eq!(cfg.card.color, Color::rgb(0x11, 0x22, 0x33));
        assert!(matches!(cfg.background, BackgroundConfig::Pattern { opacity, .. } if opacity == 0.2));
        assert_eq!(cfg.text.title, "Ramadan 2026");
    }

    #[test]
    fn zero_canvas_is_rejected() {
        let err = WallpaperConfig::from_toml_str("[canvas]\nwidth = 0\nheight = 100").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn presets_resolve_by_name() {
        assert_eq!(CanvasPreset::from_name("HD").map(CanvasPreset::size), Some(CanvasSize { width: 2160, height: 3840 }));
        assert_eq!(CanvasPreset::from_name("poster"), None);
    }
}
