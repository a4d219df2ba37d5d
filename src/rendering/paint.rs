//! Display list and the painter that fills it from a [`Layout`].
//!
//! Painting is a pure function of layout, days, theme and config. The
//! resulting [`Surface`] can be inspected in tests, fingerprinted, or handed
//! to [`super::raster`] for pixels.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::layout::{star_outline, Circle, DayCell, DuaBox, Layout, LegendCell, Point, Rect};
use crate::data::DayRecord;
use crate::theme::{BackgroundConfig, Color, Theme};
use crate::WallpaperConfig;

/// Tint laid over photo backgrounds so text stays readable.
pub const IMAGE_TINT: Color = Color::rgb(0xfd, 0xe8, 0xf0);
const CARD_SHADOW: Color = Color::rgb(180, 80, 120);
const CARD_SHADOW_OPACITY: f32 = 0.18;
const HALO_OPACITY: f32 = 0.12;
const GLOW_OPACITY: f32 = 0.15;
const DIVIDER_OPACITY: f32 = 0.2;
const ARC_OPACITY: f32 = 0.07;
const LEGEND_OPACITY: f32 = 0.5;
const DUA_OPACITY: f32 = 0.88;
const BADGE_OPACITY: f32 = 0.9;

const LEGEND_SUHOOR: &str = "ซูฮูร";
const LEGEND_IFTAR: &str = "มัฆริบ";
const BADGE_SUHOOR: &str = "เนียต ซูฮูร";
const BADGE_IFTAR: &str = "ดุอาอ์ ละหมาด";
const DUA_ORNAMENT: &str = "✦ ✦ ✦";
const UI_FONT: &str = "'Noto Sans Thai', sans-serif";
const DUA_FONT: &str = "'Libre Baskerville', serif";
const SYMBOL_FONT: &str = "sans-serif";

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Two-stop gradient along `from -> to` in canvas coordinates
    LinearGradient { from: Point, to: Point, stops: [Color; 2] },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub opacity: f32,
    pub blur: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Which part of the line sits on the anchor's y coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Alphabetic,
    Top,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub family: String,
    pub anchor: TextAnchor,
    pub baseline: Baseline,
    pub rtl: bool,
}

impl TextStyle {
    fn new(size: f32, family: &str) -> Self {
        Self {
            size,
            bold: false,
            family: family.to_string(),
            anchor: TextAnchor::Start,
            baseline: Baseline::Alphabetic,
            rtl: false,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    fn rtl(mut self) -> Self {
        self.rtl = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Rect {
        rect: Rect,
        fill: Paint,
        opacity: f32,
    },
    RoundedRect {
        rect: Rect,
        /// Already clamped to half the shorter side
        radius: f32,
        fill: Paint,
        opacity: f32,
        shadow: Option<Shadow>,
    },
    Circle {
        circle: Circle,
        fill: Option<Paint>,
        stroke: Option<Stroke>,
        opacity: f32,
    },
    Polygon {
        points: Vec<Point>,
        stroke: Stroke,
        opacity: f32,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
        opacity: f32,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
        fill: Paint,
        opacity: f32,
        /// Gaussian blur radius, for glows
        blur: Option<f32>,
    },
    Image {
        rect: Rect,
        png: Arc<[u8]>,
    },
}

/// Ordered display list for one canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    commands: Vec<PaintCommand>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, cmd: PaintCommand) {
        self.commands.push(cmd);
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// SHA-256 of the SVG serialisation, hex encoded. Stable across runs
    /// and independent of installed fonts.
    pub fn fingerprint(&self) -> String {
        let svg = super::raster::to_svg(self);
        hex::encode(Sha256::digest(svg.as_bytes()))
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: Paint, opacity: f32, shadow: Option<Shadow>) {
        let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        self.push(PaintCommand::RoundedRect { rect, radius, fill, opacity, shadow });
    }

    fn text(&mut self, text: impl Into<String>, at: Point, style: TextStyle, color: Color) {
        self.push(PaintCommand::Text {
            text: text.into(),
            at,
            style,
            fill: Paint::Solid(color),
            opacity: 1.0,
            blur: None,
        });
    }
}

/// Paint a full wallpaper onto `surface`, replacing whatever it held.
///
/// Order: background, optional arcs, header, weekday row, grid, dua panels.
pub fn render(surface: &mut Surface, layout: &Layout, days: &[DayRecord], theme: &Theme, config: &WallpaperConfig) {
    surface.clear();
    surface.width = layout.width;
    surface.height = layout.height;

    paint_background(surface, layout, theme, &config.background);
    if config.show_geometric {
        paint_arcs(surface, layout, theme);
    }
    paint_header(surface, layout, theme, config);
    paint_weekdays(surface, layout, theme, config);
    if let Some(grid) = &layout.grid {
        if let Some(legend) = &grid.legend {
            paint_legend(surface, legend, theme, config);
        }
        for (cell, day) in grid.cells.iter().zip(days) {
            paint_card(surface, cell, day, theme, config);
        }
    }
    for (dua, (label, text)) in layout.duas.iter().zip([
        (BADGE_SUHOOR, &config.text.dua_suhoor),
        (BADGE_IFTAR, &config.text.dua_iftar),
    ]) {
        paint_dua(surface, dua, label, text, theme);
    }
}

fn full_canvas(layout: &Layout) -> Rect {
    Rect::new(0.0, 0.0, layout.width as f32, layout.height as f32)
}

fn paint_background(surface: &mut Surface, layout: &Layout, theme: &Theme, background: &BackgroundConfig) {
    match background {
        BackgroundConfig::Image { image, overlay_opacity } => {
            surface.push(PaintCommand::Image {
                rect: layout.cover_rect(image.width, image.height),
                png: Arc::from(image.png_bytes()),
            });
            surface.push(PaintCommand::Rect {
                rect: full_canvas(layout),
                fill: Paint::Solid(IMAGE_TINT),
                opacity: *overlay_opacity,
            });
        }
        BackgroundConfig::Gradient { color1, color2, direction } => {
            let (from, to) = layout.gradient_axis(*direction);
            surface.push(PaintCommand::Rect {
                rect: full_canvas(layout),
                fill: Paint::LinearGradient { from, to, stops: [*color1, *color2] },
                opacity: 1.0,
            });
        }
        BackgroundConfig::Pattern { color, opacity, direction } => {
            let (from, to) = layout.gradient_axis(*direction);
            surface.push(PaintCommand::Rect {
                rect: full_canvas(layout),
                fill: Paint::LinearGradient { from, to, stops: [theme.bg1, theme.bg2] },
                opacity: 1.0,
            });
            let pattern = layout.pattern();
            let stroke = Stroke { color: *color, width: pattern.stroke_width };
            for center in pattern.centers {
                surface.push(PaintCommand::Polygon {
                    points: star_outline(center, pattern.star_radius),
                    stroke,
                    opacity: *opacity,
                });
            }
        }
    }
}

fn paint_arcs(surface: &mut Surface, layout: &Layout, theme: &Theme) {
    let stroke = Stroke { color: theme.pattern_color, width: layout.decorations.stroke_width };
    for arc in &layout.decorations.arcs {
        surface.push(PaintCommand::Circle { circle: *arc, fill: None, stroke: Some(stroke), opacity: ARC_OPACITY });
    }
}

fn paint_header(surface: &mut Surface, layout: &Layout, theme: &Theme, config: &WallpaperConfig) {
    let h = &layout.header;
    surface.push(PaintCommand::Circle {
        circle: h.halo,
        fill: Some(Paint::Solid(theme.accent)),
        stroke: None,
        opacity: HALO_OPACITY,
    });

    let title_style = TextStyle::new(h.title_size, &config.font.title).bold().anchor(TextAnchor::Middle);
    surface.push(PaintCommand::Text {
        text: config.text.title.clone(),
        at: h.title,
        style: title_style.clone(),
        fill: Paint::Solid(theme.title_colors[0]),
        opacity: GLOW_OPACITY,
        blur: Some(h.glow_blur),
    });
    surface.push(PaintCommand::Text {
        text: config.text.title.clone(),
        at: h.title,
        style: title_style,
        fill: Paint::LinearGradient {
            from: h.title_gradient.0,
            to: h.title_gradient.1,
            stops: theme.title_colors,
        },
        opacity: 1.0,
        blur: None,
    });

    surface.text(
        format!("📍 {}", config.text.location),
        h.location,
        TextStyle::new(h.location_size, UI_FONT).anchor(TextAnchor::Middle),
        theme.location_color,
    );

    surface.push(PaintCommand::Line {
        from: h.divider.0,
        to: h.divider.1,
        stroke: Stroke { color: theme.accent, width: h.divider_width },
        opacity: DIVIDER_OPACITY,
    });
}

fn paint_weekdays(surface: &mut Surface, layout: &Layout, theme: &Theme, config: &WallpaperConfig) {
    let labels = config.text.weekday_labels();
    let style = TextStyle::new(layout.weekdays.font_size, UI_FONT)
        .bold()
        .anchor(TextAnchor::Middle)
        .baseline(Baseline::Middle);
    for (pill, label) in layout.weekdays.pills.iter().zip(labels) {
        surface.rounded_rect(pill.rect, pill.radius, Paint::Solid(theme.header_day_bg), 1.0, None);
        surface.text(label, pill.label, style.clone(), theme.header_day_color);
    }
}

fn paint_legend(surface: &mut Surface, legend: &LegendCell, theme: &Theme, config: &WallpaperConfig) {
    surface.rounded_rect(legend.rect, legend.radius, Paint::Solid(config.card.color), LEGEND_OPACITY, None);
    let style = TextStyle::new(legend.font_size, UI_FONT).bold().anchor(TextAnchor::Middle);
    surface.text(LEGEND_SUHOOR, legend.suhoor_line, style.clone(), theme.time_color);
    surface.text(LEGEND_IFTAR, legend.iftar_line, style, theme.time_color);
}

fn paint_card(surface: &mut Surface, cell: &DayCell, day: &DayRecord, theme: &Theme, config: &WallpaperConfig) {
    let shadow = Shadow {
        color: CARD_SHADOW,
        opacity: CARD_SHADOW_OPACITY,
        blur: cell.shadow_blur,
        offset_y: cell.shadow_offset_y,
    };
    surface.rounded_rect(cell.rect, cell.radius, Paint::Solid(config.card.color), config.card.opacity, Some(shadow));

    let c = &cell.content;
    surface.text(
        day.ramadan_day.to_string(),
        c.number,
        TextStyle::new(c.number_size, &config.font.ramadan).bold().baseline(Baseline::Top),
        theme.card_text_color,
    );
    surface.text(
        day.date.to_string(),
        c.date,
        TextStyle::new(c.date_size, &config.font.body)
            .bold()
            .anchor(TextAnchor::End)
            .baseline(Baseline::Top),
        theme.accent,
    );
    surface.text(
        day.month.clone(),
        c.month,
        TextStyle::new(c.month_size, &config.font.body)
            .anchor(TextAnchor::End)
            .baseline(Baseline::Top),
        theme.time_color,
    );

    let time_style = TextStyle::new(c.time_size, &config.font.body).bold();
    let rows = [
        (theme.moon_icon, day.suhoor_time(), c.suhoor_baseline),
        (theme.sun_icon, day.iftar_time(), c.iftar_baseline),
    ];
    for (icon, time, baseline) in rows {
        if let Some(icon_x) = c.icon_x {
            surface.text(icon, Point::new(icon_x, baseline), TextStyle::new(c.icon_size, SYMBOL_FONT), theme.time_color);
        }
        surface.text(time, Point::new(c.time_x, baseline), time_style.clone(), theme.time_color);
    }
}

fn paint_dua(surface: &mut Surface, dua: &DuaBox, label: &str, text: &str, theme: &Theme) {
    surface.rounded_rect(dua.panel, dua.radius, Paint::Solid(theme.dua_bg), DUA_OPACITY, None);
    surface.rounded_rect(dua.badge, dua.badge_radius, Paint::Solid(theme.accent), BADGE_OPACITY, None);
    surface.text(
        label,
        dua.badge_label,
        TextStyle::new(dua.badge_font_size, UI_FONT).bold().baseline(Baseline::Middle),
        Color::WHITE,
    );
    surface.text(
        text,
        dua.text,
        TextStyle::new(dua.text_size, DUA_FONT).anchor(TextAnchor::Middle).rtl(),
        theme.dua_text,
    );
    surface.text(
        DUA_ORNAMENT,
        dua.ornament,
        TextStyle::new(dua.ornament_size, SYMBOL_FONT).anchor(TextAnchor::End),
        theme.accent,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fallback::{generate, FallbackParams};
    use crate::rendering::layout::compute_layout;
    use crate::theme::{GradientDirection, ThemeName};

    fn paint(config: &WallpaperConfig, days: &[DayRecord]) -> Surface {
        let first = days.first().map(|d| d.day_of_week_index as usize).unwrap_or(0);
        let layout = compute_layout(&config.layout_config(), days.len(), first);
        let mut s = Surface::new(0, 0);
        render(&mut s, &layout, days, config.active_theme(), config);
        s
    }

    fn scale_point(p: Point, k: f32) -> Point {
        Point::new(p.x * k, p.y * k)
    }

    fn scale_rect(r: Rect, k: f32) -> Rect {
        Rect::new(r.x * k, r.y * k, r.width * k, r.height * k)
    }

    fn scale_paint(p: &Paint, k: f32) -> Paint {
        match p {
            Paint::Solid(c) => Paint::Solid(*c),
            Paint::LinearGradient { from, to, stops } => Paint::LinearGradient {
                from: scale_point(*from, k),
                to: scale_point(*to, k),
                stops: *stops,
            },
        }
    }

    fn scaled(cmd: &PaintCommand, k: f32) -> PaintCommand {
        match cmd.clone() {
            PaintCommand::Rect { rect, fill, opacity } => PaintCommand::Rect {
                rect: scale_rect(rect, k),
                fill: scale_paint(&fill, k),
                opacity,
            },
            PaintCommand::RoundedRect { rect, radius, fill, opacity, shadow } => PaintCommand::RoundedRect {
                rect: scale_rect(rect, k),
                radius: radius * k,
                fill: scale_paint(&fill, k),
                opacity,
                shadow: shadow.map(|s| Shadow { blur: s.blur * k, offset_y: s.offset_y * k, ..s }),
            },
            PaintCommand::Circle { circle, fill, stroke, opacity } => PaintCommand::Circle {
                circle: Circle { center: scale_point(circle.center, k), radius: circle.radius * k },
                fill: fill.map(|f| scale_paint(&f, k)),
                stroke: stroke.map(|s| Stroke { width: s.width * k, ..s }),
                opacity,
            },
            PaintCommand::Polygon { points, stroke, opacity } => PaintCommand::Polygon {
                points: points.into_iter().map(|p| scale_point(p, k)).collect(),
                stroke: Stroke { width: stroke.width * k, ..stroke },
                opacity,
            },
            PaintCommand::Line { from, to, stroke, opacity } => PaintCommand::Line {
                from: scale_point(from, k),
                to: scale_point(to, k),
                stroke: Stroke { width: stroke.width * k, ..stroke },
                opacity,
            },
            PaintCommand::Text { text, at, style, fill, opacity, blur } => PaintCommand::Text {
                text,
                at: scale_point(at, k),
                style: TextStyle { size: style.size * k, ..style },
                fill: scale_paint(&fill, k),
                opacity,
                blur: blur.map(|b| b * k),
            },
            PaintCommand::Image { rect, png } => PaintCommand::Image { rect: scale_rect(rect, k), png },
        }
    }

    #[test]
    fn doubling_the_canvas_doubles_every_length() {
        let days = generate(&FallbackParams::default());
        let small = WallpaperConfig::default();
        let big = small.clone().with_canvas(2160, 3840);
        let a = paint(&small, &days);
        let b = paint(&big, &days);
        assert_eq!(a.commands().len(), b.commands().len());
        for (x, y) in a.commands().iter().zip(b.commands()) {
            assert_eq!(&scaled(x, 2.0), y);
        }
    }

    #[test]
    fn doubling_holds_for_pattern_backgrounds() {
        let days = generate(&FallbackParams::default());
        let small = WallpaperConfig::default().with_background(BackgroundConfig::Pattern {
            color: Color::rgb(0x22, 0x44, 0x66),
            opacity: 0.2,
            direction: GradientDirection::Diagonal,
        });
        let big = small.clone().with_canvas(2160, 3840);
        let a = paint(&small, &days);
        let b = paint(&big, &days);
        assert_eq!(a.commands().len(), b.commands().len());
        for (x, y) in a.commands().iter().zip(b.commands()) {
            assert_eq!(&scaled(x, 2.0), y);
        }
    }

    #[test]
    fn one_card_per_day_plus_two_dua_panels() {
        let days = generate(&FallbackParams::default());
        let s = paint(&WallpaperConfig::default(), &days);
        let shadowed = s
            .commands()
            .iter()
            .filter(|c| matches!(c, PaintCommand::RoundedRect { shadow: Some(_), .. }))
            .count();
        assert_eq!(shadowed, 30);
        let badges = s
            .commands()
            .iter()
            .filter(|c| matches!(c, PaintCommand::Text { text, .. } if text == BADGE_SUHOOR || text == BADGE_IFTAR))
            .count();
        assert_eq!(badges, 2);
    }

    #[test]
    fn empty_days_paint_header_only() {
        let s = paint(&WallpaperConfig::default(), &[]);
        assert!(!s.is_empty());
        assert!(!s
            .commands()
            .iter()
            .any(|c| matches!(c, PaintCommand::RoundedRect { shadow: Some(_), .. })));
        assert!(!s
            .commands()
            .iter()
            .any(|c| matches!(c, PaintCommand::Text { text, .. } if text == BADGE_SUHOOR)));
    }

    #[test]
    fn image_background_is_tinted() {
        let mut png = Vec::new();
        image::RgbImage::from_pixel(4, 2, image::Rgb([10, 20, 30]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let img = crate::theme::BackgroundImage::from_bytes(&png).unwrap();
        let cfg = WallpaperConfig::default()
            .with_background(BackgroundConfig::Image { image: img, overlay_opacity: 0.3 });
        let s = paint(&cfg, &[]);
        assert!(matches!(s.commands()[0], PaintCommand::Image { .. }));
        match &s.commands()[1] {
            PaintCommand::Rect { fill: Paint::Solid(c), opacity, .. } => {
                assert_eq!(*c, IMAGE_TINT);
                assert_eq!(*opacity, 0.3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn icons_follow_the_theme() {
        let days = generate(&FallbackParams::default());
        let cfg = WallpaperConfig::default().with_theme(ThemeName::Dark);
        let s = paint(&cfg, &days);
        assert!(s
            .commands()
            .iter()
            .any(|c| matches!(c, PaintCommand::Text { text, .. } if text == "⭐")));
    }

    #[test]
    fn rounded_radius_is_clamped() {
        let mut s = Surface::new(10, 10);
        s.rounded_rect(Rect::new(0.0, 0.0, 10.0, 4.0), 9.0, Paint::Solid(Color::WHITE), 1.0, None);
        match &s.commands()[0] {
            PaintCommand::RoundedRect { radius, .. } => assert_eq!(*radius, 2.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn fingerprint_is_stable() {
        let days = generate(&FallbackParams::default());
        let a = paint(&WallpaperConfig::default(), &days);
        let b = paint(&WallpaperConfig::default(), &days);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
        let c = paint(&WallpaperConfig::default().with_theme(ThemeName::Minimal), &days);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
