//! Surface -> SVG -> pixels.
//!
//! The display list is serialised to a self-contained SVG document (the
//! background bitmap travels as a base64 data URI) and rasterised with resvg.

use std::fmt::Write as _;
use std::path::PathBuf;

use base64::Engine as _;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use super::layout::{Point, Rect};
use super::paint::{Baseline, Paint, PaintCommand, Shadow, Surface, TextAnchor, TextStyle};
use crate::{Error, Result};

/// Font sources for text rendering.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Directories scanned for font files before system fonts
    pub font_dirs: Vec<PathBuf>,
    pub load_system_fonts: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { font_dirs: Vec::new(), load_system_fonts: true }
    }
}

impl RasterOptions {
    /// No fonts at all; text is dropped. Handy for pixel tests that must not
    /// depend on the host.
    pub fn without_fonts() -> Self {
        Self { font_dirs: Vec::new(), load_system_fonts: false }
    }
}

/// Serialise `surface` as an SVG document the size of the canvas.
pub fn to_svg(surface: &Surface) -> String {
    let mut w = SvgWriter { out: String::new(), next_id: 0 };
    let _ = writeln!(
        w.out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{0}" height="{1}" viewBox="0 0 {0} {1}">"#,
        surface.width, surface.height
    );
    for cmd in surface.commands() {
        w.command(cmd);
    }
    w.out.push_str("</svg>\n");
    w.out
}

/// Rasterise `surface` at its own size.
pub fn rasterize(surface: &Surface, options: &RasterOptions) -> Result<Pixmap> {
    let svg = to_svg(surface);

    let mut opt = usvg::Options::default();
    {
        let db = opt.fontdb_mut();
        for dir in &options.font_dirs {
            db.load_fonts_dir(dir);
        }
        if options.load_system_fonts {
            db.load_system_fonts();
        }
        log::debug!("raster: {} font faces available", db.len());
    }

    let tree = usvg::Tree::from_str(&svg, &opt)
        .map_err(|e| Error::RenderError(format!("Failed to parse generated SVG: {}", e)))?;
    let mut pixmap = Pixmap::new(surface.width, surface.height).ok_or_else(|| {
        Error::RenderError(format!("Failed to allocate {}x{} pixmap", surface.width, surface.height))
    })?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

struct SvgWriter {
    out: String,
    next_id: usize,
}

impl SvgWriter {
    fn id(&mut self, prefix: &str) -> String {
        let id = format!("{}{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit any gradient definition `paint` needs and return the fill value.
    fn paint(&mut self, paint: &Paint) -> String {
        match paint {
            Paint::Solid(c) => c.to_string(),
            Paint::LinearGradient { from, to, stops } => {
                let id = self.id("g");
                let _ = writeln!(
                    self.out,
                    r#"<defs><linearGradient id="{}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs>"#,
                    id, from.x, from.y, to.x, to.y, stops[0], stops[1]
                );
                format!("url(#{})", id)
            }
        }
    }

    fn blur_filter(&mut self, std_dev: f32) -> String {
        let id = self.id("f");
        let _ = writeln!(
            self.out,
            r#"<defs><filter id="{}" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="{}"/></filter></defs>"#,
            id, std_dev
        );
        id
    }

    fn shadow_filter(&mut self, shadow: &Shadow) -> String {
        let id = self.id("f");
        let _ = writeln!(
            self.out,
            r#"<defs><filter id="{}" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="0" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/></filter></defs>"#,
            id,
            shadow.offset_y,
            shadow.blur / 2.0,
            shadow.color,
            shadow.opacity
        );
        id
    }

    fn command(&mut self, cmd: &PaintCommand) {
        match cmd {
            PaintCommand::Rect { rect, fill, opacity } => {
                let fill = self.paint(fill);
                let _ = writeln!(self.out, r#"<rect {} fill="{}" opacity="{}"/>"#, rect_attrs(rect), fill, opacity);
            }
            PaintCommand::RoundedRect { rect, radius, fill, opacity, shadow } => {
                let fill = self.paint(fill);
                let filter = match shadow {
                    Some(s) => format!(r#" filter="url(#{})""#, self.shadow_filter(s)),
                    None => String::new(),
                };
                let _ = writeln!(
                    self.out,
                    r#"<rect {} rx="{r}" ry="{r}" fill="{}" opacity="{}"{}/>"#,
                    rect_attrs(rect),
                    fill,
                    opacity,
                    filter,
                    r = radius
                );
            }
            PaintCommand::Circle { circle, fill, stroke, opacity } => {
                let fill = match fill {
                    Some(p) => self.paint(p),
                    None => "none".to_string(),
                };
                let stroke = match stroke {
                    Some(s) => format!(r#" stroke="{}" stroke-width="{}""#, s.color, s.width),
                    None => String::new(),
                };
                let _ = writeln!(
                    self.out,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}"{} opacity="{}"/>"#,
                    circle.center.x, circle.center.y, circle.radius, fill, stroke, opacity
                );
            }
            PaintCommand::Polygon { points, stroke, opacity } => {
                let _ = writeln!(
                    self.out,
                    r#"<polygon points="{}" fill="none" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
                    points_attr(points),
                    stroke.color,
                    stroke.width,
                    opacity
                );
            }
            PaintCommand::Line { from, to, stroke, opacity } => {
                let _ = writeln!(
                    self.out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
                    from.x, from.y, to.x, to.y, stroke.color, stroke.width, opacity
                );
            }
            PaintCommand::Text { text, at, style, fill, opacity, blur } => {
                let fill = self.paint(fill);
                let filter = match blur {
                    Some(b) => format!(r#" filter="url(#{})""#, self.blur_filter(*b)),
                    None => String::new(),
                };
                let _ = writeln!(
                    self.out,
                    r#"<text x="{}" y="{}" {} fill="{}" opacity="{}"{}>{}</text>"#,
                    at.x,
                    at.y,
                    text_attrs(style),
                    fill,
                    opacity,
                    filter,
                    escape_xml(text)
                );
            }
            PaintCommand::Image { rect, png } => {
                let data = base64::engine::general_purpose::STANDARD.encode(png);
                let _ = writeln!(
                    self.out,
                    r#"<image {} preserveAspectRatio="none" xlink:href="data:image/png;base64,{}"/>"#,
                    rect_attrs(rect),
                    data
                );
            }
        }
    }
}

fn rect_attrs(r: &Rect) -> String {
    format!(r#"x="{}" y="{}" width="{}" height="{}""#, r.x, r.y, r.width, r.height)
}

fn points_attr(points: &[Point]) -> String {
    points.iter().map(|p| format!("{},{}", p.x, p.y)).collect::<Vec<_>>().join(" ")
}

fn text_attrs(style: &TextStyle) -> String {
    let anchor = match style.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let mut attrs = format!(
        r#"font-family="{}" font-size="{}" text-anchor="{}""#,
        escape_xml(&style.family),
        style.size,
        anchor
    );
    if style.bold {
        attrs.push_str(r#" font-weight="bold""#);
    }
    match style.baseline {
        Baseline::Alphabetic => {}
        Baseline::Top => attrs.push_str(r#" dominant-baseline="text-before-edge""#),
        Baseline::Middle => attrs.push_str(r#" dominant-baseline="central""#),
    }
    if style.rtl {
        attrs.push_str(r#" direction="rtl""#);
    }
    attrs
}
