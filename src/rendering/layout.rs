//! Geometry for every element of the wallpaper.
//!
//! All constants are authored against a 1080px-wide canvas
//! ([`REFERENCE_WIDTH`]); every length is multiplied by the scale factor
//! `width / 1080`, so a canvas twice as wide yields exactly doubled
//! coordinates and font sizes.
//!
//! The grid and the dua panels are computed in the same pass: the panels sit
//! under the last occupied grid row, so their position depends on the day
//! count and on the weekday the first day falls on. [`Layout::num_rows`] is
//! the single source of that row count.

use crate::theme::GradientDirection;

/// Width all pixel constants are defined against.
pub const REFERENCE_WIDTH: f32 = 1080.0;

pub const COLUMNS: usize = 7;

// Header
const TITLE_Y: f32 = 148.0;
const TITLE_SIZE: f32 = 88.0;
const TITLE_GRADIENT_HALF_WIDTH: f32 = 220.0;
const TITLE_GLOW_BLUR: f32 = 12.0;
const LOCATION_GAP: f32 = 56.0;
const LOCATION_SIZE: f32 = 32.0;
const DIVIDER_GAP: f32 = 20.0;
const DIVIDER_HALF_WIDTH: f32 = 120.0;
const DIVIDER_STROKE: f32 = 2.0;
const HALO_CENTER_Y: f32 = -40.0;
const HALO_RADIUS: f32 = 220.0;

// Weekday pills
const WEEKDAY_TOP: f32 = 260.0;
const WEEKDAY_HEIGHT: f32 = 52.0;
const WEEKDAY_PAD: f32 = 4.0;
const WEEKDAY_FONT: f32 = 26.0;

// Grid and cards
const GRID_TOP: f32 = 326.0;
const CARD_PAD: f32 = 4.0;
const CARD_INNER_X: f32 = 10.0;
const CARD_INNER_TOP: f32 = 8.0;
const CARD_INNER_BOTTOM: f32 = 10.0;
const TIME_LINE_GAP: f32 = 6.0;
const MIN_SMALL_FONT: f32 = 10.0;
const ICON_GAP: f32 = 3.0;
const SHADOW_BLUR: f32 = 12.0;
const SHADOW_OFFSET_Y: f32 = 4.0;
const LEGEND_FONT: f32 = 20.0;

// Dua panels
const DUA_MARGIN_TOP: f32 = 20.0;
const DUA_HEIGHT: f32 = 115.0;
const DUA_PITCH: f32 = 125.0;
const DUA_RADIUS: f32 = 18.0;
const BADGE_INSET: f32 = 10.0;
const BADGE_WIDTH: f32 = 110.0;
const BADGE_HEIGHT: f32 = 28.0;
const BADGE_TEXT_INSET: f32 = 16.0;
const BADGE_FONT: f32 = 17.0;
const DUA_TEXT_Y: f32 = 52.0;
const DUA_FONT: f32 = 22.0;
const ORNAMENT_INSET: f32 = 12.0;
const ORNAMENT_FONT: f32 = 14.0;

// Decorations
const PATTERN_TILE: f32 = 80.0;
const PATTERN_STEP: f32 = 1.15;
const PATTERN_STAR: f32 = 0.4;
const PATTERN_STROKE: f32 = 1.0;
const ARC_STROKE: f32 = 1.5;

/// Geometry inputs. Lengths and font sizes are reference-width pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub width: u32,
    pub height: u32,
    pub card_height: f32,
    pub card_gap: f32,
    pub margin_x: f32,
    pub offset_y: f32,
    /// Corner radius as a fraction of card height
    pub card_radius: f32,
    pub num_size: f32,
    pub time_size: f32,
    pub show_icons: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        crate::WallpaperConfig::default().layout_config()
    }
}

impl LayoutConfig {
    pub fn scale(&self) -> f32 {
        self.width as f32 / REFERENCE_WIDTH
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLayout {
    /// Faint disc peeking in from the top edge
    pub halo: Circle,
    /// Title baseline anchor (centred)
    pub title: Point,
    pub title_size: f32,
    /// Horizontal extent of the title gradient
    pub title_gradient: (Point, Point),
    pub glow_blur: f32,
    pub location: Point,
    pub location_size: f32,
    pub divider: (Point, Point),
    pub divider_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayPill {
    pub column: usize,
    pub rect: Rect,
    pub radius: f32,
    /// Text is centred on this point, vertically by its middle
    pub label: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayRow {
    pub pills: Vec<WeekdayPill>,
    pub font_size: f32,
}

/// The merged cell covering the unused weekdays before day 1.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendCell {
    /// Number of columns covered, starting at column 0
    pub columns: usize,
    pub rect: Rect,
    pub radius: f32,
    /// Centre anchors of the suhoor and iftar legend lines
    pub suhoor_line: Point,
    pub iftar_line: Point,
    pub font_size: f32,
}

/// Placement of the text inside one day card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardContent {
    /// Big day number, anchored top-left
    pub number: Point,
    pub number_size: f32,
    /// Gregorian day of month, anchored top-right
    pub date: Point,
    pub date_size: f32,
    /// Month label below the date, anchored top-right
    pub month: Point,
    pub month_size: f32,
    /// Baselines of the two time rows, measured up from the bottom edge
    pub suhoor_baseline: f32,
    pub iftar_baseline: f32,
    /// Present when icons are shown
    pub icon_x: Option<f32>,
    pub icon_size: f32,
    pub time_x: f32,
    pub time_size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    /// Position in the day sequence (0-based)
    pub index: usize,
    pub row: usize,
    pub column: usize,
    /// Card rectangle, already inset by the card padding
    pub rect: Rect,
    pub radius: f32,
    pub shadow_blur: f32,
    pub shadow_offset_y: f32,
    pub content: CardContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub top: f32,
    pub cell_width: f32,
    pub row_height: f32,
    pub gap: f32,
    pub legend: Option<LegendCell>,
    pub cells: Vec<DayCell>,
}

impl GridLayout {
    pub fn row_top(&self, row: usize) -> f32 {
        self.top + row as f32 * (self.row_height + self.gap)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuaBox {
    pub panel: Rect,
    pub radius: f32,
    /// Pill straddling the panel's top edge
    pub badge: Rect,
    pub badge_radius: f32,
    /// Left anchor of the badge label, vertically centred on the top edge
    pub badge_label: Point,
    pub badge_font_size: f32,
    /// Centre anchor of the right-to-left dua text
    pub text: Point,
    pub text_size: f32,
    /// Right anchor of the trailing ornament
    pub ornament: Point,
    pub ornament_size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decorations {
    pub arcs: Vec<Circle>,
    pub stroke_width: f32,
}

/// Tiled star motif for the pattern background.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternLayout {
    pub centers: Vec<Point>,
    pub star_radius: f32,
    pub stroke_width: f32,
}

/// Full geometry of one wallpaper.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub header: HeaderLayout,
    pub weekdays: WeekdayRow,
    /// Absent when there are no days
    pub grid: Option<GridLayout>,
    /// Grid rows used: `ceil((first_weekday + day_count) / 7)`, 0 without days
    pub num_rows: usize,
    /// Suhoor then iftar panel; empty when there are no days
    pub duas: Vec<DuaBox>,
    pub decorations: Decorations,
}

/// Compute geometry for `day_count` consecutive days whose first day falls
/// in column `first_weekday` (0 = first weekday label).
pub fn compute_layout(config: &LayoutConfig, day_count: usize, first_weekday: usize) -> Layout {
    let sf = config.scale();
    let w = config.width as f32;
    let h = config.height as f32;
    let first_weekday = first_weekday % COLUMNS;

    let margin_x = config.margin_x * sf;
    let cell_width = (w - margin_x * 2.0) / COLUMNS as f32;

    let num_rows = if day_count == 0 {
        0
    } else {
        (first_weekday + day_count).div_ceil(COLUMNS)
    };

    let grid = (day_count > 0).then(|| grid_layout(config, sf, margin_x, cell_width, day_count, first_weekday));
    let duas = match &grid {
        Some(g) => dua_boxes(sf, margin_x, w - margin_x * 2.0, g.row_top(num_rows)),
        None => Vec::new(),
    };

    log::debug!(
        "layout {}x{} scale {:.3}: {} days from column {}, {} rows",
        config.width,
        config.height,
        sf,
        day_count,
        first_weekday,
        num_rows
    );

    Layout {
        width: config.width,
        height: config.height,
        scale: sf,
        header: header_layout(sf, w),
        weekdays: weekday_row(sf, margin_x, cell_width),
        grid,
        num_rows,
        duas,
        decorations: decorations(sf, w, h),
    }
}

fn header_layout(sf: f32, w: f32) -> HeaderLayout {
    let cx = w / 2.0;
    let title_y = TITLE_Y * sf;
    let location_y = title_y + LOCATION_GAP * sf;
    let divider_y = location_y + DIVIDER_GAP * sf;
    HeaderLayout {
        halo: Circle { center: Point::new(cx, HALO_CENTER_Y * sf), radius: HALO_RADIUS * sf },
        title: Point::new(cx, title_y),
        title_size: TITLE_SIZE * sf,
        title_gradient: (
            Point::new(cx - TITLE_GRADIENT_HALF_WIDTH * sf, 0.0),
            Point::new(cx + TITLE_GRADIENT_HALF_WIDTH * sf, 0.0),
        ),
        glow_blur: TITLE_GLOW_BLUR * sf,
        location: Point::new(cx, location_y),
        location_size: LOCATION_SIZE * sf,
        divider: (
            Point::new(cx - DIVIDER_HALF_WIDTH * sf, divider_y),
            Point::new(cx + DIVIDER_HALF_WIDTH * sf, divider_y),
        ),
        divider_width: DIVIDER_STROKE * sf,
    }
}

fn weekday_row(sf: f32, margin_x: f32, cell_width: f32) -> WeekdayRow {
    let top = WEEKDAY_TOP * sf;
    let cell_height = WEEKDAY_HEIGHT * sf;
    let pad = WEEKDAY_PAD * sf;
    let r = cell_width.min(cell_height) / 2.0 - pad;
    let pills = (0..COLUMNS)
        .map(|column| {
            let cx = margin_x + column as f32 * cell_width + cell_width / 2.0;
            WeekdayPill {
                column,
                rect: Rect::new(cx - r, top, r * 2.0, cell_height - pad),
                radius: r * 0.55,
                label: Point::new(cx, top + (cell_height - pad) / 2.0),
            }
        })
        .collect();
    WeekdayRow { pills, font_size: WEEKDAY_FONT * sf }
}

fn grid_layout(
    config: &LayoutConfig,
    sf: f32,
    margin_x: f32,
    cell_width: f32,
    day_count: usize,
    first_weekday: usize,
) -> GridLayout {
    let top = GRID_TOP * sf + config.offset_y * sf;
    let row_height = config.card_height * sf;
    let gap = config.card_gap * sf;
    let pad = CARD_PAD * sf;

    let legend = (first_weekday > 0).then(|| {
        let rect = Rect::new(
            margin_x + pad,
            top + pad,
            cell_width * first_weekday as f32 - pad * 2.0,
            row_height - pad * 2.0,
        );
        let c = rect.center();
        LegendCell {
            columns: first_weekday,
            rect,
            radius: rect.height * config.card_radius * 0.5,
            suhoor_line: Point::new(c.x, c.y - 12.0 * sf),
            iftar_line: Point::new(c.x, c.y + 16.0 * sf),
            font_size: LEGEND_FONT * sf,
        }
    });

    let cells = (0..day_count)
        .map(|index| {
            let slot = first_weekday + index;
            let (row, column) = (slot / COLUMNS, slot % COLUMNS);
            let rect = Rect::new(
                margin_x + column as f32 * cell_width + pad,
                top + row as f32 * (row_height + gap) + pad,
                cell_width - pad * 2.0,
                row_height - pad * 2.0,
            );
            DayCell {
                index,
                row,
                column,
                rect,
                radius: rect.height * config.card_radius * 0.6,
                shadow_blur: SHADOW_BLUR * sf,
                shadow_offset_y: SHADOW_OFFSET_Y * sf,
                content: card_content(config, sf, rect),
            }
        })
        .collect();

    GridLayout { top, cell_width, row_height, gap, legend, cells }
}

/// Text anchors derive from font sizes so larger fonts push rows apart
/// instead of overlapping.
fn card_content(config: &LayoutConfig, sf: f32, card: Rect) -> CardContent {
    let px = CARD_INNER_X * sf;
    let pt = CARD_INNER_TOP * sf;
    let pb = CARD_INNER_BOTTOM * sf;

    let number_size = config.num_size * sf;
    let time_size = config.time_size * sf;
    let date_size = (MIN_SMALL_FONT * sf).max(time_size * 0.82);
    let icon_size = (MIN_SMALL_FONT * sf).max(time_size * 0.88);

    let date_y = card.y + pt + 2.0 * sf;
    let iftar_baseline = card.bottom() - pb;
    let suhoor_baseline = iftar_baseline - (time_size + TIME_LINE_GAP * sf);

    let left = card.x + px;
    let (icon_x, time_x) = if config.show_icons {
        (Some(left), left + icon_size + ICON_GAP * sf)
    } else {
        (None, left)
    };

    CardContent {
        number: Point::new(left, card.y + pt),
        number_size,
        date: Point::new(card.right() - px, date_y),
        date_size,
        month: Point::new(card.right() - px, date_y + date_size + 2.0 * sf),
        month_size: date_size * 0.88,
        suhoor_baseline,
        iftar_baseline,
        icon_x,
        icon_size,
        time_x,
        time_size,
    }
}

fn dua_boxes(sf: f32, margin_x: f32, width: f32, grid_end: f32) -> Vec<DuaBox> {
    let first_top = grid_end + DUA_MARGIN_TOP * sf;
    (0..2)
        .map(|i| {
            let panel = Rect::new(margin_x, first_top + i as f32 * DUA_PITCH * sf, width, DUA_HEIGHT * sf);
            let badge_h = BADGE_HEIGHT * sf;
            DuaBox {
                panel,
                radius: DUA_RADIUS * sf,
                badge: Rect::new(panel.x + BADGE_INSET * sf, panel.y - badge_h / 2.0, BADGE_WIDTH * sf, badge_h),
                badge_radius: badge_h / 2.0,
                badge_label: Point::new(panel.x + BADGE_TEXT_INSET * sf, panel.y),
                badge_font_size: BADGE_FONT * sf,
                text: Point::new(panel.x + panel.width / 2.0, panel.y + DUA_TEXT_Y * sf),
                text_size: DUA_FONT * sf,
                ornament: Point::new(panel.right() - ORNAMENT_INSET * sf, panel.bottom() - ORNAMENT_INSET * sf),
                ornament_size: ORNAMENT_FONT * sf,
            }
        })
        .collect()
}

fn decorations(sf: f32, w: f32, h: f32) -> Decorations {
    let top_right = (0..5).map(|i| Circle {
        center: Point::new(w, 0.0),
        radius: (120.0 + i as f32 * 80.0) * sf,
    });
    let bottom_left = (0..4).map(|i| Circle {
        center: Point::new(0.0, h),
        radius: (80.0 + i as f32 * 90.0) * sf,
    });
    Decorations { arcs: top_right.chain(bottom_left).collect(), stroke_width: ARC_STROKE * sf }
}

impl Layout {
    /// Bottom edge of the last occupied grid row.
    pub fn grid_bottom(&self) -> Option<f32> {
        let g = self.grid.as_ref()?;
        Some(g.row_top(self.num_rows.saturating_sub(1)) + g.row_height)
    }

    /// Star centres covering the canvas with a one-tile bleed on every side.
    pub fn pattern(&self) -> PatternLayout {
        let sf = self.scale;
        let size = PATTERN_TILE * sf;
        let step = size * PATTERN_STEP;
        let (w, h) = (self.width as f32, self.height as f32);
        let mut centers = Vec::new();
        if step > 0.0 {
            let mut y = -size;
            while y < h + size {
                let mut x = -size;
                while x < w + size {
                    centers.push(Point::new(x, y));
                    x += step;
                }
                y += step;
            }
        }
        PatternLayout { centers, star_radius: size * PATTERN_STAR, stroke_width: PATTERN_STROKE * sf }
    }

    /// Endpoints of the background gradient axis.
    pub fn gradient_axis(&self, direction: GradientDirection) -> (Point, Point) {
        let (w, h) = (self.width as f32, self.height as f32);
        let end = match direction {
            GradientDirection::Vertical => Point::new(0.0, h),
            GradientDirection::Horizontal => Point::new(w, 0.0),
            GradientDirection::Diagonal => Point::new(w, h),
        };
        (Point::new(0.0, 0.0), end)
    }

    /// Rectangle that covers the canvas with an image of the given size,
    /// preserving aspect ratio and centring the overflow.
    pub fn cover_rect(&self, image_width: u32, image_height: u32) -> Rect {
        let (w, h) = (self.width as f32, self.height as f32);
        let (iw, ih) = (image_width.max(1) as f32, image_height.max(1) as f32);
        let scale = (w / iw).max(h / ih);
        let (sw, sh) = (iw * scale, ih * scale);
        Rect::new((w - sw) / 2.0, (h - sh) / 2.0, sw, sh)
    }
}

/// Closed outline of an eight-pointed star: outer and inner vertices
/// alternate, inner radius 0.4 of outer.
pub fn star_outline(center: Point, radius: f32) -> Vec<Point> {
    use std::f32::consts::PI;
    let inner = radius * 0.4;
    let mut pts = Vec::with_capacity(16);
    for i in 0..8 {
        let outer_a = i as f32 * PI * 2.0 / 8.0 - PI / 8.0;
        let inner_a = outer_a + PI / 8.0;
        pts.push(Point::new(center.x + radius * outer_a.cos(), center.y + radius * outer_a.sin()));
        pts.push(Point::new(center.x + inner * inner_a.cos(), center.y + inner * inner_a.sin()));
    }
    pts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_days_from_thursday_use_five_rows() {
        let l = compute_layout(&LayoutConfig::default(), 30, 4);
        assert_eq!(l.num_rows, 5);
        let g = l.grid.as_ref().unwrap();
        assert_eq!(g.cells.len(), 30);
        assert_eq!((g.cells[0].row, g.cells[0].column), (0, 4));
        assert_eq!((g.cells[3].row, g.cells[3].column), (1, 0));
        assert_eq!((g.cells[29].row, g.cells[29].column), (4, 5));
        assert_eq!(g.legend.as_ref().unwrap().columns, 4);
    }

    #[test]
    fn no_days_means_no_grid_and_no_duas() {
        let l = compute_layout(&LayoutConfig::default(), 0, 3);
        assert!(l.grid.is_none());
        assert!(l.duas.is_empty());
        assert_eq!(l.num_rows, 0);
        assert_eq!(l.grid_bottom(), None);
        // header and weekday row are still laid out
        assert_eq!(l.weekdays.pills.len(), 7);
    }

    #[test]
    fn reference_width_has_unit_scale() {
        let l = compute_layout(&LayoutConfig::default(), 30, 4);
        assert_eq!(l.scale, 1.0);
        assert_eq!(l.header.title, Point::new(540.0, 148.0));
        assert_eq!(l.header.location.y, 204.0);
        let g = l.grid.unwrap();
        assert_eq!(g.top, 326.0);
        assert_eq!(g.cell_width, (1080.0 - 56.0) / 7.0);
        assert_eq!(l.duas[0].panel.y, 326.0 + 5.0 * (155.0 + 8.0) + 20.0);
        assert_eq!(l.duas[1].panel.y - l.duas[0].panel.y, 125.0);
    }

    #[test]
    fn offset_moves_grid_and_duas_together() {
        let base = LayoutConfig::default();
        let shifted = LayoutConfig { offset_y: 40.0, ..base };
        let a = compute_layout(&base, 30, 4);
        let b = compute_layout(&shifted, 30, 4);
        let (ga, gb) = (a.grid.unwrap(), b.grid.unwrap());
        assert_eq!(gb.cells[0].rect.y - ga.cells[0].rect.y, 40.0);
        assert_eq!(b.duas[0].panel.y - a.duas[0].panel.y, 40.0);
        // the weekday header stays put
        assert_eq!(a.weekdays, b.weekdays);
    }

    #[test]
    fn time_rows_anchor_to_card_bottom() {
        let l = compute_layout(&LayoutConfig::default(), 1, 0);
        let cell = &l.grid.unwrap().cells[0];
        let c = &cell.content;
        assert_eq!(c.iftar_baseline, cell.rect.bottom() - 10.0);
        assert_eq!(c.iftar_baseline - c.suhoor_baseline, 16.0 + 6.0);
        assert_eq!(c.icon_x, Some(cell.rect.x + 10.0));
        assert_eq!(c.time_x, cell.rect.x + 10.0 + c.icon_size + 3.0);
    }

    #[test]
    fn larger_time_font_spreads_rows() {
        let big = LayoutConfig { time_size: 30.0, show_icons: false, ..LayoutConfig::default() };
        let l = compute_layout(&big, 1, 0);
        let c = &l.grid.unwrap().cells[0].content;
        assert_eq!(c.iftar_baseline - c.suhoor_baseline, 36.0);
        assert_eq!(c.icon_x, None);
    }

    #[test]
    fn cover_rect_fills_and_centres() {
        let l = compute_layout(&LayoutConfig::default(), 0, 0);
        // wide image: height fits, width overflows evenly
        let r = l.cover_rect(1000, 960);
        assert_eq!(r.height, 1920.0);
        assert_eq!(r.width, 2000.0);
        assert_eq!(r.x, -460.0);
        assert_eq!(r.y, 0.0);
    }

    #[test]
    fn gradient_axis_follows_direction() {
        let l = compute_layout(&LayoutConfig::default(), 0, 0);
        assert_eq!(l.gradient_axis(GradientDirection::Vertical).1, Point::new(0.0, 1920.0));
        assert_eq!(l.gradient_axis(GradientDirection::Horizontal).1, Point::new(1080.0, 0.0));
        assert_eq!(l.gradient_axis(GradientDirection::Diagonal).1, Point::new(1080.0, 1920.0));
    }

    #[test]
    fn pattern_bleeds_past_every_edge() {
        let l = compute_layout(&LayoutConfig::default(), 0, 0);
        let p = l.pattern();
        assert_eq!(p.centers[0], Point::new(-80.0, -80.0));
        assert!(p.centers.iter().any(|c| c.x > 1080.0));
        assert!(p.centers.iter().any(|c| c.y > 1920.0));
        assert_eq!(star_outline(Point::new(0.0, 0.0), p.star_radius).len(), 16);
    }
}
