//! Wallpaper rendering: layout, paint, raster.

pub mod layout;
pub mod paint;
pub mod raster;

pub use raster::RasterOptions;

use crate::data::DayRecord;
use crate::export::{self, ExportFormat};
use crate::{Result, WallpaperConfig};

use self::layout::compute_layout;
use self::paint::Surface;

/// An encoded raster image.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    pub data: Vec<u8>,
}

/// Lay out and paint `days` with `config`. The first record's weekday picks
/// the starting column.
pub fn render_wallpaper(config: &WallpaperConfig, days: &[DayRecord]) -> Surface {
    let first_weekday = days.first().map(|d| d.day_of_week_index as usize).unwrap_or(0);
    let layout = compute_layout(&config.layout_config(), days.len(), first_weekday);
    let mut surface = Surface::new(config.canvas.width, config.canvas.height);
    paint::render(&mut surface, &layout, days, config.active_theme(), config);
    log::debug!(
        "painted {} commands for {} days ({} rows) on {}x{}",
        surface.commands().len(),
        days.len(),
        layout.num_rows,
        surface.width,
        surface.height
    );
    surface
}

/// Render and encode in one step.
pub fn render_image(
    config: &WallpaperConfig,
    days: &[DayRecord],
    options: &RasterOptions,
    format: ExportFormat,
) -> Result<Screenshot> {
    config.validate()?;
    let surface = render_wallpaper(config, days);
    let pixmap = raster::rasterize(&surface, options)?;
    let data = export::encode(&pixmap, format)?;
    Ok(Screenshot { width: surface.width, height: surface.height, format, data })
}

/// [`render_image`] as PNG.
pub fn render_png(config: &WallpaperConfig, days: &[DayRecord], options: &RasterOptions) -> Result<Screenshot> {
    render_image(config, days, options, ExportFormat::Png)
}
