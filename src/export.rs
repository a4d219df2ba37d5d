//! Encoding rendered pixmaps and naming the output files.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use resvg::tiny_skia::Pixmap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    #[value(alias = "jpg")]
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    /// Case-insensitive; accepts `jpg` for JPEG.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpeg" | "jpg" => Some(ExportFormat::Jpeg),
            _ => None,
        }
    }
}

/// Encode a rendered pixmap. JPEG drops alpha and uses [`JPEG_QUALITY`].
pub fn encode(pixmap: &Pixmap, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Png => pixmap
            .encode_png()
            .map_err(|e| Error::ExportError(format!("PNG encoding failed: {}", e))),
        ExportFormat::Jpeg => {
            let rgba = to_rgba_image(pixmap)?;
            let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
            let mut out = Vec::new();
            JpegEncoder::new_with_quality(&mut Cursor::new(&mut out), JPEG_QUALITY)
                .encode_image(&rgb)
                .map_err(|e| Error::ExportError(format!("JPEG encoding failed: {}", e)))?;
            Ok(out)
        }
    }
}

/// Un-premultiplied copy of the pixmap.
fn to_rgba_image(pixmap: &Pixmap) -> Result<RgbaImage> {
    let mut buf = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        buf.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), buf)
        .ok_or_else(|| Error::ExportError("pixmap buffer size mismatch".to_string()))
}

/// `ramadan-{year}-{location}.{ext}`, location lowercased with runs of
/// whitespace collapsed to `-`.
pub fn file_name(location: &str, year: i32, format: ExportFormat) -> String {
    let slug = location
        .split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    format!("ramadan-{}-{}.{}", year, slug, format.extension())
}

/// Write encoded bytes to `path`, or to `dir/file_name(...)` when `path` is
/// an existing directory. Returns the path written.
pub fn write(path: &Path, data: &[u8], default_name: &str) -> Result<PathBuf> {
    let target = if path.is_dir() { path.join(default_name) } else { path.to_path_buf() };
    std::fs::write(&target, data)
        .map_err(|e| Error::ExportError(format!("cannot write {}: {}", target.display(), e)))?;
    log::info!("wrote {} bytes to {}", data.len(), target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::Color as SkColor;

    fn filled(w: u32, h: u32) -> Pixmap {
        let mut pm = Pixmap::new(w, h).unwrap();
        pm.fill(SkColor::from_rgba8(200, 100, 50, 255));
        pm
    }

    #[test]
    fn file_names() {
        assert_eq!(file_name("HATYAI", 2026, ExportFormat::Png), "ramadan-2026-hatyai.png");
        assert_eq!(file_name("หาดใหญ่ สงขลา", 2026, ExportFormat::Jpeg), "ramadan-2026-หาดใหญ่-สงขลา.jpeg");
        assert_eq!(file_name("  Mueang   Pattani ", 2027, ExportFormat::Png), "ramadan-2027-mueang-pattani.png");
    }

    #[test]
    fn png_has_signature_and_size() {
        let data = encode(&filled(6, 3), ExportFormat::Png).unwrap();
        assert_eq!(&data[..8], b"\x89PNG\r\n\x1a\n");
        let img = image::load_from_memory(&data).unwrap();
        assert_eq!((img.width(), img.height()), (6, 3));
    }

    #[test]
    fn jpeg_decodes_back() {
        let data = encode(&filled(16, 16), ExportFormat::Jpeg).unwrap();
        assert_eq!(&data[..2], &[0xff, 0xd8]);
        let img = image::load_from_memory(&data).unwrap().to_rgb8();
        let p = img.get_pixel(8, 8);
        assert!((p[0] as i32 - 200).abs() <= 4);
        assert!((p[1] as i32 - 100).abs() <= 4);
        assert!((p[2] as i32 - 50).abs() <= 4);
    }

    #[test]
    fn format_names() {
        assert_eq!(ExportFormat::from_name("JPG"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_name("png"), Some(ExportFormat::Png));
        assert_eq!(ExportFormat::from_name("gif"), None);
        assert_eq!(ExportFormat::Jpeg.mime_type(), "image/jpeg");
    }

    #[test]
    fn write_into_directory_uses_default_name() {
        let dir = std::env::temp_dir().join(format!("ramadan-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let written = write(&dir, b"abc", "ramadan-2026-x.png").unwrap();
        assert_eq!(written, dir.join("ramadan-2026-x.png"));
        assert_eq!(std::fs::read(&written).unwrap(), b"abc");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
