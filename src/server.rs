//! Small HTTP API over the data and rendering layers.
//!
//! Routing is a plain function of method and request URL returning an
//! [`ApiResponse`], so it can be exercised without a socket. [`ApiServer::serve`]
//! wraps it in a blocking `tiny_http` loop.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::Datelike;
use serde_json::json;
use tiny_http::{Header, Response, Server};

use crate::data::locations::{self, Directory, ResolvedLocation};
use crate::data::{self, Acquisition, AladhanClient, RamadanWindow, SourceConfig};
use crate::export::{self, ExportFormat};
use crate::rendering::{self, raster, RasterOptions};
use crate::theme::ThemeName;
use crate::{CanvasPreset, Error, Result, WallpaperConfig};

/// Largest canvas side accepted from a query string.
pub const MAX_CANVAS_SIDE: u32 = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json; charset=utf-8",
            headers: Vec::new(),
            body: value.to_string().into_bytes(),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, &json!({ "error": message.into() }))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

pub struct ApiServer {
    client: AladhanClient,
    runtime: tokio::runtime::Runtime,
    window: RamadanWindow,
    base: WallpaperConfig,
    raster: RasterOptions,
}

impl ApiServer {
    pub fn new(source: SourceConfig, base: WallpaperConfig, raster: RasterOptions) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to start runtime: {}", e)))?;
        Ok(Self {
            client: AladhanClient::new(source)?,
            runtime,
            window: RamadanWindow::default(),
            base,
            raster,
        })
    }

    pub fn with_window(self, window: RamadanWindow) -> Self {
        Self { window, ..self }
    }

    /// Answer one request. Every response allows any origin.
    pub fn route(&self, method: &str, url: &str) -> ApiResponse {
        log::debug!("{} {}", method, url);
        let mut resp = self.dispatch(method, url);
        resp.headers.push(("Access-Control-Allow-Origin".to_string(), "*".to_string()));
        resp
    }

    fn dispatch(&self, method: &str, url: &str) -> ApiResponse {
        let parsed = match url::Url::parse("http://localhost").and_then(|base| base.join(url)) {
            Ok(u) => u,
            Err(e) => return ApiResponse::error(400, format!("Bad request URL: {}", e)),
        };
        let query: HashMap<String, String> = parsed.query_pairs().into_owned().collect();

        match (method.to_ascii_uppercase().as_str(), parsed.path()) {
            ("OPTIONS", _) => ApiResponse {
                status: 204,
                content_type: "text/plain",
                headers: vec![("Access-Control-Allow-Methods".to_string(), "GET, OPTIONS".to_string())],
                body: Vec::new(),
            },
            ("GET", "/api/locations") => match serde_json::to_value(Directory) {
                Ok(v) => ApiResponse::json(200, &v),
                Err(e) => ApiResponse::error(500, e.to_string()),
            },
            ("GET", "/api/prayertime") => self.prayertime(&query),
            ("GET", "/api/wallpaper") => match self.wallpaper(&query) {
                Ok(resp) => resp,
                Err(Error::ConfigError(msg)) => ApiResponse::error(400, msg),
                Err(e) => {
                    log::error!("wallpaper render failed: {}", e);
                    ApiResponse::error(500, e.to_string())
                }
            },
            _ => ApiResponse::error(404, "Not found"),
        }
    }

    fn location(query: &HashMap<String, String>) -> ResolvedLocation {
        locations::resolve(
            query.get("province").map(String::as_str),
            query.get("district").map(String::as_str),
        )
    }

    fn acquire(&self, location: &ResolvedLocation) -> Acquisition {
        self.runtime.block_on(data::acquire(&self.client, location, &self.window))
    }

    fn prayertime(&self, query: &HashMap<String, String>) -> ApiResponse {
        let location = Self::location(query);
        let acq = self.acquire(&location);
        let mut body = json!({
            "success": true,
            "province": location.province,
            "district": location.district,
            "lat": location.lat,
            "lng": location.lng,
            "data": acq.days,
        });
        if acq.fallback {
            body["fallback"] = json!(true);
        }
        ApiResponse::json(200, &body)
    }

    fn wallpaper(&self, query: &HashMap<String, String>) -> Result<ApiResponse> {
        let location = Self::location(query);
        let mut config = self.base.clone();

        if let Some(t) = query.get("theme") {
            config = config.with_theme(ThemeName::from_str(t)?);
        }
        let format = match query.get("format") {
            Some(f) => ExportFormat::from_name(f).ok_or_else(|| Error::ConfigError(format!("Unknown format: {}", f)))?,
            None => ExportFormat::Png,
        };
        if let Some(p) = query.get("preset") {
            let preset = CanvasPreset::from_name(p).ok_or_else(|| Error::ConfigError(format!("Unknown preset: {}", p)))?;
            let size = preset.size();
            config = config.with_canvas(size.width, size.height);
        }
        match (query.get("width"), query.get("height")) {
            (Some(w), Some(h)) => {
                let (w, h) = (parse_side(w)?, parse_side(h)?);
                config = config.with_canvas(w, h);
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(Error::ConfigError("width and height must be given together".to_string()));
            }
            (None, None) => {}
        }
        config = config.with_location(location.display_name());
        config.validate()?;

        let acq = self.acquire(&location);
        let surface = rendering::render_wallpaper(&config, &acq.days);
        let etag = format!("\"{}.{}\"", &surface.fingerprint()[..32], format.extension());
        let pixmap = raster::rasterize(&surface, &self.raster)?;
        let body = export::encode(&pixmap, format)?;

        let slug = format!("{} {}", location.district_key, location.province_key);
        let name = export::file_name(&slug, self.window.start.year(), format);
        let mut headers = vec![
            ("Content-Disposition".to_string(), format!("attachment; filename=\"{}\"", name)),
            ("ETag".to_string(), etag),
        ];
        if acq.fallback {
            headers.push(("X-Data-Fallback".to_string(), "1".to_string()));
        }
        Ok(ApiResponse { status: 200, content_type: format.mime_type(), headers, body })
    }

    /// Blocking accept loop on `addr`.
    pub fn serve(&self, addr: &str) -> Result<()> {
        let server = Server::http(addr).map_err(|e| Error::NetworkError(format!("Failed to bind {}: {}", addr, e)))?;
        log::info!("listening on http://{}", addr);
        for request in server.incoming_requests() {
            let resp = self.route(request.method().as_str(), request.url());
            let status = resp.status;
            let mut out = Response::from_data(resp.body).with_status_code(status);
            if let Ok(h) = Header::from_bytes(&b"Content-Type"[..], resp.content_type.as_bytes()) {
                out = out.with_header(h);
            }
            for (k, v) in &resp.headers {
                match Header::from_bytes(k.as_bytes(), v.as_bytes()) {
                    Ok(h) => out = out.with_header(h),
                    Err(()) => log::warn!("dropping non-ASCII header {}", k),
                }
            }
            log::info!("{} {} -> {}", request.method(), request.url(), status);
            if let Err(e) = request.respond(out) {
                log::warn!("failed to send response: {}", e);
            }
        }
        Ok(())
    }
}

fn parse_side(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(v) if v > 0 && v <= MAX_CANVAS_SIDE => Ok(v),
        _ => Err(Error::ConfigError(format!(
            "Canvas side must be between 1 and {}, got {:?}",
            MAX_CANVAS_SIDE, s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_server() -> ApiServer {
        let source = SourceConfig {
            base_url: "http://127.0.0.1:9/v1".to_string(),
            timeout_ms: 500,
            ..Default::default()
        };
        ApiServer::new(source, WallpaperConfig::default(), RasterOptions::without_fonts()).unwrap()
    }

    #[test]
    fn unknown_route_is_json_404() {
        let s = offline_server();
        let r = s.route("GET", "/nope");
        assert_eq!(r.status, 404);
        assert_eq!(r.body_json().unwrap()["error"], "Not found");
        assert_eq!(r.header("access-control-allow-origin"), Some("*"));
    }

    #[test]
    fn locations_lists_the_directory() {
        let r = offline_server().route("GET", "/api/locations");
        assert_eq!(r.status, 200);
        let v = r.body_json().unwrap();
        assert!(v["songkhla"]["districts"].as_array().unwrap().len() > 1);
        assert_eq!(v.as_object().unwrap().len(), 12);
    }

    #[test]
    fn prayertime_falls_back_when_source_is_down() {
        let r = offline_server().route("GET", "/api/prayertime?province=yala&district=betong");
        assert_eq!(r.status, 200);
        let v = r.body_json().unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["fallback"], true);
        assert_eq!(v["data"].as_array().unwrap().len(), 30);
        assert_eq!(v["data"][0]["ramadanDay"], 1);
    }

    #[test]
    fn unknown_province_uses_default() {
        let r = offline_server().route("GET", "/api/prayertime?province=atlantis");
        let v = r.body_json().unwrap();
        let def = locations::default_location();
        assert_eq!(v["province"], def.province);
        assert_eq!(v["district"], def.district);
    }

    #[test]
    fn wallpaper_returns_image_with_name_and_etag() {
        let r = offline_server().route("GET", "/api/wallpaper?theme=dark&format=jpg&width=108&height=192");
        assert_eq!(r.status, 200);
        assert_eq!(r.content_type, "image/jpeg");
        assert_eq!(&r.body[..2], &[0xff, 0xd8]);
        assert_eq!(
            r.header("Content-Disposition"),
            Some("attachment; filename=\"ramadan-2026-hatyai-songkhla.jpeg\"")
        );
        assert!(r.header("ETag").unwrap().ends_with(".jpeg\""));
        assert_eq!(r.header("X-Data-Fallback"), Some("1"));
    }

    #[test]
    fn wallpaper_rejects_bad_parameters() {
        let s = offline_server();
        assert_eq!(s.route("GET", "/api/wallpaper?theme=neon").status, 400);
        assert_eq!(s.route("GET", "/api/wallpaper?format=gif").status, 400);
        assert_eq!(s.route("GET", "/api/wallpaper?width=0&height=10").status, 400);
    }

    #[test]
    fn wallpaper_needs_both_sides() {
        let s = offline_server();
        for query in ["width=200", "height=300", "preset=square&width=200"] {
            let r = s.route("GET", &format!("/api/wallpaper?{}", query));
            assert_eq!(r.status, 400, "{}", query);
            assert_eq!(r.body_json().unwrap()["error"], "width and height must be given together");
        }
    }

    #[test]
    fn preflight_is_allowed() {
        let r = offline_server().route("OPTIONS", "/api/wallpaper");
        assert_eq!(r.status, 204);
        assert_eq!(r.header("Access-Control-Allow-Origin"), Some("*"));
    }
}
