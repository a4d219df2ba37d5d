//! Fetch from a mock source, render without fonts and inspect pixels.

use std::sync::Once;
use std::time::Duration;

use ramadan_wallpaper::data::{self, locations, AladhanClient, RamadanWindow, SourceConfig};
use ramadan_wallpaper::rendering::layout::compute_layout;
use ramadan_wallpaper::rendering::{render_png, RasterOptions};
use ramadan_wallpaper::theme::BackgroundConfig;
use ramadan_wallpaper::{Color, WallpaperConfig};
use tiny_http::{Response, Server};

static INIT_VIS: Once = Once::new();

fn month_json(year: i32, month: u32, days: u32) -> String {
    let data: Vec<serde_json::Value> = (1..=days)
        .map(|d| {
            serde_json::json!({
                "timings": {
                    "Fajr": "05:14 (+07)", "Sunrise": "06:28 (+07)", "Dhuhr": "12:22 (+07)",
                    "Asr": "15:40 (+07)", "Maghrib": "18:27 (+07)", "Isha": "19:38 (+07)"
                },
                "date": { "gregorian": { "date": format!("{:02}-{:02}-{}", d, month, year) } }
            })
        })
        .collect();
    serde_json::json!({ "code": 200, "status": "OK", "data": data }).to_string()
}

fn start_vis_server() -> String {
    INIT_VIS.call_once(|| {
        std::thread::spawn(|| {
            let server = Server::http("127.0.0.1:18082").unwrap();
            for request in server.incoming_requests() {
                let path = request.url().split('?').next().unwrap_or("").to_string();
                let response = match path.as_str() {
                    "/v1/calendar/2026/2" => Response::from_string(month_json(2026, 2, 28)),
                    "/v1/calendar/2026/3" => Response::from_string(month_json(2026, 3, 31)),
                    _ => Response::from_string("Not Found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });
        // Give the server time to start
        std::thread::sleep(Duration::from_millis(100));
    });

    "http://127.0.0.1:18082/v1".to_string()
}

fn close(actual: image::Rgb<u8>, expected: [f32; 3], tolerance: f32) -> bool {
    actual.0.iter().zip(expected).all(|(a, e)| (*a as f32 - e).abs() <= tolerance)
}

fn mix(top: Color, bottom: Color, alpha: f32) -> [f32; 3] {
    let m = |t: u8, b: u8| t as f32 * alpha + b as f32 * (1.0 - alpha);
    [m(top.r, bottom.r), m(top.g, bottom.g), m(top.b, bottom.b)]
}

#[tokio::test]
async fn fetched_wallpaper_pixels() {
    let base = start_vis_server();
    let client = AladhanClient::new(SourceConfig { base_url: base, ..Default::default() }).unwrap();
    let loc = locations::default_location();
    let acq = data::acquire(&client, &loc, &RamadanWindow::default()).await;
    assert!(!acq.fallback, "mock source should be used: {:?}", acq.notice);
    assert_eq!(acq.days.len(), 30);

    let cfg = WallpaperConfig::default().with_canvas(216, 384);
    let shot = render_png(&cfg, &acq.days, &RasterOptions::without_fonts()).unwrap();
    assert_eq!(&shot.data[0..8], b"\x89PNG\r\n\x1a\n");
    let img = image::load_from_memory(&shot.data).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (216, 384));

    // Top-left corner is the first gradient stop.
    let (bg1, bg2) = match &cfg.background {
        BackgroundConfig::Gradient { color1, color2, .. } => (*color1, *color2),
        other => panic!("unexpected default background {:?}", other),
    };
    assert!(close(*img.get_pixel(0, 0), [bg1.r as f32, bg1.g as f32, bg1.b as f32], 3.0));

    // First card sits in the Thursday column; its centre shows the card
    // colour at card opacity over the background.
    let layout = compute_layout(&cfg.layout_config(), acq.days.len(), acq.days[0].day_of_week_index as usize);
    let cell = &layout.grid.as_ref().unwrap().cells[0];
    assert_eq!(cell.column, 4);
    let c = cell.rect.center();
    let px = *img.get_pixel(c.x as u32, c.y as u32);
    let t = c.y / 384.0;
    let bg = mix(bg2, bg1, t);
    let bg = Color::rgb(bg[0].round() as u8, bg[1].round() as u8, bg[2].round() as u8);
    assert!(close(px, mix(cfg.card.color, bg, cfg.card.opacity), 6.0), "card pixel {:?}", px);

    // Column 0 of the first row is covered by the translucent legend.
    let legend = layout.grid.as_ref().unwrap().legend.as_ref().unwrap();
    assert_eq!(legend.columns, 4);
}
