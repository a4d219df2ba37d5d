use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};

use ramadan_wallpaper::data::{self, locations, AladhanClient, RamadanWindow, SourceConfig};
use ramadan_wallpaper::export::{self, ExportFormat};
use ramadan_wallpaper::rendering::{self, RasterOptions};
use ramadan_wallpaper::server::ApiServer;
use ramadan_wallpaper::{CanvasPreset, DayRecord, ThemeName, WallpaperConfig};

#[derive(Parser)]
#[command(name = "ramadan-wallpaper", version, about = "Ramadan prayer-time calendar wallpapers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a wallpaper image
    Render(RenderArgs),
    /// Print the day records as JSON
    Data {
        #[command(flatten)]
        location: LocationArgs,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the province/district directory as JSON
    Locations,
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long = "font-dir")]
        font_dirs: Vec<PathBuf>,
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct LocationArgs {
    #[arg(long)]
    province: Option<String>,
    #[arg(long)]
    district: Option<String>,
}

#[derive(Args)]
struct SourceArgs {
    /// Skip the network and use generated times
    #[arg(long)]
    offline: bool,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl SourceArgs {
    fn config(&self) -> SourceConfig {
        let mut cfg = SourceConfig::default();
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(ms) = self.timeout_ms {
            cfg.timeout_ms = ms;
        }
        cfg
    }
}

#[derive(Args)]
struct RenderArgs {
    /// TOML wallpaper configuration
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(flatten)]
    location: LocationArgs,
    #[arg(long, value_enum)]
    theme: Option<ThemeName>,
    #[arg(long, value_enum, conflicts_with_all = ["width", "height"])]
    preset: Option<CanvasPreset>,
    #[arg(long, requires = "height")]
    width: Option<u32>,
    #[arg(long, requires = "width")]
    height: Option<u32>,
    #[arg(long, value_enum, default_value_t = ExportFormat::Png)]
    format: ExportFormat,
    /// Output file or directory
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Day records JSON (as printed by `data`) instead of fetching
    #[arg(long)]
    data: Option<PathBuf>,
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
    #[command(flatten)]
    source: SourceArgs,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render(args),
        Command::Data { location, source } => {
            let loc = locations::resolve(location.province.as_deref(), location.district.as_deref());
            let days = acquire_days(&loc, &source)?;
            println!("{}", serde_json::to_string_pretty(&days)?);
            Ok(())
        }
        Command::Locations => {
            println!("{}", serde_json::to_string_pretty(&locations::Directory)?);
            Ok(())
        }
        Command::Serve { addr, config, font_dirs, source } => {
            let base = load_config(config.as_ref())?;
            let raster = RasterOptions { font_dirs, ..Default::default() };
            let server = ApiServer::new(source.config(), base, raster).context("failed to set up server")?;
            server.serve(&addr).with_context(|| format!("server on {} stopped", addr))?;
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<WallpaperConfig> {
    match path {
        Some(p) => WallpaperConfig::load(p).with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(WallpaperConfig::default()),
    }
}

fn acquire_days(location: &locations::ResolvedLocation, source: &SourceArgs) -> Result<Vec<DayRecord>> {
    let window = RamadanWindow::default();
    if source.offline {
        return Ok(data::offline(location, &window).days);
    }
    let client = AladhanClient::new(source.config())?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let acq = runtime.block_on(data::acquire(&client, location, &window));
    if let Some(notice) = &acq.notice {
        eprintln!("Using generated prayer times: {}", notice);
    }
    Ok(acq.days)
}

fn render(args: RenderArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(theme) = args.theme {
        config = config.with_theme(theme);
    }
    if let Some(preset) = args.preset {
        let size = preset.size();
        config = config.with_canvas(size.width, size.height);
    }
    if let (Some(w), Some(h)) = (args.width, args.height) {
        config = config.with_canvas(w, h);
    }

    let located = args.location.province.is_some() || args.location.district.is_some();
    let loc = locations::resolve(args.location.province.as_deref(), args.location.district.as_deref());
    if located {
        config = config.with_location(loc.display_name());
    }

    let days = match &args.data {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<Vec<DayRecord>>(&text)
                .with_context(|| format!("{} is not a day record list", path.display()))?
        }
        None => acquire_days(&loc, &args.source)?,
    };
    if days.is_empty() {
        log::warn!("no day records; rendering header only");
    }

    let options = RasterOptions { font_dirs: args.font_dirs, ..Default::default() };
    let shot = rendering::render_image(&config, &days, &options, args.format).context("render failed")?;

    let year = RamadanWindow::default().start.year();
    let name = export::file_name(&config.text.location, year, args.format);
    let target = args.output.unwrap_or_else(|| PathBuf::from("."));
    let written = export::write(&target, &shot.data, &name)?;
    println!("{} ({}x{})", written.display(), shot.width, shot.height);
    Ok(())
}
