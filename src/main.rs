//! # Weather Dashboard Entry Point
//!
//! This binary loads configuration and assets, then either serves the dashboard
//! over HTTP or renders it once for local inspection.
//!
//! - default: serve `GET /` on the configured port
//! - `--output <path>`: render once and write the BMP
//! - `--stdout`: render once and print an ASCII preview
//! - `--fixture`: use the built-in forecast instead of calling the provider

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use weather_dash_lib::{
    assets::Assets,
    bmp,
    config::{Config, DEFAULT_CONFIG_PATH},
    fixture::FixtureSource,
    forecast_data::{ForecastSource, TomorrowIoSource},
    renderer::{draw_ascii, DashboardRenderer},
    server::{self, AppState},
};

#[derive(Parser, Debug)]
#[command(name = "weather-dashboard")]
#[command(about = "Render a 400x300 1-bit weather dashboard and serve it as a BMP")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Port to listen on (overrides the config file and PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Use the built-in fixture forecast instead of the provider
    #[arg(long)]
    fixture: bool,

    /// Render once to this BMP file and exit
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Render once and print an ASCII preview
    #[arg(long)]
    stdout: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load_from_path(&cli.config);
    let port = cli.port.unwrap_or(config.server.port);

    let source: Arc<dyn ForecastSource> = if cli.fixture {
        info!("Using fixture forecast");
        Arc::new(FixtureSource)
    } else {
        if config.provider.api_key.is_empty() {
            warn!("No API key configured; set TOMORROW_API_KEY or provider.api_key");
        }
        Arc::new(
            TomorrowIoSource::new(&config.provider.base_url, &config.provider.api_key)
                .context("building forecast client")?,
        )
    };

    let assets = Arc::new(Assets::load(&config.assets.icons_dir));
    let renderer = DashboardRenderer::new(assets, config.timezone());
    let state = Arc::new(AppState {
        config,
        source,
        renderer,
    });

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    if cli.output.is_some() || cli.stdout {
        let forecast = rt
            .block_on(state.source.fetch(&state.config.location()))
            .context("fetching forecast")?;
        let updated_at = chrono::Utc::now().with_timezone(&state.renderer.timezone());
        let canvas = state
            .renderer
            .render(&forecast, updated_at)
            .context("rendering dashboard")?;

        if cli.stdout {
            draw_ascii(&canvas);
        }
        if let Some(path) = &cli.output {
            std::fs::write(path, bmp::encode(&canvas))
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "Dashboard written");
        }
        return Ok(());
    }

    rt.block_on(server::serve(state, port))
}
