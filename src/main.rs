use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use globe_weather::{
    GlobeConfig, LoadOutcome, MarkerOverlay, OpenWeatherClient, TooltipUpdate, Viewport,
    config::API_KEY_PLACEHOLDER, logging, web,
};

/// Frame interval of the globe rotation while serving
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "globe-weather", version, about = "Weather markers on a 3D globe")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch weather for the configured cities and list the markers
    Markers,
    /// Fetch markers, then hit-test one pointer position
    Pick {
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        #[arg(long, default_value_t = 1280)]
        width: u32,
        #[arg(long, default_value_t = 720)]
        height: u32,
    },
    /// Serve the overlay over HTTP while markers load in the background
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long, default_value_t = 1280)]
        width: u32,
        #[arg(long, default_value_t = 720)]
        height: u32,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GlobeConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;
    if config.weather.api_key == API_KEY_PLACEHOLDER {
        tracing::warn!("Weather API key is still the placeholder; every request will be rejected");
    }

    let client = OpenWeatherClient::new(&config.weather)?;

    match cli.command.unwrap_or(Command::Markers) {
        Command::Markers => {
            let overlay = MarkerOverlay::globe(&config, Viewport::new(1280, 720)?);
            let outcomes = overlay.load_cities(&client, &config.cities).await;
            print_outcomes(&outcomes);
            for marker in overlay.markers() {
                let sample = marker.sample();
                let p = marker.position();
                println!(
                    "  {:<16} {:>5}  {:<9} {}  ({:+.3}, {:+.3}, {:+.3})  {}",
                    sample.city,
                    sample.format_temperature(),
                    format!("{:?}", marker.spec.class).to_lowercase(),
                    marker.spec.color,
                    p.x,
                    p.y,
                    p.z,
                    sample.description
                );
            }
        }
        Command::Pick {
            x,
            y,
            width,
            height,
        } => {
            let overlay = MarkerOverlay::globe(&config, Viewport::new(width, height)?);
            let outcomes = overlay.load_cities(&client, &config.cities).await;
            print_outcomes(&outcomes);
            match overlay.on_pointer_move(x, y) {
                TooltipUpdate::Show { left, top, content } => {
                    println!("Tooltip at ({left}, {top}): {content}");
                }
                TooltipUpdate::Hide => println!("No marker under ({x}, {y})"),
            }
        }
        Command::Serve {
            port,
            width,
            height,
        } => {
            let overlay = Arc::new(MarkerOverlay::globe(&config, Viewport::new(width, height)?));

            let loader = Arc::clone(&overlay);
            let cities = config.cities.clone();
            tokio::spawn(async move {
                let outcomes = loader.load_cities(&client, &cities).await;
                print_outcomes(&outcomes);
            });

            let spinner = Arc::clone(&overlay);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(FRAME_INTERVAL);
                loop {
                    ticker.tick().await;
                    spinner.advance_frame();
                }
            });

            let port = port.unwrap_or(config.server.port);
            web::run(overlay, port, &config.server.static_dir).await?;
        }
    }

    Ok(())
}

fn print_outcomes(outcomes: &[LoadOutcome]) {
    let published = outcomes.iter().filter(|o| o.is_published()).count();
    println!("Published {published} of {} markers", outcomes.len());
    for outcome in outcomes {
        match outcome {
            LoadOutcome::Published { .. } => {}
            LoadOutcome::ConfigurationError { city, .. } => {
                println!("  {city}: invalid API key, check weather.api_key");
            }
            LoadOutcome::RequestError { city, error } => {
                println!("  {city}: {error}");
            }
        }
    }
}
