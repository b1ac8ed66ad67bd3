use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use weathermap::config::LoggingConfig;
use weathermap::input::{InputEvent, QueryDebouncer};
use weathermap::map::TerminalSurface;
use weathermap::{
    Coordinate, PlaceCandidate, Pipeline, Resolution, Trigger, WeatherMapConfig, WeatherMapError,
    web,
};

/// Interactive weather map: current weather for a place and the towns around it
#[derive(Debug, Parser)]
#[command(name = "weathermap", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List place suggestions for a partial query
    Suggest { query: String },
    /// Show weather for a searched place and nearby towns
    Weather {
        #[arg(short, long)]
        location: String,
    },
    /// Show weather for a coordinate, as if the map was clicked there
    At {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Read search input line by line; `#N` shows weather for suggestion N
    Interactive,
    /// Serve the map API over HTTP
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn init_tracing(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = WeatherMapConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config.logging, cli.verbose);

    match cli.command {
        None => print_overview(&cli, &config),
        Some(Command::Suggest { query }) => suggest(&config, &query).await?,
        Some(Command::Weather { location }) => {
            if location.trim().is_empty() {
                bail!(WeatherMapError::validation("Location cannot be empty"));
            }
            show(&config, Trigger::TextSearch { query: location }).await?;
        }
        Some(Command::At { lat, lon }) => {
            show(&config, Trigger::MapClick(Coordinate::new(lat, lon)?)).await?;
        }
        Some(Command::Interactive) => interactive(&config).await?,
        Some(Command::Serve { port }) => {
            web::run(&config, port.unwrap_or(config.web.port)).await?;
        }
    }

    Ok(())
}

fn print_overview(cli: &Cli, config: &WeatherMapConfig) {
    println!("WeatherMap {}", weathermap::VERSION);
    println!("Weather from Open-Meteo, places from OpenStreetMap Nominatim (no setup required).");
    println!("Run `weathermap --help` for commands.");

    if cli.verbose {
        let path = cli
            .config
            .clone()
            .or_else(WeatherMapConfig::get_config_path)
            .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());
        println!("Using config from: {path}");
        println!("Weather API: {}", config.providers.weather_base_url);
        println!("Geocoding API: {}", config.providers.geocoding_base_url);
        println!("Nearby radius: {} km", config.search.nearby_radius_km);
        println!("Log level: {}", config.logging.level);
    }
}

async fn suggest(config: &WeatherMapConfig, query: &str) -> Result<()> {
    let Some(query) = QueryDebouncer::from_config(&config.search).accepts(query) else {
        bail!(WeatherMapError::validation(format!(
            "Query must have at least {} characters",
            config.search.min_query_chars
        )));
    };

    let pipeline = Pipeline::from_config(config, TerminalSurface::stdout())?;
    let candidates = pipeline.suggest(query).await;
    if candidates.is_empty() {
        println!("No suggestions for '{query}'");
    }
    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "{}. {} ({})",
            i + 1,
            candidate.display_name,
            candidate.coordinate.format_coordinates()
        );
    }
    Ok(())
}

async fn show(config: &WeatherMapConfig, trigger: Trigger) -> Result<()> {
    let pipeline = Pipeline::from_config(config, TerminalSurface::stdout())?;
    if let Resolution::Rendered(view) = pipeline.run(trigger).await? {
        println!(
            "{} nearby places within {} km",
            view.nearby.len(),
            config.search.nearby_radius_km
        );
    }
    Ok(())
}

async fn interactive(config: &WeatherMapConfig) -> Result<()> {
    let pipeline = Pipeline::from_config(config, TerminalSurface::stdout())?;
    let (raw_tx, raw_rx) = mpsc::channel(32);
    let (event_tx, mut events) = mpsc::channel(32);
    QueryDebouncer::from_config(&config.search).spawn(raw_rx, event_tx);

    let mut raw_tx = Some(raw_tx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut suggestions: Vec<PlaceCandidate> = Vec::new();
    let mut running = None;

    println!("Type to search, #N to show a suggestion, Ctrl-D to quit");
    loop {
        tokio::select! {
            line = lines.next_line(), if raw_tx.is_some() => {
                let Some(line) = line? else {
                    // Closing the input lets the debouncer flush and stop
                    raw_tx = None;
                    continue;
                };

                if let Some(choice) = line.trim().strip_prefix('#') {
                    let picked = choice
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| suggestions.get(i));
                    match picked {
                        Some(candidate) => {
                            let pipeline = pipeline.clone();
                            let trigger = Trigger::Suggestion(candidate.clone());
                            running = Some(tokio::spawn(async move { pipeline.run(trigger).await }));
                        }
                        None => println!("No suggestion {choice}"),
                    }
                } else if let Some(tx) = &raw_tx {
                    tx.send(line).await?;
                }
            }
            event = events.recv() => match event {
                Some(InputEvent::Query(query)) => {
                    suggestions = pipeline.suggest(&query).await;
                    if suggestions.is_empty() {
                        println!("No suggestions for '{query}'");
                    }
                    for (i, candidate) in suggestions.iter().enumerate() {
                        println!("  #{} {}", i + 1, candidate.display_name);
                    }
                }
                Some(InputEvent::Clear) => suggestions.clear(),
                None => break,
            },
        }
    }

    if let Some(handle) = running {
        match handle.await? {
            Ok(resolution) => debug!("Last selection finished: {:?}", resolution),
            Err(e) => debug!("Last selection failed: {}", e),
        }
    }
    Ok(())
}
