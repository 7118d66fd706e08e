//! CLI entry point for the Majunga live feeds.
//!
//! Each subcommand fetches one domain through its fallback chain and prints
//! the normalized result as JSON, optionally appending CSV rows. `watch`
//! follows the weather feed while locale codes are read from stdin.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use majunga_feeds::{
    config::FeedConfig,
    feed::{FeedState, LiveFeed},
    flights::BoardView,
    i18n::{Locale, LocaleProvider},
    model::FetchContext,
    output::{append_records, print_json, print_pretty},
    service::MajungaFeeds,
    stats::BoardStats,
    weather::WeatherReport,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "majunga_feeds")]
#[command(about = "Weather, flights and tours for Majunga, with offline fallbacks", long_about = None)]
struct Cli {
    /// JSON config file; environment variables override it
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current conditions and 4-day forecast
    Weather {
        #[arg(short, long, default_value = "fr")]
        locale: Locale,

        /// CSV file to append the readings to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Today's departures and arrivals board
    Flights {
        #[arg(short, long, default_value = "fr")]
        locale: Locale,

        /// all, departures or arrivals
        #[arg(short, long, default_value = "all")]
        direction: BoardView,

        /// CSV file to append the flights to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Tour catalogue
    Tours {
        #[arg(short, long, default_value = "fr")]
        locale: Locale,

        /// CSV file to append the tours to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Airport shuttle timetable
    Shuttles {
        #[arg(short, long, default_value = "fr")]
        locale: Locale,

        /// CSV file to append the departures to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Follow the weather feed, switching locale on each stdin line
    Watch {
        #[arg(short, long, default_value = "fr")]
        locale: Locale,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/majunga_feeds.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("majunga_feeds.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let feeds = MajungaFeeds::from_config(&config)?;

    match cli.command {
        Commands::Weather { locale, output } => {
            let ctx = FetchContext::now(locale, feeds.offset);
            let report = feeds.weather.fetch_normalized(&ctx).await;
            info!(source = %report.source, provenance = %report.provenance, "Weather ready");

            print_json(&report)?;
            if let Some(path) = output {
                let rows = std::iter::once(&report.value.current).chain(&report.value.forecast);
                append_records(&path, rows)?;
            }
        }
        Commands::Flights {
            locale,
            direction,
            output,
        } => {
            let ctx = FetchContext::now(locale, feeds.offset);
            let board = feeds.flights.fetch_normalized(&ctx).await;

            let stats = BoardStats::from_fetched(&board);
            print_pretty(&stats);
            info!(
                source = %board.source,
                provenance = %board.provenance,
                live = stats.live,
                total = stats.total_flights,
                departures = stats.departures,
                arrivals = stats.arrivals,
                board_time_pct = stats.board_time_pct(),
                gate_pct = stats.gate_pct(),
                "Flight board ready"
            );

            let shown = direction.filter(&board.value);
            print_json(&shown)?;
            if let Some(path) = output {
                append_records(&path, shown.iter().copied())?;
            }
        }
        Commands::Tours { locale, output } => {
            let ctx = FetchContext::now(locale, feeds.offset);
            let tours = feeds.tours.fetch_normalized(&ctx).await;
            info!(source = %tours.source, count = tours.value.len(), "Tours ready");

            print_json(&tours)?;
            if let Some(path) = output {
                append_records(&path, tours.value.iter().map(|t| t.record()))?;
            }
        }
        Commands::Shuttles { locale, output } => {
            let ctx = FetchContext::now(locale, feeds.offset);
            let shuttles = feeds.shuttles.fetch_normalized(&ctx).await;
            info!(source = %shuttles.source, count = shuttles.value.len(), "Shuttles ready");

            print_json(&shuttles)?;
            if let Some(path) = output {
                append_records(&path, &shuttles.value)?;
            }
        }
        Commands::Watch { locale } => {
            watch_weather(&feeds, locale).await?;
        }
    }

    Ok(())
}

/// File config when given, then environment overrides on top.
fn load_config(path: Option<&str>) -> Result<FeedConfig> {
    match path {
        Some(path) => {
            let mut config = FeedConfig::load(path)?;
            config.apply_overrides(|name| std::env::var(name).ok())?;
            Ok(config)
        }
        None => FeedConfig::from_env(),
    }
}

/// Prints every published weather update until stdin closes.
#[tracing::instrument(skip(feeds), fields(locale = %locale))]
async fn watch_weather(feeds: &MajungaFeeds, locale: Locale) -> Result<()> {
    let feed = Arc::new(LiveFeed::new(feeds.weather.clone(), feeds.offset));
    let locales = LocaleProvider::new(locale);
    let mut updates = feed.subscribe();
    let follower = Arc::clone(&feed).follow_locale(locales.subscribe());
    let mut printed = 0;

    info!("Type a locale code (fr, en, it) per line; Ctrl+D to stop");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => switch_locale(&locales, &line),
                None => break,
            },
            changed = updates.changed() => {
                changed?;
                printed = print_update(&mut updates, printed)?;
            }
        }
    }

    drop(locales);
    follower.await?;

    // Wait for refreshes still in flight.
    loop {
        let state = feed.snapshot();
        if !state.loading && state.generation == printed {
            break;
        }
        updates.changed().await?;
        printed = print_update(&mut updates, printed)?;
    }
    Ok(())
}

fn switch_locale(locales: &LocaleProvider, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    match line.parse::<Locale>() {
        Ok(locale) => {
            if !locales.set(locale) {
                info!(%locale, "Locale unchanged");
            }
        }
        Err(e) => warn!(error = %e, "Ignoring input"),
    }
}

/// Prints the latest settled state if it is newer than `printed`.
fn print_update(
    updates: &mut watch::Receiver<FeedState<WeatherReport>>,
    printed: u64,
) -> Result<u64> {
    let state = updates.borrow_and_update().clone();
    match state.data {
        Some(data) if !state.loading && state.generation != printed => {
            info!(generation = state.generation, provenance = %data.provenance, "Weather updated");
            print_json(&data)?;
            Ok(state.generation)
        }
        _ => Ok(printed),
    }
}
