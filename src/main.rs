//! CLI entry point for the bike-share trip dashboard.
//!
//! Loads a trip export and prints or exports the tables a dashboard draws:
//! trips per day, hour and membership type, mean duration per membership
//! type, station locations and routes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use divvy_trips::analyzers::{
    TripSummary, find_location, route_segments, station_conflicts, unique_stations,
    unique_stations_strict,
};
use divvy_trips::cache::TableCache;
use divvy_trips::config::AppConfig;
use divvy_trips::output::{export_tables, print_pretty, write_json, write_rows_csv, write_trips_csv};
use divvy_trips::TripTable;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "divvy_trips")]
#[command(about = "Descriptive statistics for bike-share trip exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every aggregate as JSON
    Summary {
        /// Trip CSV (defaults to TRIPS_DATA_PATH)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Only count trips that started at this station
        #[arg(short, long)]
        station: Option<String>,
    },
    /// List every station with its location as CSV
    Stations {
        /// Trip CSV (defaults to TRIPS_DATA_PATH)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Fail if a station is reported at more than one location
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// List start stations in the order they first appear
    StartStations {
        /// Trip CSV (defaults to TRIPS_DATA_PATH)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Print the location of a single station
    Locate {
        /// Station name, as written in the export
        station: String,

        /// Trip CSV (defaults to TRIPS_DATA_PATH)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show the first trips of the table
    Head {
        /// Trip CSV (defaults to TRIPS_DATA_PATH)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Number of trips to show
        #[arg(
            short = 'n',
            long,
            default_value_t = 10,
            value_parser = clap::value_parser!(u16).range(0..=100)
        )]
        count: u16,

        /// Only show trips that started at this station
        #[arg(short, long)]
        station: Option<String>,
    },
    /// Write every table as CSV for a charting front end
    Export {
        /// Trip CSV (defaults to TRIPS_DATA_PATH)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Directory to write CSV files into
        #[arg(short, long, default_value = "charts")]
        output_dir: PathBuf,

        /// Only count trips that started at this station
        #[arg(short, long)]
        station: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let config = AppConfig::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = config
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = config
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("divvy_trips.log"));

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
    let mut cache = TableCache::new();
    let stdout = io::stdout();

    match cli.command {
        Commands::Summary { file, station } => {
            let table = load(&mut cache, &config, file)?;
            let table = by_station(&table, station.as_deref());
            let summary = TripSummary::compute(&table)?;

            print_pretty(&summary);
            write_json(stdout.lock(), &summary)?;
        }
        Commands::Stations { file, strict } => {
            let table = load(&mut cache, &config, file)?;
            let stations = if strict {
                unique_stations_strict(&table)?
            } else {
                let conflicts = station_conflicts(&table);
                for c in &conflicts {
                    warn!(
                        station = %c.station_name,
                        resolved = %c.resolved,
                        other = %c.other,
                        "Station has conflicting coordinates, keeping the first"
                    );
                }
                unique_stations(&table)
            };

            info!(stations = stations.len(), "Stations resolved");
            write_rows_csv(stdout.lock(), &stations)?;
        }
        Commands::StartStations { file } => {
            let table = load(&mut cache, &config, file)?;
            for name in table.start_station_names() {
                println!("{name}");
            }
        }
        Commands::Locate { station, file } => {
            let table = load(&mut cache, &config, file)?;
            let at = find_location(&table, &station)?;
            println!("{},{}", at.lat, at.lng);
        }
        Commands::Head {
            file,
            count,
            station,
        } => {
            let table = load(&mut cache, &config, file)?;
            let table = by_station(&table, station.as_deref());
            write_trips_csv(stdout.lock(), table.head(usize::from(count)))?;
        }
        Commands::Export {
            file,
            output_dir,
            station,
        } => {
            let table = load(&mut cache, &config, file)?;
            let table = by_station(&table, station.as_deref());
            let summary = TripSummary::compute(&table)?;
            let routes = route_segments(&table);

            let written = export_tables(&output_dir, &summary, &routes)
                .with_context(|| format!("exporting tables to {}", output_dir.display()))?;
            for path in written {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Loads the trip table from `file`, or from the configured default path.
#[tracing::instrument(skip(cache, config))]
fn load(
    cache: &mut TableCache,
    config: &AppConfig,
    file: Option<PathBuf>,
) -> Result<Arc<TripTable>> {
    let path = file.unwrap_or_else(|| config.trips_data_path.clone());
    cache
        .get_or_load(&path)
        .with_context(|| format!("loading trips from {}", path.display()))
}

/// Narrows the table to trips that started at `station`, if one is given.
fn by_station<'a>(table: &'a TripTable, station: Option<&str>) -> Cow<'a, TripTable> {
    match station {
        Some(name) => {
            let filtered = table.filter_by_start_station(name);
            if filtered.is_empty() {
                warn!(station = name, "No trips start at this station");
            } else {
                info!(station = name, trips = filtered.len(), "Filtered by start station");
            }
            Cow::Owned(filtered)
        }
        None => Cow::Borrowed(table),
    }
}
