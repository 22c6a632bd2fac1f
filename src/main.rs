//! CLI entry point for the GPS trip processor.
//!
//! Reads raw GPS fixes from a CSV file, diverts malformed rows to a reject
//! log, segments the remaining points into trips, and writes the trips with
//! their summary statistics as a GeoJSON feature collection.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use gps_trip_processor::features::build_collection;
use gps_trip_processor::output::{write_geojson, write_rejects};
use gps_trip_processor::parser::load_points;
use gps_trip_processor::trips::segment::{segment, sort_chronologically};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gps_trip_processor")]
#[command(about = "Segments raw GPS fixes into trips and emits GeoJSON", long_about = None)]
struct Cli {
    /// CSV file of raw GPS fixes (device id, latitude, longitude, timestamp)
    #[arg(short, long, default_value = "points.csv")]
    input: PathBuf,

    /// File receiving the raw text of rejected rows
    #[arg(short, long, default_value = "rejects.log")]
    rejects: PathBuf,

    /// GeoJSON file receiving the trip feature collection
    #[arg(short, long, default_value = "output.geojson")]
    output: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/gps_trip_processor.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gps_trip_processor.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let outcome = load_points(&cli.input)?;
    write_rejects(&cli.rejects, &outcome.rejects)?;

    let mut points = outcome.points;
    sort_chronologically(&mut points);

    let trips = segment(points);
    let collection = build_collection(&trips)?;
    write_geojson(&cli.output, &collection)?;

    info!(
        trips = trips.len(),
        rejects = outcome.rejects.len(),
        output = %cli.output.display(),
        "Processing complete"
    );

    Ok(())
}
