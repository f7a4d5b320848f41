//! CLI entry point for the ride heatmap tool.
//!
//! Loads a ride sheet export, filters it to a time-of-day window, and either
//! renders the pickup/drop-off heatmaps to an HTML page or exports the
//! filtered points as CSV.

use anyhow::{Result, bail};
use chrono::NaiveTime;
use clap::{Args, Parser, Subcommand};
use ride_heatmap::{
    config::MapConfig,
    fetch::{BasicClient, load_source},
    loader::{SourceLayout, decompress, load_records},
    output::{print_json, print_pretty, write_html, write_points},
    pipeline::run_with_report,
    render::{RenderOptions, render_html},
    stats::FilterReport,
    types::{DisplayMode, PointSets, RideRecord, TimeRange},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ride_heatmap")]
#[command(about = "Pickup and drop-off heatmaps from a ride sheet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the heatmaps to a standalone HTML page
    Render {
        #[command(flatten)]
        filter: FilterArgs,

        /// Which categories to draw
        #[arg(long, value_enum, default_value_t = DisplayMode::Both)]
        show: DisplayMode,

        /// Hide the per-ride pin markers
        #[arg(long, default_value_t = false)]
        no_markers: bool,

        /// JSON file overriding map center, zoom and size
        #[arg(long)]
        map_config: Option<String>,

        /// HTML file to write
        #[arg(short, long, default_value = "ride_heatmap.html")]
        output: String,
    },
    /// Export the filtered pickup and drop-off points as CSV
    Points {
        #[command(flatten)]
        filter: FilterArgs,

        /// Which categories to export
        #[arg(long, value_enum, default_value_t = DisplayMode::Both)]
        show: DisplayMode,

        /// CSV file to write
        #[arg(short, long, default_value = "points.csv")]
        output: String,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Path or URL of the ride sheet CSV export (`.gz` is decompressed)
    #[arg(value_name = "FILE_OR_URL", default_value = "Data.csv")]
    source: String,

    /// Start of the time window, HH:MM or HH:MM:SS
    #[arg(long, default_value = "00:00", value_parser = parse_clock)]
    start: NaiveTime,

    /// End of the time window (inclusive), HH:MM or HH:MM:SS
    #[arg(long, default_value = "23:59", value_parser = parse_clock)]
    end: NaiveTime,

    /// Metadata rows before the first ride
    #[arg(long, default_value_t = SourceLayout::default().skip_rows)]
    skip_rows: usize,

    /// Zero-based column holding the ride time
    #[arg(long, default_value_t = SourceLayout::default().time_column)]
    time_column: usize,

    /// Zero-based column holding the pickup coordinates
    #[arg(long, default_value_t = SourceLayout::default().pickup_column)]
    pickup_column: usize,

    /// Zero-based column holding the drop-off coordinates
    #[arg(long, default_value_t = SourceLayout::default().dropoff_column)]
    dropoff_column: usize,
}

impl FilterArgs {
    fn layout(&self) -> SourceLayout {
        SourceLayout {
            skip_rows: self.skip_rows,
            time_column: self.time_column,
            pickup_column: self.pickup_column,
            dropoff_column: self.dropoff_column,
        }
    }

    fn range(&self) -> Result<TimeRange> {
        TimeRange::new(self.start, self.end)
    }
}

/// Accepts `HH:MM` or `HH:MM:SS` for the window bounds.
fn parse_clock(value: &str) -> Result<NaiveTime> {
    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M:%S") {
        return Ok(time);
    }
    match NaiveTime::parse_from_str(value, "%H:%M") {
        Ok(time) => Ok(time),
        Err(_) => bail!("expected HH:MM or HH:MM:SS, got {value:?}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ride_heatmap.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ride_heatmap.log"));

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

    match cli.command {
        Commands::Render {
            filter,
            show,
            no_markers,
            map_config,
            output,
        } => {
            let range = filter.range()?;
            let config = MapConfig::load_or_default(map_config.as_deref())?;
            let records = read_records(&filter).await?;

            let points = filter_records(&records, &range)?;
            let options = RenderOptions {
                mode: show,
                show_markers: !no_markers,
            };
            let html = render_html(&points, &options, &config)?;
            write_html(&output, &html)?;

            let (pickups, dropoffs) = points.visible(show);
            info!(
                output = %output,
                pickups = pickups.len(),
                dropoffs = dropoffs.len(),
                markers = options.show_markers,
                "Map rendered"
            );
        }
        Commands::Points {
            filter,
            show,
            output,
        } => {
            let range = filter.range()?;
            let records = read_records(&filter).await?;

            let points = filter_records(&records, &range)?;
            let (pickups, dropoffs) = points.visible(show);
            let written = write_points(&output, &[("pickup", pickups), ("dropoff", dropoffs)])?;

            info!(output = %output, written, "Points exported");
        }
    }

    Ok(())
}

/// Loads and parses the source sheet. Any failure here is fatal for the run.
#[tracing::instrument(skip(filter), fields(source = %filter.source))]
async fn read_records(filter: &FilterArgs) -> Result<Vec<RideRecord>> {
    let client = BasicClient::new();
    let result = async {
        let bytes = load_source(&client, &filter.source).await?;
        let bytes = decompress(&filter.source, bytes)?;
        load_records(&bytes, &filter.layout())
    }
    .await;

    match result {
        Ok(records) => {
            info!(records = records.len(), "Ride sheet loaded");
            Ok(records)
        }
        Err(e) => {
            error!(error = %e, "Failed to read ride sheet");
            Err(e)
        }
    }
}

/// Runs the time filter and logs what was dropped along the way.
fn filter_records(records: &[RideRecord], range: &TimeRange) -> Result<PointSets> {
    let (points, report) = run_with_report(records, range);
    log_report(&report, range);
    print_pretty(&report);
    print_json(&report)?;
    Ok(points)
}

fn log_report(report: &FilterReport, range: &TimeRange) {
    info!(
        start = %range.start,
        end = %range.end,
        rows = report.rows,
        in_range = report.in_range(),
        skipped = report.skipped_rows(),
        pickups = report.pickups,
        dropoffs = report.dropoffs,
        "Time filter applied"
    );

    if report.time_unparsed > 0 {
        warn!(
            time_unparsed = report.time_unparsed,
            pct = report.time_unparsed_pct(),
            "Rows with unreadable time were skipped"
        );
    }

    let invalid = report.pickup_invalid + report.dropoff_invalid;
    if invalid > 0 {
        warn!(
            pickup_invalid = report.pickup_invalid,
            dropoff_invalid = report.dropoff_invalid,
            "Unreadable coordinates were skipped"
        );
    }
}
