use analytics::{AnalyticsConfig, AnalyticsEngine};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configuration::{LogLevel, LoggingSettings};
use core_types::{BookingTable, Month};
use dashboard::{ChartKind, OutputFormat, Selection};
use rust_decimal::Decimal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod dashboard;

/// The main entry point for the ADR Insight dashboard.
fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config().context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(&config.logging)?;

    // The bookings table is built once and only ever borrowed afterwards.
    let table = dataset::load_bookings(&config.dataset).with_context(|| {
        format!(
            "Failed to load bookings from {}",
            config.dataset.path.display()
        )
    })?;
    let engine = AnalyticsEngine::new(AnalyticsConfig::from(&config.pricing));
    let currency = config.dataset.currency_prefix.trim().to_string();

    // Execute the appropriate command
    match cli.command {
        Commands::Years => handle_years(&table),
        Commands::Chart(args) => handle_chart(args, &engine, &table, currency),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Hotel booking analytics: ADR trends, revenue shares and a price what-if.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Overrides the log level from config.toml (RUST_LOG still wins).
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the years present in the bookings data.
    Years,
    /// Render one chart view for a selected year.
    Chart(ChartArgs),
}

#[derive(Parser)]
struct ChartArgs {
    /// The chart view to render.
    #[arg(long, value_enum)]
    chart: ChartKind,

    /// The year to show. Defaults to the earliest year in the data.
    #[arg(long)]
    year: Option<i32>,

    /// Month for the seasonal what-if (e.g. "Jan").
    #[arg(long, default_value = "Jan")]
    month: Month,

    /// Adjusted ADR for the seasonal what-if. Defaults to the month's current ADR.
    #[arg(long)]
    adr: Option<Decimal>,

    /// Emit the chart data as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_years(table: &BookingTable) -> Result<()> {
    if table.is_empty() {
        println!("No bookings loaded.");
        return Ok(());
    }
    for year in table.available_years() {
        println!("{year}");
    }
    Ok(())
}

fn handle_chart(
    args: ChartArgs,
    engine: &AnalyticsEngine,
    table: &BookingTable,
    currency: String,
) -> Result<()> {
    let selection = Selection {
        year: dashboard::resolve_year(table, args.year)?,
        month: args.month,
        adjusted_adr: args.adr,
        currency,
    };
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let output = dashboard::render(args.chart, engine, table, &selection, format)?;
    println!("{output}");
    Ok(())
}

/// Sets up stderr logging, plus a daily rolling file when a directory is configured.
fn init_tracing(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_directive()));

    let (file_layer, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "adr-insight.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(guard)
}
