//! Terminal rendering of the six dashboard views.
//!
//! `render` is the single dispatch point from a chart selection to the
//! analytics call behind it. Each view renders either as text tables or as
//! JSON for an external charting front-end.

use analytics::{AdrAdjustment, AnalyticsEngine, PeriodSummary};
use anyhow::Result;
use clap::ValueEnum;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use core_types::{BookingTable, Month};
use rust_decimal::Decimal;
use serde_json::json;
use std::fmt::Write;

/// The chart views offered by the sidebar selector of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    /// Per-month scatter of revenue against ADR.
    MonthlyAdrDistribution,
    /// The three ADR values earning the most revenue each month.
    TopAdrRevenueShare,
    /// Total bookings and average ADR per year over the whole dataset.
    YearOverYear,
    /// Revenue and average ADR for each month of the selected year.
    MonthlyComparison,
    /// Monthly trends plus the price-elasticity what-if for one month.
    SeasonalAnalysis,
    /// Revenue share by booking channel.
    ChannelMix,
}

impl ChartKind {
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::MonthlyAdrDistribution => "Monthly ADR Distribution",
            ChartKind::TopAdrRevenueShare => "Top 3 ADR Revenue Share",
            ChartKind::YearOverYear => "Year-over-Year Trends",
            ChartKind::MonthlyComparison => "Monthly Revenue & ADR Comparison",
            ChartKind::SeasonalAnalysis => "Seasonal Analysis",
            ChartKind::ChannelMix => "Channel Mix (OTA Sharing)",
        }
    }
}

/// What the user picked in the sidebar.
#[derive(Debug, Clone)]
pub struct Selection {
    pub year: i32,
    /// Only used by the seasonal what-if.
    pub month: Month,
    /// Only used by the seasonal what-if; `None` takes the control's default.
    pub adjusted_adr: Option<Decimal>,
    /// Currency label shown in column headings, e.g. "THB".
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Picks the year to show: the requested one if present, else the earliest.
pub fn resolve_year(table: &BookingTable, requested: Option<i32>) -> Result<i32> {
    let years = table.available_years();
    match requested {
        Some(year) if years.contains(&year) => Ok(year),
        Some(year) => anyhow::bail!("No bookings for year {year}; available years: {years:?}"),
        None => years
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("The bookings table is empty; there is no year to show")),
    }
}

/// Renders one chart view for the given selection.
pub fn render(
    kind: ChartKind,
    engine: &AnalyticsEngine,
    table: &BookingTable,
    selection: &Selection,
    format: OutputFormat,
) -> Result<String> {
    tracing::debug!(?kind, year = selection.year, "Rendering chart");
    match kind {
        ChartKind::MonthlyAdrDistribution => adr_distribution(engine, table, selection, format),
        ChartKind::TopAdrRevenueShare => top_adr_revenue_share(engine, table, selection, format),
        ChartKind::YearOverYear => year_over_year(engine, table, selection, format),
        ChartKind::MonthlyComparison => monthly_comparison(engine, table, selection, format),
        ChartKind::SeasonalAnalysis => seasonal_analysis(engine, table, selection, format),
        ChartKind::ChannelMix => channel_mix(engine, table, selection, format),
    }
}

fn adr_distribution(
    engine: &AnalyticsEngine,
    table: &BookingTable,
    selection: &Selection,
    format: OutputFormat,
) -> Result<String> {
    let distribution = engine.adr_distribution(engine.filter_by_year(table, selection.year));
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&distribution)?);
    }

    let mut out = heading(ChartKind::MonthlyAdrDistribution, Some(selection.year));
    for month in &distribution {
        writeln!(out, "\n{}", month.month)?;
        if month.points.is_empty() {
            writeln!(out, "No Data Available")?;
            continue;
        }
        let mut grid = new_table(vec![
            format!("Total Revenue ({})", selection.currency),
            format!("ADR ({})", selection.currency),
            "Occupancy".to_string(),
        ]);
        for point in &month.points {
            grid.add_row(vec![
                money_cell(point.total_price),
                money_cell(point.adr),
                number_cell(point.occupancy),
            ]);
        }
        writeln!(out, "{grid}")?;
    }
    Ok(out)
}

fn top_adr_revenue_share(
    engine: &AnalyticsEngine,
    table: &BookingTable,
    selection: &Selection,
    format: OutputFormat,
) -> Result<String> {
    let shares = engine.top_adr_revenue_share(engine.filter_by_year(table, selection.year));
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&shares)?);
    }

    let mut out = heading(ChartKind::TopAdrRevenueShare, Some(selection.year));
    for month in &shares {
        writeln!(out, "\n{} - Top {} ADR Share", month.month, month.top.len())?;
        let mut grid = new_table(vec![
            "Label".to_string(),
            format!("Revenue ({})", selection.currency),
            "Occupancy".to_string(),
        ]);
        for share in &month.top {
            let label = format!(
                "{} {} ({}%)",
                share.adr.round_dp(2),
                selection.currency,
                share.percent_share.round_dp(2)
            );
            grid.add_row(vec![
                Cell::new(label),
                money_cell(share.total_revenue),
                number_cell(share.total_occupancy),
            ]);
        }
        writeln!(out, "{grid}")?;
    }
    Ok(out)
}

fn year_over_year(
    engine: &AnalyticsEngine,
    table: &BookingTable,
    selection: &Selection,
    format: OutputFormat,
) -> Result<String> {
    let yearly = engine.year_over_year(table);
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&yearly)?);
    }

    let mut out = heading(ChartKind::YearOverYear, None);
    let mut grid = new_table(vec![
        "Year".to_string(),
        "Total Bookings".to_string(),
        format!("Average ADR ({})", selection.currency),
    ]);
    for row in &yearly {
        grid.add_row(vec![
            Cell::new(period_label(row)),
            number_cell(row.total_occupancy),
            optional_money_cell(row.average_adr),
        ]);
    }
    writeln!(out, "{grid}")?;
    Ok(out)
}

fn monthly_comparison(
    engine: &AnalyticsEngine,
    table: &BookingTable,
    selection: &Selection,
    format: OutputFormat,
) -> Result<String> {
    let summary = engine.monthly_summary(engine.filter_by_year(table, selection.year));
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&summary)?);
    }

    let mut out = heading(ChartKind::MonthlyComparison, Some(selection.year));
    writeln!(out, "{}", summary_table(&summary, &selection.currency))?;
    Ok(out)
}

fn seasonal_analysis(
    engine: &AnalyticsEngine,
    table: &BookingTable,
    selection: &Selection,
    format: OutputFormat,
) -> Result<String> {
    let summary = engine.monthly_summary(engine.filter_by_year(table, selection.year));
    let what_if =
        engine.seasonal_what_if(table, selection.year, selection.month, selection.adjusted_adr)?;
    let control = AdrAdjustment::for_current_adr(what_if.current_adr);

    if format == OutputFormat::Json {
        let view = json!({
            "summary": summary,
            "adjustment": control,
            "what_if": what_if,
        });
        return Ok(serde_json::to_string_pretty(&view)?);
    }

    let currency = &selection.currency;
    let mut out = heading(ChartKind::SeasonalAnalysis, Some(selection.year));
    writeln!(out, "{}", summary_table(&summary, currency))?;

    writeln!(
        out,
        "\nPrice What-If for {} {} (adjustable {}..={} in steps of {})",
        what_if.month, what_if.year, control.min, control.max, control.step
    )?;
    let projection = &what_if.projection;
    let mut grid = new_table(vec!["Metric".to_string(), "Value".to_string()]);
    let rows: Vec<(String, String)> = vec![
        ("Current bookings".into(), what_if.bookings.to_string()),
        (format!("Current ADR ({currency})"), money(what_if.current_adr)),
        (format!("2-year average ADR ({currency})"), money(what_if.trailing_adr)),
        (format!("Recommended ADR ({currency})"), money(projection.recommended_adr)),
        (format!("Adjusted ADR ({currency})"), money(what_if.adjusted_adr)),
        ("ADR change (%)".into(), optional_percent(projection.pct_change)),
        ("Booking change (%)".into(), optional_percent(projection.booking_pct_change)),
        ("Adjusted bookings".into(), projection.adjusted_bookings.to_string()),
        (format!("Projected revenue ({currency})"), money(projection.projected_revenue)),
        (format!("Previous revenue ({currency})"), money(projection.previous_revenue)),
        (format!("Revenue increase ({currency})"), money(projection.revenue_increase)),
    ];
    for (metric, value) in rows {
        grid.add_row(vec![
            Cell::new(metric),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    writeln!(out, "{grid}")?;
    Ok(out)
}

fn channel_mix(
    engine: &AnalyticsEngine,
    table: &BookingTable,
    selection: &Selection,
    format: OutputFormat,
) -> Result<String> {
    let mix = engine.channel_mix(engine.filter_by_year(table, selection.year));
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&mix)?);
    }

    let mut out = heading(ChartKind::ChannelMix, Some(selection.year));
    if !table.has_channel_column() {
        writeln!(out, "(source has no channel column; all bookings use the default channel)")?;
    }
    let mut grid = new_table(vec![
        "Channel".to_string(),
        format!("Revenue ({})", selection.currency),
        "Share (%)".to_string(),
    ]);
    for share in &mix {
        grid.add_row(vec![
            Cell::new(&share.channel),
            money_cell(share.total_revenue),
            Cell::new(share.percent_share.round_dp(2)).set_alignment(CellAlignment::Right),
        ]);
    }
    writeln!(out, "{grid}")?;
    Ok(out)
}

// --- Table helpers ---

fn heading(kind: ChartKind, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{} ({year})\n", kind.title()),
        None => format!("{}\n", kind.title()),
    }
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn summary_table(summary: &[PeriodSummary], currency: &str) -> Table {
    let mut grid = new_table(vec![
        "Month".to_string(),
        "Bookings".to_string(),
        format!("Total Revenue ({currency})"),
        format!("Average ADR ({currency})"),
        "Occupancy".to_string(),
    ]);
    for row in summary {
        grid.add_row(vec![
            Cell::new(period_label(row)),
            number_cell(row.bookings),
            money_cell(row.total_revenue),
            optional_money_cell(row.average_adr),
            number_cell(row.total_occupancy),
        ]);
    }
    grid
}

fn period_label(row: &PeriodSummary) -> String {
    match row.period {
        analytics::Period::Month(month) => month.to_string(),
        analytics::Period::Year(year) => year.to_string(),
    }
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn optional_percent(value: Option<Decimal>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v.round_dp(2)))
}

fn money_cell(value: Decimal) -> Cell {
    Cell::new(money(value)).set_alignment(CellAlignment::Right)
}

fn optional_money_cell(value: Option<Decimal>) -> Cell {
    let text = value.map_or_else(|| "-".to_string(), money);
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn number_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}
