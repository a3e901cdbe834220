use crate::error::DatasetError;
use crate::parse::{parse_check_in, parse_occupancy, parse_total_price};
use configuration::DatasetSettings;
use core_types::{BookingRecord, BookingTable};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;

pub const TOTAL_PRICE_COLUMN: &str = "total_price";
pub const OCCUPANCY_COLUMN: &str = "occupancy";
pub const CHECK_IN_COLUMN: &str = "check_-_in";
pub const CHANNEL_COLUMN: &str = "channel";

const REQUIRED_COLUMNS: [&str; 3] = [TOTAL_PRICE_COLUMN, OCCUPANCY_COLUMN, CHECK_IN_COLUMN];

/// One row of the bookings file as it appears on disk. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawBooking {
    total_price: String,
    occupancy: String,
    #[serde(rename = "check_-_in")]
    check_in: String,
    #[serde(default)]
    channel: Option<String>,
}

/// Loads and prepares the bookings file named in the settings.
///
/// This is the one start-up step that touches the filesystem. Any malformed
/// required field aborts the whole load.
pub fn load_bookings(settings: &DatasetSettings) -> Result<BookingTable, DatasetError> {
    let file = File::open(&settings.path).map_err(|source| DatasetError::Io {
        path: settings.path.clone(),
        source,
    })?;

    tracing::info!(path = %settings.path.display(), "Loading bookings file");
    prepare_bookings(file, settings)
}

/// Reads bookings from any CSV source and turns them into a `BookingTable`.
///
/// 1. Check the header row for the required columns.
/// 2. Parse every row; the first parse failure is returned.
/// 3. Drop rows whose occupancy is not positive.
pub fn prepare_bookings<R: Read>(
    reader: R,
    settings: &DatasetSettings,
) -> Result<BookingTable, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn(column.to_string()));
        }
    }
    let has_channel_column = headers.iter().any(|h| h == CHANNEL_COLUMN);
    if !has_channel_column {
        tracing::warn!(
            default_channel = %settings.default_channel,
            "No channel column in source; every booking gets the default channel"
        );
    }

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for result in csv_reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawBooking = row.deserialize(Some(&headers))?;
        rows_read += 1;

        let total_price = parse_total_price(&raw.total_price, &settings.currency_prefix)
            .map_err(|reason| parse_error(line, TOTAL_PRICE_COLUMN, &raw.total_price, reason))?;
        let occupancy = parse_occupancy(&raw.occupancy)
            .map_err(|reason| parse_error(line, OCCUPANCY_COLUMN, &raw.occupancy, reason))?;
        let check_in_date = parse_check_in(&raw.check_in)
            .map_err(|reason| parse_error(line, CHECK_IN_COLUMN, &raw.check_in, reason))?;

        if occupancy <= 0 {
            tracing::debug!(line, occupancy, "Dropping booking without occupancy");
            rows_dropped += 1;
            continue;
        }
        let occupancy = u32::try_from(occupancy).map_err(|_| {
            parse_error(line, OCCUPANCY_COLUMN, &raw.occupancy, "occupancy out of range".to_string())
        })?;

        let channel = raw
            .channel
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| settings.default_channel.clone());

        records.push(BookingRecord::new(check_in_date, total_price, occupancy, channel));
    }

    let table = BookingTable::new(records, has_channel_column);
    tracing::info!(
        rows_read,
        rows_dropped,
        rows_kept = table.len(),
        years = ?table.available_years(),
        "Bookings prepared"
    );

    Ok(table)
}

fn parse_error(line: u64, column: &'static str, value: &str, reason: String) -> DatasetError {
    DatasetError::Parse {
        line,
        column,
        value: value.to_string(),
        reason,
    }
}
