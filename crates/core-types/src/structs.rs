use crate::enums::Month;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Computes the average daily rate for one booking.
///
/// Returns zero when `occupancy` is not positive instead of dividing by it.
pub fn derive_adr(total_price: Decimal, occupancy: i64) -> Decimal {
    if occupancy <= 0 {
        return Decimal::ZERO;
    }
    total_price / Decimal::from(occupancy)
}

/// One cleaned booking with its derived calendar fields and ADR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub check_in_date: NaiveDate,
    pub total_price: Decimal,
    /// Always greater than zero for a retained record.
    pub occupancy: u32,
    pub channel: String,

    // Derived fields
    pub year: i32,
    pub month: Month,
    pub adr: Decimal,
}

impl BookingRecord {
    /// Builds a record and derives `year`, `month` and `adr` from the raw fields.
    pub fn new(
        check_in_date: NaiveDate,
        total_price: Decimal,
        occupancy: u32,
        channel: impl Into<String>,
    ) -> Self {
        // chrono guarantees month() is in 1..=12
        let month = Month::from_number(check_in_date.month()).unwrap_or(Month::Jan);
        Self {
            check_in_date,
            total_price,
            occupancy,
            channel: channel.into(),
            year: check_in_date.year(),
            month,
            adr: derive_adr(total_price, i64::from(occupancy)),
        }
    }
}

/// The immutable, fully prepared set of bookings.
///
/// Built once at start-up and shared by reference with every analytics call.
/// There is no way to mutate the records after construction.
#[derive(Debug, Clone, Default)]
pub struct BookingTable {
    records: Vec<BookingRecord>,
    years: Vec<i32>,
    has_channel_column: bool,
}

impl BookingTable {
    pub fn new(records: Vec<BookingRecord>, has_channel_column: bool) -> Self {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        Self {
            records,
            years: years.into_iter().collect(),
            has_channel_column,
        }
    }

    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present in the data, ascending.
    pub fn available_years(&self) -> &[i32] {
        &self.years
    }

    /// Whether the source carried a `channel` column, or the label was synthesized.
    pub fn has_channel_column(&self) -> bool {
        self.has_channel_column
    }
}
