//! # Bookings Data Preparation
//!
//! Turns the raw bookings CSV into the immutable `BookingTable` consumed by
//! the analytics crate. This runs exactly once per process.
//!
//! - Currency-prefixed prices (`"THB 1234.00"`) become decimals.
//! - Occupancy strings (`"2 - Adults"`) become integer counts.
//! - Check-in dates gain derived `year`, `month` and `adr` fields.
//! - Bookings with no occupancy are dropped.
//! - A missing `channel` column is filled with the configured default.

pub mod error;
pub mod loader;
pub mod parse;

pub use error::DatasetError;
pub use loader::{load_bookings, prepare_bookings};
