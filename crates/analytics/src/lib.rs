//! # Booking Analytics Engine
//!
//! This crate turns the prepared `BookingTable` into the figures behind every
//! dashboard view: monthly and yearly summaries, ADR distributions, revenue
//! shares, and the price-elasticity what-if projection.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** It has no knowledge of files, terminals or charting. It
//!   depends only on `core-types` and the pricing section of `configuration`.
//! - **Stateless Calculation:** `AnalyticsEngine` never caches or mutates. It
//!   takes the table (or a selection of its records) and returns new values,
//!   so the same inputs always give the same outputs.
//! - **Empty Is Not An Error:** A selection with no bookings produces
//!   zero-valued rows, never a failure.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: filtering, aggregation, trailing ADR, elasticity.
//! - `AdrAdjustment`: range and default for the adjusted-ADR input.
//! - Report structs in `report`, all serializable.

// Declare the modules that constitute this crate.
pub mod config;
pub mod elasticity;
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use config::AnalyticsConfig;
pub use elasticity::AdrAdjustment;
pub use engine::{AnalyticsEngine, GroupBy};
pub use error::AnalyticsError;
pub use report::{
    AdrRevenueShare, ChannelShare, DistributionPoint, ElasticityProjection, MonthlyDistribution,
    MonthlyRevenueShare, Period, PeriodSummary, SeasonalWhatIf,
};
