use core_types::Month;
use rust_decimal::Decimal;
use serde::Serialize;

/// The key a summary row is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Month(Month),
    Year(i32),
}

/// Aggregated figures for one month or one year of bookings.
///
/// A month with no bookings is still represented: zero sums and no average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub bookings: usize,
    /// Sum of `total_price`.
    pub total_revenue: Decimal,
    /// Sum of `occupancy`.
    pub total_occupancy: u64,
    /// Mean ADR. `None` when there are no bookings to average.
    pub average_adr: Option<Decimal>,
}

impl PeriodSummary {
    /// Creates a new, zeroed-out summary for the given period.
    pub fn empty(period: Period) -> Self {
        Self {
            period,
            bookings: 0,
            total_revenue: Decimal::ZERO,
            total_occupancy: 0,
            average_adr: None,
        }
    }
}

/// One booking plotted in the monthly ADR distribution view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionPoint {
    pub total_price: Decimal,
    pub adr: Decimal,
    pub occupancy: u32,
}

/// All distribution points for one month. Empty when the month has no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyDistribution {
    pub month: Month,
    pub points: Vec<DistributionPoint>,
}

/// Revenue earned at one distinct ADR value within a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdrRevenueShare {
    pub adr: Decimal,
    pub total_revenue: Decimal,
    pub total_occupancy: u64,
    /// Share of the month's total revenue, 0-100.
    pub percent_share: Decimal,
}

/// The highest-earning ADR values of one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenueShare {
    pub month: Month,
    pub month_revenue: Decimal,
    pub top: Vec<AdrRevenueShare>,
}

/// Revenue attributed to one booking channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelShare {
    pub channel: String,
    pub total_revenue: Decimal,
    /// Share of the selection's total revenue, 0-100.
    pub percent_share: Decimal,
}

/// Output of the price-elasticity what-if model. All figures are produced together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElasticityProjection {
    pub recommended_adr: Decimal,
    /// Percentage change from the current ADR. `None` when the current ADR is zero.
    pub pct_change: Option<Decimal>,
    /// Expected percentage change in bookings. `None` when the current ADR is zero.
    pub booking_pct_change: Option<Decimal>,
    pub adjusted_bookings: u64,
    pub projected_revenue: Decimal,
    pub previous_revenue: Decimal,
    pub revenue_increase: Decimal,
}

/// The elasticity projection for one month, with the inputs it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalWhatIf {
    pub year: i32,
    pub month: Month,
    pub bookings: u64,
    pub current_adr: Decimal,
    pub trailing_adr: Decimal,
    pub adjusted_adr: Decimal,
    pub projection: ElasticityProjection,
}
