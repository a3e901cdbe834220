use crate::engine::{AnalyticsEngine, mean};
use crate::error::AnalyticsError;
use crate::report::{ElasticityProjection, SeasonalWhatIf};
use core_types::{BookingTable, Month};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::Serialize;

/// The range, step and starting value offered for the adjusted-ADR control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdrAdjustment {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
    pub default: Decimal,
}

impl AdrAdjustment {
    pub const STEP: Decimal = dec!(50);
    /// The upper bound never drops below this, so a zero ADR still has room to move.
    pub const MIN_UPPER_BOUND: Decimal = dec!(1000);

    /// Builds the control for a month whose current mean ADR is `current_adr`.
    pub fn for_current_adr(current_adr: Decimal) -> Self {
        let max = current_adr.saturating_mul(dec!(2)).max(Self::MIN_UPPER_BOUND);
        let default = if current_adr > Decimal::ZERO {
            current_adr
        } else {
            Self::MIN_UPPER_BOUND
        };
        Self {
            min: Decimal::ZERO,
            max,
            step: Self::STEP,
            default,
        }
    }

    /// Accepts `value` if it lies within the control's range.
    pub fn validate(&self, value: Decimal) -> Result<Decimal, AnalyticsError> {
        if value < self.min || value > self.max {
            return Err(AnalyticsError::AdjustmentOutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }
}

impl AnalyticsEngine {
    /// Projects bookings and revenue for a new ADR using a fixed price elasticity.
    ///
    /// # Arguments
    ///
    /// * `bookings` - The month's current booking count.
    /// * `current_adr` - The month's current mean ADR.
    /// * `trailing_adr` - The two-year trailing mean ADR (zero if unavailable).
    /// * `adjusted_adr` - The ADR to evaluate.
    ///
    /// With a zero current ADR there is no baseline to measure a change
    /// against, so bookings are left unchanged. A rate change too large to
    /// represent leaves the percentages undefined and saturates the booking
    /// count in the direction of the change.
    pub fn project(
        &self,
        bookings: u64,
        current_adr: Decimal,
        trailing_adr: Decimal,
        adjusted_adr: Decimal,
    ) -> ElasticityProjection {
        let reference_adr = if trailing_adr > Decimal::ZERO {
            trailing_adr
        } else {
            current_adr
        };
        let recommended_adr = reference_adr.saturating_mul(self.config.recommended_uplift);

        let (pct_change, booking_pct_change, adjusted_bookings) = if current_adr > Decimal::ZERO {
            match self.percent_changes(current_adr, adjusted_adr) {
                Some((pct_change, booking_pct_change)) => (
                    Some(pct_change),
                    Some(booking_pct_change),
                    scale_bookings(bookings, booking_pct_change),
                ),
                None => {
                    let bookings_fall =
                        (adjusted_adr > current_adr) == (self.config.elasticity < Decimal::ZERO);
                    let saturated = if bookings_fall { Decimal::MIN } else { Decimal::MAX };
                    tracing::warn!(
                        %current_adr,
                        %adjusted_adr,
                        "Rate change overflows; saturating projected bookings"
                    );
                    (None, None, scale_bookings(bookings, saturated))
                }
            }
        } else {
            (None, None, bookings)
        };

        let booked = Decimal::from(adjusted_bookings);
        let projected_revenue = adjusted_adr.saturating_mul(booked);
        let previous_revenue = trailing_adr.saturating_mul(booked);

        ElasticityProjection {
            recommended_adr,
            pct_change,
            booking_pct_change,
            adjusted_bookings,
            projected_revenue,
            previous_revenue,
            revenue_increase: projected_revenue.saturating_sub(previous_revenue),
        }
    }

    /// Percentage change in rate and the implied percentage change in
    /// bookings, or `None` if either is too large for a `Decimal`.
    fn percent_changes(
        &self,
        current_adr: Decimal,
        adjusted_adr: Decimal,
    ) -> Option<(Decimal, Decimal)> {
        let pct_change = adjusted_adr
            .checked_sub(current_adr)?
            .checked_div(current_adr)?
            .checked_mul(Decimal::ONE_HUNDRED)?;
        let booking_pct_change = pct_change.checked_mul(self.config.elasticity)?;
        Some((pct_change, booking_pct_change))
    }

    /// Runs the what-if projection for one month of one year.
    ///
    /// The booking count (summed occupancy) and current ADR come from that
    /// month's bookings; the trailing ADR comes from `two_year_avg_adr`.
    /// Without an explicit `adjusted_adr` the control's default is used.
    pub fn seasonal_what_if(
        &self,
        table: &BookingTable,
        year: i32,
        month: Month,
        adjusted_adr: Option<Decimal>,
    ) -> Result<SeasonalWhatIf, AnalyticsError> {
        let (adr_sum, count, bookings) = self
            .filter_by_year(table, year)
            .into_iter()
            .filter(|r| r.month == month)
            .fold((Decimal::ZERO, 0usize, 0u64), |(sum, count, occupied), r| {
                (sum + r.adr, count + 1, occupied + u64::from(r.occupancy))
            });

        let current_adr = mean(adr_sum, count).unwrap_or(Decimal::ZERO);
        let trailing_adr = self.two_year_avg_adr(table, month, year);

        let adjustment = AdrAdjustment::for_current_adr(current_adr);
        let adjusted_adr = match adjusted_adr {
            Some(value) => adjustment.validate(value)?,
            None => adjustment.default,
        };

        let projection = self.project(bookings, current_adr, trailing_adr, adjusted_adr);
        tracing::debug!(
            year,
            %month,
            bookings,
            %current_adr,
            %trailing_adr,
            %adjusted_adr,
            adjusted_bookings = projection.adjusted_bookings,
            "Seasonal what-if computed"
        );

        Ok(SeasonalWhatIf {
            year,
            month,
            bookings,
            current_adr,
            trailing_adr,
            adjusted_adr,
            projection,
        })
    }
}

/// Applies a percentage change to a booking count, rounding half-to-even.
///
/// Never negative; saturates at `u64::MAX`.
fn scale_bookings(bookings: u64, booking_pct_change: Decimal) -> u64 {
    let factor = Decimal::ONE.saturating_add(booking_pct_change / Decimal::ONE_HUNDRED);
    if factor <= Decimal::ZERO {
        return 0;
    }
    Decimal::from(bookings)
        .saturating_mul(factor)
        .round()
        .to_u64()
        .unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use chrono::NaiveDate;
    use core_types::BookingRecord;

    fn booking(y: i32, m: u32, price: Decimal) -> BookingRecord {
        occupied_booking(y, m, price, 1)
    }

    fn occupied_booking(y: i32, m: u32, price: Decimal, occupancy: u32) -> BookingRecord {
        let date = NaiveDate::from_ymd_opt(y, m, 10).unwrap();
        BookingRecord::new(date, price, occupancy, "OTA")
    }

    #[test]
    fn ten_percent_rate_rise_loses_twelve_percent_of_bookings() {
        let engine = AnalyticsEngine::default();
        let projection = engine.project(50, dec!(100), dec!(90), dec!(110));

        assert_eq!(projection.pct_change, Some(dec!(10)));
        assert_eq!(projection.booking_pct_change, Some(dec!(-12)));
        assert_eq!(projection.adjusted_bookings, 44);
        assert_eq!(projection.recommended_adr, dec!(99));
        assert_eq!(projection.projected_revenue, dec!(4840));
        assert_eq!(projection.previous_revenue, dec!(3960));
        assert_eq!(projection.revenue_increase, dec!(880));
    }

    #[test]
    fn zero_current_adr_leaves_bookings_unchanged() {
        let engine = AnalyticsEngine::default();
        for adjusted in [dec!(0), dec!(500), dec!(5000)] {
            let projection = engine.project(37, Decimal::ZERO, Decimal::ZERO, adjusted);
            assert_eq!(projection.adjusted_bookings, 37);
            assert_eq!(projection.pct_change, None);
            assert_eq!(projection.recommended_adr, Decimal::ZERO);
        }
    }

    #[test]
    fn large_rate_rise_clamps_bookings_at_zero() {
        let engine = AnalyticsEngine::default();
        let projection = engine.project(50, dec!(100), dec!(100), dec!(1000));
        assert_eq!(projection.adjusted_bookings, 0);
        assert_eq!(projection.projected_revenue, Decimal::ZERO);
        assert_eq!(projection.revenue_increase, Decimal::ZERO);
    }

    #[test]
    fn overflowing_rate_change_does_not_panic() {
        let engine = AnalyticsEngine::default();
        let projection = engine.project(10, dec!(0.0000000000000000000000001), dec!(0), dec!(1000));
        assert_eq!(projection.pct_change, None);
        assert_eq!(projection.booking_pct_change, None);
        assert_eq!(projection.adjusted_bookings, 0);
        assert_eq!(projection.projected_revenue, Decimal::ZERO);
    }

    #[test]
    fn projected_bookings_saturate_instead_of_wrapping_to_zero() {
        let engine = AnalyticsEngine::default();
        // -50% rate => +60% bookings, beyond u64::MAX
        let projection = engine.project(u64::MAX, dec!(100), dec!(0), dec!(50));
        assert_eq!(projection.adjusted_bookings, u64::MAX);
        assert!(projection.projected_revenue > Decimal::ZERO);
    }

    #[test]
    fn rate_cut_gains_bookings() {
        let engine = AnalyticsEngine::default();
        let projection = engine.project(10, dec!(200), Decimal::ZERO, dec!(100));
        // -50% rate => +60% bookings
        assert_eq!(projection.adjusted_bookings, 16);
        // No trailing ADR: recommendation falls back to the current ADR.
        assert_eq!(projection.recommended_adr, dec!(220));
    }

    #[test]
    fn rounding_is_half_to_even() {
        let engine = AnalyticsEngine::default();
        // 5 * (1 - 0.06) = 4.7 -> 5; 25 * (1 - 0.06) = 23.5 -> 24
        assert_eq!(engine.project(5, dec!(100), dec!(0), dec!(105)).adjusted_bookings, 5);
        assert_eq!(engine.project(25, dec!(100), dec!(0), dec!(105)).adjusted_bookings, 24);

        let unit = AnalyticsEngine::new(AnalyticsConfig {
            elasticity: dec!(-1),
            ..AnalyticsConfig::default()
        });
        // 15 * 0.9 = 13.5 -> 14; 25 * 0.9 = 22.5 -> 22
        assert_eq!(unit.project(15, dec!(100), dec!(0), dec!(110)).adjusted_bookings, 14);
        assert_eq!(unit.project(25, dec!(100), dec!(0), dec!(110)).adjusted_bookings, 22);
    }

    #[test]
    fn adjustment_control_range_follows_current_adr() {
        let control = AdrAdjustment::for_current_adr(dec!(800));
        assert_eq!(control.max, dec!(1600));
        assert_eq!(control.default, dec!(800));
        assert_eq!(control.step, dec!(50));

        let low = AdrAdjustment::for_current_adr(dec!(300));
        assert_eq!(low.max, dec!(1000));

        let zero = AdrAdjustment::for_current_adr(Decimal::ZERO);
        assert_eq!(zero.min, Decimal::ZERO);
        assert_eq!(zero.max, dec!(1000));
        assert_eq!(zero.default, dec!(1000));
    }

    #[test]
    fn adjustment_control_rejects_out_of_range_values() {
        let control = AdrAdjustment::for_current_adr(dec!(800));
        assert_eq!(control.validate(dec!(1600)).unwrap(), dec!(1600));
        assert!(matches!(
            control.validate(dec!(1601)),
            Err(AnalyticsError::AdjustmentOutOfRange { .. })
        ));
        assert!(control.validate(dec!(-1)).is_err());
    }

    #[test]
    fn seasonal_what_if_uses_month_bookings_and_trailing_adr() {
        let engine = AnalyticsEngine::default();
        let table = BookingTable::new(
            vec![
                booking(2021, 1, dec!(80)),
                booking(2022, 1, dec!(100)),
                booking(2023, 1, dec!(100)),
                booking(2023, 1, dec!(100)),
                booking(2023, 2, dec!(400)),
            ],
            false,
        );

        let what_if = engine
            .seasonal_what_if(&table, 2023, Month::Jan, Some(dec!(110)))
            .unwrap();
        assert_eq!(what_if.bookings, 2);
        assert_eq!(what_if.current_adr, dec!(100));
        assert_eq!(what_if.trailing_adr, dec!(90));
        assert_eq!(what_if.projection.pct_change, Some(dec!(10)));
        // 2 * 0.88 = 1.76 -> 2
        assert_eq!(what_if.projection.adjusted_bookings, 2);
        assert_eq!(what_if.projection.recommended_adr, dec!(99));
    }

    #[test]
    fn seasonal_what_if_counts_occupancy_as_bookings() {
        let engine = AnalyticsEngine::default();
        let table = BookingTable::new(
            vec![
                occupied_booking(2023, 1, dec!(400), 4),
                occupied_booking(2023, 1, dec!(600), 6),
            ],
            false,
        );

        let what_if = engine
            .seasonal_what_if(&table, 2023, Month::Jan, Some(dec!(110)))
            .unwrap();
        assert_eq!(what_if.bookings, 10);
        assert_eq!(what_if.current_adr, dec!(100));
        // 10 * 0.88 = 8.8 -> 9
        assert_eq!(what_if.projection.adjusted_bookings, 9);
        assert_eq!(what_if.projection.projected_revenue, dec!(990));
    }

    #[test]
    fn seasonal_what_if_for_empty_month_uses_defaults() {
        let engine = AnalyticsEngine::default();
        let table = BookingTable::new(vec![booking(2023, 1, dec!(100))], false);

        let what_if = engine.seasonal_what_if(&table, 2023, Month::Jul, None).unwrap();
        assert_eq!(what_if.bookings, 0);
        assert_eq!(what_if.current_adr, Decimal::ZERO);
        assert_eq!(what_if.adjusted_adr, dec!(1000));
        assert_eq!(what_if.projection.adjusted_bookings, 0);
    }

    #[test]
    fn seasonal_what_if_rejects_adjustment_outside_control() {
        let engine = AnalyticsEngine::default();
        let table = BookingTable::new(vec![booking(2023, 1, dec!(100))], false);
        let result = engine.seasonal_what_if(&table, 2023, Month::Jan, Some(dec!(5000)));
        assert!(matches!(result, Err(AnalyticsError::AdjustmentOutOfRange { .. })));
    }
}
