use crate::config::AnalyticsConfig;
use crate::report::{
    AdrRevenueShare, ChannelShare, DistributionPoint, MonthlyDistribution, MonthlyRevenueShare,
    Period, PeriodSummary,
};
use core_types::{BookingRecord, BookingTable, Month};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// The key used by `AnalyticsEngine::aggregate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Month,
    Year,
}

/// A stateless calculator for deriving booking metrics from a prepared table.
///
/// Nothing here mutates the table; every call recomputes from its inputs.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    pub(crate) config: AnalyticsConfig,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Returns all bookings whose check-in falls in `year`.
    ///
    /// A year that is not in the data simply yields an empty selection.
    pub fn filter_by_year<'a>(&self, table: &'a BookingTable, year: i32) -> Vec<&'a BookingRecord> {
        let selected: Vec<_> = table.records().iter().filter(|r| r.year == year).collect();
        tracing::debug!(year, bookings = selected.len(), "Filtered bookings by year");
        selected
    }

    /// Groups bookings by month or year and sums revenue and occupancy.
    ///
    /// Grouping by month always returns 12 rows in calendar order, with empty
    /// months zero-filled. Grouping by year returns one row per year present,
    /// ascending.
    pub fn aggregate<'a, I>(&self, records: I, group_by: GroupBy) -> Vec<PeriodSummary>
    where
        I: IntoIterator<Item = &'a BookingRecord>,
    {
        let mut groups: BTreeMap<Period, Accumulator> = BTreeMap::new();
        if group_by == GroupBy::Month {
            for month in Month::ALL {
                groups.insert(Period::Month(month), Accumulator::default());
            }
        }

        for record in records {
            let key = match group_by {
                GroupBy::Month => Period::Month(record.month),
                GroupBy::Year => Period::Year(record.year),
            };
            groups.entry(key).or_default().add(record);
        }

        groups
            .into_iter()
            .map(|(period, acc)| acc.finish(period))
            .collect()
    }

    /// Twelve monthly rows for a selection of bookings.
    pub fn monthly_summary<'a, I>(&self, records: I) -> Vec<PeriodSummary>
    where
        I: IntoIterator<Item = &'a BookingRecord>,
    {
        self.aggregate(records, GroupBy::Month)
    }

    /// One row per year over the whole table (the year-over-year trend).
    pub fn year_over_year(&self, table: &BookingTable) -> Vec<PeriodSummary> {
        self.aggregate(table.records(), GroupBy::Year)
    }

    /// Mean ADR of `month` over the two data-bearing years before `year`.
    ///
    /// "Two years back" is positional on the sorted list of years present in
    /// the data, so a gap year is skipped rather than counted. Returns zero
    /// when there are fewer than two earlier years or no matching bookings.
    pub fn two_year_avg_adr(&self, table: &BookingTable, month: Month, year: i32) -> Decimal {
        let years = table.available_years();
        if years.len() < 2 {
            return Decimal::ZERO;
        }

        let position = match years.iter().position(|&y| y == year) {
            Some(idx) if idx >= 2 => idx,
            _ => return Decimal::ZERO,
        };
        let prior_years = &years[position - 2..position];

        let (sum, count) = table
            .records()
            .iter()
            .filter(|r| r.month == month && prior_years.contains(&r.year))
            .fold((Decimal::ZERO, 0usize), |(sum, count), r| (sum + r.adr, count + 1));

        tracing::debug!(%month, year, ?prior_years, count, "Computed trailing two-year ADR");

        mean(sum, count).unwrap_or(Decimal::ZERO)
    }

    /// Per-month scatter data: one point per booking, 12 entries in calendar order.
    pub fn adr_distribution<'a, I>(&self, records: I) -> Vec<MonthlyDistribution>
    where
        I: IntoIterator<Item = &'a BookingRecord>,
    {
        let mut distribution: Vec<MonthlyDistribution> = Month::ALL
            .iter()
            .map(|&month| MonthlyDistribution { month, points: Vec::new() })
            .collect();

        for record in records {
            distribution[record.month.index()].points.push(DistributionPoint {
                total_price: record.total_price,
                adr: record.adr,
                occupancy: record.occupancy,
            });
        }

        distribution
    }

    /// For each month with data, the ADR values that earned the most revenue.
    ///
    /// Bookings are grouped by identical ADR. Each group's share is taken
    /// against the month's total revenue, then the configured number of
    /// groups is kept, highest revenue first. Months without data are omitted.
    pub fn top_adr_revenue_share<'a, I>(&self, records: I) -> Vec<MonthlyRevenueShare>
    where
        I: IntoIterator<Item = &'a BookingRecord>,
    {
        let mut by_month: BTreeMap<Month, BTreeMap<Decimal, (Decimal, u64)>> = BTreeMap::new();
        for record in records {
            let entry = by_month
                .entry(record.month)
                .or_default()
                .entry(record.adr)
                .or_insert((Decimal::ZERO, 0));
            entry.0 += record.total_price;
            entry.1 += u64::from(record.occupancy);
        }

        by_month
            .into_iter()
            .map(|(month, groups)| {
                let month_revenue: Decimal = groups.values().map(|(revenue, _)| *revenue).sum();

                let mut shares: Vec<AdrRevenueShare> = groups
                    .into_iter()
                    .map(|(adr, (total_revenue, total_occupancy))| AdrRevenueShare {
                        adr,
                        total_revenue,
                        total_occupancy,
                        percent_share: percent_of(total_revenue, month_revenue),
                    })
                    .collect();
                // Stable sort keeps ascending ADR order among equal revenues.
                shares.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
                shares.truncate(self.config.top_share_count);

                MonthlyRevenueShare {
                    month,
                    month_revenue,
                    top: shares,
                }
            })
            .collect()
    }

    /// Revenue per booking channel and its share of the selection's total.
    pub fn channel_mix<'a, I>(&self, records: I) -> Vec<ChannelShare>
    where
        I: IntoIterator<Item = &'a BookingRecord>,
    {
        let mut by_channel: BTreeMap<&str, Decimal> = BTreeMap::new();
        for record in records {
            *by_channel.entry(record.channel.as_str()).or_default() += record.total_price;
        }

        let total: Decimal = by_channel.values().copied().sum();

        by_channel
            .into_iter()
            .map(|(channel, total_revenue)| ChannelShare {
                channel: channel.to_string(),
                total_revenue,
                percent_share: percent_of(total_revenue, total),
            })
            .collect()
    }
}

/// Running sums for one summary row.
#[derive(Debug, Default)]
struct Accumulator {
    bookings: usize,
    revenue: Decimal,
    occupancy: u64,
    adr_sum: Decimal,
}

impl Accumulator {
    fn add(&mut self, record: &BookingRecord) {
        self.bookings += 1;
        self.revenue += record.total_price;
        self.occupancy += u64::from(record.occupancy);
        self.adr_sum += record.adr;
    }

    fn finish(self, period: Period) -> PeriodSummary {
        PeriodSummary {
            period,
            bookings: self.bookings,
            total_revenue: self.revenue,
            total_occupancy: self.occupancy,
            average_adr: mean(self.adr_sum, self.bookings),
        }
    }
}

pub(crate) fn mean(sum: Decimal, count: usize) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    Some(sum / Decimal::from(count))
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part / whole * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn booking(y: i32, m: u32, price: Decimal, occupancy: u32) -> BookingRecord {
        let date = NaiveDate::from_ymd_opt(y, m, 15).unwrap();
        BookingRecord::new(date, price, occupancy, "OTA")
    }

    fn channel_booking(y: i32, m: u32, price: Decimal, channel: &str) -> BookingRecord {
        let date = NaiveDate::from_ymd_opt(y, m, 15).unwrap();
        BookingRecord::new(date, price, 1, channel)
    }

    fn three_year_table() -> BookingTable {
        BookingTable::new(
            vec![
                booking(2021, 1, dec!(1000), 1), // ADR 1000
                booking(2021, 1, dec!(2000), 1), // ADR 2000
                booking(2022, 1, dec!(3000), 1), // ADR 3000
                booking(2022, 2, dec!(9000), 1),
                booking(2023, 1, dec!(50000), 1),
                booking(2023, 3, dec!(1200), 2),
            ],
            false,
        )
    }

    #[test]
    fn filter_by_year_selects_only_that_year() {
        let engine = AnalyticsEngine::default();
        let table = three_year_table();
        let selected = engine.filter_by_year(&table, 2023);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|r| r.year == 2023));
        assert!(engine.filter_by_year(&table, 1999).is_empty());
    }

    #[test]
    fn monthly_summary_always_has_twelve_rows() {
        let engine = AnalyticsEngine::default();
        let table = three_year_table();

        let summary = engine.monthly_summary(engine.filter_by_year(&table, 2023));
        assert_eq!(summary.len(), 12);
        let periods: Vec<Period> = summary.iter().map(|s| s.period).collect();
        let expected: Vec<Period> = Month::ALL.iter().map(|&m| Period::Month(m)).collect();
        assert_eq!(periods, expected);

        let march = &summary[Month::Mar.index()];
        assert_eq!(march.total_revenue, dec!(1200));
        assert_eq!(march.total_occupancy, 2);
        assert_eq!(march.average_adr, Some(dec!(600)));

        let june = &summary[Month::Jun.index()];
        assert_eq!(june, &PeriodSummary::empty(Period::Month(Month::Jun)));
    }

    #[test]
    fn monthly_summary_of_nothing_is_twelve_empty_rows() {
        let engine = AnalyticsEngine::default();
        let summary = engine.monthly_summary(std::iter::empty());
        assert_eq!(summary.len(), 12);
        assert!(summary.iter().all(|s| s.bookings == 0 && s.average_adr.is_none()));
    }

    #[test]
    fn yearly_aggregation_sums_and_averages() {
        let engine = AnalyticsEngine::default();
        let table = three_year_table();
        let yearly = engine.year_over_year(&table);

        assert_eq!(yearly.len(), 3);
        assert_eq!(yearly[0].period, Period::Year(2021));
        assert_eq!(yearly[0].total_occupancy, 2);
        assert_eq!(yearly[0].average_adr, Some(dec!(1500)));
        assert_eq!(yearly[2].period, Period::Year(2023));
        assert_eq!(yearly[2].total_revenue, dec!(51200));
    }

    #[test]
    fn aggregation_is_deterministic() {
        let engine = AnalyticsEngine::default();
        let table = three_year_table();
        let selection = engine.filter_by_year(&table, 2022);
        let first = engine.aggregate(selection.iter().copied(), GroupBy::Month);
        let second = engine.aggregate(selection.iter().copied(), GroupBy::Month);
        assert_eq!(first, second);
    }

    #[test]
    fn trailing_adr_is_zero_for_single_year_data() {
        let engine = AnalyticsEngine::default();
        let table = BookingTable::new(vec![booking(2023, 1, dec!(100), 1)], false);
        assert_eq!(engine.two_year_avg_adr(&table, Month::Jan, 2023), Decimal::ZERO);
    }

    #[test]
    fn trailing_adr_is_zero_for_first_two_years() {
        let engine = AnalyticsEngine::default();
        let table = three_year_table();
        assert_eq!(engine.two_year_avg_adr(&table, Month::Jan, 2021), Decimal::ZERO);
        assert_eq!(engine.two_year_avg_adr(&table, Month::Jan, 2022), Decimal::ZERO);
    }

    #[test]
    fn trailing_adr_is_zero_for_unknown_year() {
        let engine = AnalyticsEngine::default();
        assert_eq!(
            engine.two_year_avg_adr(&three_year_table(), Month::Jan, 2030),
            Decimal::ZERO
        );
    }

    #[test]
    fn trailing_adr_averages_two_prior_years_only() {
        let engine = AnalyticsEngine::default();
        let table = three_year_table();
        // 2021 Jan ADRs 1000, 2000 and 2022 Jan ADR 3000; the 2023 Jan booking is ignored.
        assert_eq!(engine.two_year_avg_adr(&table, Month::Jan, 2023), dec!(2000));
    }

    #[test]
    fn trailing_adr_is_zero_when_prior_years_lack_the_month() {
        let engine = AnalyticsEngine::default();
        let table = three_year_table();
        assert_eq!(engine.two_year_avg_adr(&table, Month::Mar, 2023), Decimal::ZERO);
    }

    #[test]
    fn trailing_adr_skips_gap_years_positionally() {
        let engine = AnalyticsEngine::default();
        let table = BookingTable::new(
            vec![
                booking(2015, 5, dec!(700), 1),
                booking(2018, 5, dec!(100), 1),
                booking(2019, 5, dec!(300), 1),
                booking(2023, 5, dec!(999), 1),
            ],
            false,
        );
        // 2023 sits after 2018 and 2019 in the data, even though 2021/2022 are absent.
        assert_eq!(engine.two_year_avg_adr(&table, Month::May, 2023), dec!(200));
    }

    #[test]
    fn adr_distribution_has_points_per_month() {
        let engine = AnalyticsEngine::default();
        let table = three_year_table();
        let distribution = engine.adr_distribution(engine.filter_by_year(&table, 2021));

        assert_eq!(distribution.len(), 12);
        assert_eq!(distribution[0].month, Month::Jan);
        assert_eq!(distribution[0].points.len(), 2);
        assert!(distribution[1..].iter().all(|d| d.points.is_empty()));
    }

    #[test]
    fn top_adr_share_keeps_highest_revenue_groups() {
        let engine = AnalyticsEngine::default();
        let table = BookingTable::new(
            vec![
                booking(2023, 4, dec!(100), 1),
                booking(2023, 4, dec!(100), 1), // ADR 100 twice: revenue 200
                booking(2023, 4, dec!(500), 1),
                booking(2023, 4, dec!(300), 1),
                booking(2023, 4, dec!(400), 4), // ADR 100 again: revenue 600 total
                booking(2023, 4, dec!(50), 1),
            ],
            false,
        );

        let shares = engine.top_adr_revenue_share(table.records());
        assert_eq!(shares.len(), 1);

        let april = &shares[0];
        assert_eq!(april.month, Month::Apr);
        assert_eq!(april.month_revenue, dec!(1450));
        assert_eq!(april.top.len(), 3);
        assert_eq!(april.top[0].adr, dec!(100));
        assert_eq!(april.top[0].total_revenue, dec!(600));
        assert_eq!(april.top[0].total_occupancy, 6);
        assert_eq!(april.top[1].adr, dec!(500));
        assert_eq!(april.top[2].adr, dec!(300));

        let share_sum: Decimal = april.top.iter().map(|s| s.percent_share).sum();
        assert!(share_sum < dec!(100));
    }

    #[test]
    fn channel_mix_shares_sum_to_one_hundred() {
        let engine = AnalyticsEngine::default();
        let table = BookingTable::new(
            vec![
                channel_booking(2023, 1, dec!(300), "OTA"),
                channel_booking(2023, 2, dec!(100), "Direct"),
                channel_booking(2023, 3, dec!(600), "OTA"),
            ],
            true,
        );

        let mix = engine.channel_mix(table.records());
        assert_eq!(mix.len(), 2);
        assert_eq!(mix[0].channel, "Direct");
        assert_eq!(mix[0].percent_share, dec!(10));
        assert_eq!(mix[1].channel, "OTA");
        assert_eq!(mix[1].total_revenue, dec!(900));
        assert_eq!(mix[1].percent_share, dec!(90));
    }

    #[test]
    fn channel_mix_with_zero_revenue_has_zero_shares() {
        let engine = AnalyticsEngine::default();
        let table = BookingTable::new(vec![channel_booking(2023, 1, Decimal::ZERO, "OTA")], false);
        let mix = engine.channel_mix(table.records());
        assert_eq!(mix[0].percent_share, Decimal::ZERO);
    }
}
