use configuration::PricingSettings;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Model parameters for the analytics engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Percentage change in bookings per 1% change in rate.
    pub elasticity: Decimal,
    /// Applied to the reference ADR to produce the recommended ADR.
    pub recommended_uplift: Decimal,
    /// ADR groups kept per month by the revenue-share view.
    pub top_share_count: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            elasticity: dec!(-1.2),
            recommended_uplift: dec!(1.10),
            top_share_count: 3,
        }
    }
}

impl From<&PricingSettings> for AnalyticsConfig {
    fn from(settings: &PricingSettings) -> Self {
        Self {
            elasticity: settings.elasticity,
            recommended_uplift: settings.recommended_uplift,
            top_share_count: settings.top_share_count,
        }
    }
}
