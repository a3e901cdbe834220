use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Adjusted ADR {value} is outside the allowed range {min}..={max}")]
    AdjustmentOutOfRange {
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },
}
