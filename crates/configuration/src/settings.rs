use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; omitted values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetSettings,
    pub pricing: PricingSettings,
    pub logging: LoggingSettings,
}

/// Where the bookings file lives and how its raw fields are normalized.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// The bookings CSV to load at start-up.
    pub path: PathBuf,
    /// Stripped from `total_price` before numeric conversion (e.g. "THB ").
    pub currency_prefix: String,
    /// Channel label used for every record when the source has no `channel` column.
    pub default_channel: String,
}

/// Parameters of the price-elasticity what-if model.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    /// Percentage change in bookings per 1% change in rate. Must be negative.
    pub elasticity: Decimal,
    /// Multiplier applied to the reference ADR to produce the recommended ADR.
    pub recommended_uplift: Decimal,
    /// How many ADR groups the revenue-share view keeps per month.
    pub top_share_count: usize,
}

/// Logging output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// --- Default Implementations ---

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Cleaned_Merged_Data.csv"),
            currency_prefix: "THB ".to_string(),
            default_channel: "OTA".to_string(),
        }
    }
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            elasticity: dec!(-1.2),
            recommended_uplift: dec!(1.10),
            top_share_count: 3,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            directory: None,
        }
    }
}

impl Config {
    /// Rejects settings the analytics model cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pricing.elasticity >= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "pricing.elasticity must be negative, got {}",
                self.pricing.elasticity
            )));
        }
        if self.pricing.recommended_uplift <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "pricing.recommended_uplift must be positive, got {}",
                self.pricing.recommended_uplift
            )));
        }
        if self.pricing.top_share_count == 0 {
            return Err(ConfigError::ValidationError(
                "pricing.top_share_count must be at least 1".to_string(),
            ));
        }
        if self.dataset.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "dataset.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
