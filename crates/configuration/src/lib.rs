use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DatasetSettings, LogLevel, LoggingSettings, PricingSettings};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration from the `config.toml` file.
///
/// The file is optional: every value has a default. Environment variables
/// prefixed with `ADR__` override file values, e.g.
/// `ADR__PRICING__ELASTICITY=-1.5`.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(environment(None));
    finish(builder)
}

/// The `ADR__` environment source. `vars` replaces the process environment
/// when given.
fn environment(vars: Option<config::Map<String, String>>) -> config::Environment {
    config::Environment::with_prefix("ADR")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .source(vars)
}

/// Loads the configuration from an in-memory TOML document.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml));
    finish(builder)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;
    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}
