use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings from config.toml or ADR__ environment variables: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid setting in config.toml or ADR__ environment: {0}")]
    ValidationError(String),
}
