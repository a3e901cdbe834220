use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown month label '{0}' (expected one of Jan..Dec)")]
    UnknownMonth(String),
}
