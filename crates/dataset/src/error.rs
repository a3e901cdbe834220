use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open bookings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' is missing from the bookings file")]
    MissingColumn(String),

    #[error("Parse error at line {line}, column '{column}', value '{value}': {reason}")]
    Parse {
        line: u64,
        column: &'static str,
        value: String,
        reason: String,
    },
}
