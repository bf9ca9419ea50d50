//! Error types for everything that can fail before an attempt starts.
//! The tick path itself is total and never returns an error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("schedule is empty: expected a header line")]
    MissingHeader,

    #[error("line {line}: expected 3 columns, found {found}")]
    WrongColumnCount { line: usize, found: usize },

    #[error("line {line}, column {column}: '{value}' is not a number")]
    InvalidNumber {
        line: usize,
        column: usize,
        value: String,
    },

    #[error("line {line}, column {column}: {value} is out of range")]
    OutOfRange { line: usize, column: usize, value: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
