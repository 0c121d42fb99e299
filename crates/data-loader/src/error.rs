//! Error types for the data-loader crate.
//!
//! Every variant here is a start-up fault: the artifacts are either
//! unreadable or disagree with each other. None of them is the
//! "title not found" signal, which lives in the recommender crate.

use thiserror::Error;

/// Errors that can occur while loading and validating the catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be parsed
    ///
    /// `line` is 1-based; JSON errors report the line serde_json stopped on.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Movie table and similarity matrix disagree on shape
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
