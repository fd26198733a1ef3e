//! Error types for the Folio application.
//!
//! Uses `thiserror` for structured error definitions that provide
//! clear context about what went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Missing required configuration value
    #[error("Missing required config value: {0}")]
    MissingValue(String),

    /// Invalid configuration value
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory not found
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Which kind of text unit a translation call was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Paragraph,
    Heading,
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitKind::Paragraph => f.write_str("block"),
            UnitKind::Heading => f.write_str("heading"),
        }
    }
}

/// Error type for translation operations.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// HTTP request to API failed
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error: {0}")]
    ApiError(String),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Uniform failure signal for a single translation unit.
    #[error("Unable to translate {kind}.")]
    Failed { kind: UnitKind },
}

/// Error type for reading and parsing the manuscript.
#[derive(Error, Debug)]
pub enum ManuscriptError {
    /// Input file does not exist
    #[error("Input text file '{}' not found", .0.display())]
    NotFound(PathBuf),

    /// Input file exists but could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error type for book aggregation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BookError {
    /// A paragraph was appended before any chapter was started
    #[error("Cannot add paragraph: no chapter has been added to the book yet")]
    NoChapter,
}

/// Error type for writing output artifacts.
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failed to create or write an output file
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialise a record to JSON
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure on an already opened output
    #[error("Output I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using anyhow for application-level error handling.
pub type Result<T> = anyhow::Result<T>;
