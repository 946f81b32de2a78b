use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur while the
/// pipeline downloads, extracts, or aggregates scoring data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a delimited file cannot be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when a configuration file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Transport-level failures from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Raised when the remote server answers with a non-success status.
    #[error("unexpected HTTP status {status} for {locator}")]
    HttpStatus { status: u16, locator: String },

    /// Raised when the workbook does not contain the requested worksheet.
    #[error("missing sheet '{0}'")]
    MissingSheet(String),

    /// Raised when no cell of the worksheet contains the marker phrase.
    #[error("could not find '{marker}' in worksheet")]
    MarkerNotFound { marker: String },

    /// Raised when a configured pattern does not compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a block file holds no qualifying criterion row.
    #[error("no scores extracted for '{0}'")]
    NoScores(String),

    /// Raised when aggregation did not yield a single entity row.
    #[error("no data extracted")]
    NoData,

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
