//! Error handling for the indicator pipelines.
//!
//! Row-level and period-level problems never show up here: those are recovered
//! locally by excluding the row or omitting the period. Only call-level contract
//! violations and failures of the I/O layers surface as [`IndicatorError`].

use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors that can occur while loading survey data or computing indicators
#[derive(Debug, thiserror::Error)]
pub enum IndicatorError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error reading or writing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error (de)serializing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error converting records to or from Arrow via `serde_arrow`
    #[error("Arrow serialization error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    /// No column in the record set looks like an urban/rural zone indicator
    #[error("No zone column found among {candidates} candidate columns")]
    ZoneColumnNotFound {
        /// Number of columns that were scanned
        candidates: usize,
    },

    /// A column requested by name does not exist
    #[error("Column '{column}' not found")]
    ColumnNotFound {
        /// Name of the missing column
        column: String,
    },

    /// A zone value could not be mapped to urban or rural
    #[error("Unclassifiable zone value {value:?} in column '{column}' at row {row}")]
    UnclassifiableZone {
        /// Column holding the zone values
        column: String,
        /// Row index of the offending value
        row: usize,
        /// Raw value, `None` when the cell was null
        value: Option<String>,
    },

    /// The monthly inflation series is not usable for calendar alignment
    #[error("Invalid inflation series: {0}")]
    InvalidInflationSeries(String),

    /// A period outside the supported ranges
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// The worker pool for parallel geographies could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A raw survey extract that cannot be read as a delimited table
    #[error("Malformed survey extract: {0}")]
    MalformedExtract(String),

    /// Unknown geography name
    #[error("Unknown geography '{0}'")]
    UnknownGeography(String),

    /// A file or directory the operation depends on is missing
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),
}

/// Result type for indicator operations
pub type Result<T> = std::result::Result<T, IndicatorError>;
