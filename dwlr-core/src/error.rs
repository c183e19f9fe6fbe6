/// Error types for the DWLR crates
use thiserror::Error;

/// Main error type for station synthesis, ingestion and forecasting
#[derive(Error, Debug)]
pub enum DwlrError {
    /// Synthesis was asked to sample from an empty location catalog
    #[error("Location catalog is empty")]
    EmptyCatalog,

    /// Station count must be positive
    #[error("Invalid station count: {0}")]
    InvalidStationCount(usize),

    /// Series generation needs a finite, non-negative anchor level
    #[error("Current level must be a finite non-negative number, got {0}")]
    InvalidCurrentLevel(f64),

    /// Series generation needs at least one day of history
    #[error("Invalid history length: {0} days")]
    InvalidHistoryLength(usize),

    /// Forecasting was given no historical observations
    #[error("Historical series is empty")]
    EmptySeries,

    /// Forecast horizon must be at least one day
    #[error("Invalid forecast horizon: {0} days")]
    InvalidHorizon(u32),

    /// Categorical weights were negative, non-finite or all zero
    #[error("Invalid categorical weights: {0}")]
    InvalidWeights(String),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// A single CSV row could not be turned into a domain value
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// Station not found
    #[error("Station not found: {0}")]
    StationNotFound(String),
}

/// Type alias for Results using DwlrError
pub type Result<T> = std::result::Result<T, DwlrError>;
