//! Error types for data acquisition
//!
//! Data-acquisition failures are fatal for a pipeline run: without a
//! snapshot there is no meaningful analysis. Everything downstream of the
//! loader degrades gracefully instead of surfacing errors.

use thiserror::Error;

/// Result type alias for data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised while assembling a market snapshot
#[derive(Debug, Error)]
pub enum DataError {
    /// A required snapshot field is absent from the source
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// A user-supplied date string failed YYYY-MM-DD parsing
    #[error("Invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    /// The manual data path does not exist or cannot be read
    #[error("Manual data file not found: {0}")]
    MissingFile(String),

    /// The manual data file is not valid JSON of the expected shape
    #[error("Invalid JSON format in manual data file: {0}")]
    InvalidJson(String),

    /// A snapshot invariant was violated
    #[error("Snapshot validation failed: {0}")]
    Validation(#[from] hedge_core::CoreError),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider returned a non-success status
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// Oracle error during LLM-backed research
    #[error("Research error: {0}")]
    Research(#[from] hedge_llm::LlmError),
}
