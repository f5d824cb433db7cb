//! Error types for hedge-llm

use thiserror::Error;

/// Result type alias for oracle operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors from the scoring-oracle collaborator
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider configuration is missing or invalid
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Network or HTTP error
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API returned a non-success status
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// The API returned no usable candidates
    #[error("Empty response from provider")]
    EmptyResponse,
}
