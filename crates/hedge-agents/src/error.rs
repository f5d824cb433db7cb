//! Error types for pipeline execution
//!
//! Only data acquisition can fail a run. Every scoring, aggregation, and
//! decision stage recovers locally with a documented neutral default.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The snapshot loader could not assemble its inputs
    #[error("Data acquisition failed: {0}")]
    Data(#[from] hedge_data::DataError),
}
