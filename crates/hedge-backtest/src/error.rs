//! Error types for backtest runs

use thiserror::Error;

/// Result type alias for backtest operations
pub type Result<T> = std::result::Result<T, BacktestError>;

/// Errors that abort a backtest
#[derive(Debug, Error)]
pub enum BacktestError {
    /// The manual dataset could not be loaded or windowed
    #[error(transparent)]
    Data(#[from] hedge_data::DataError),

    /// A pipeline run failed for one simulated day
    #[error(transparent)]
    Pipeline(#[from] hedge_agents::PipelineError),
}
