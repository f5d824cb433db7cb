//! Error types for hedge-core

use thiserror::Error;

/// Result type alias for hedge-core
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while constructing or validating domain values
#[derive(Debug, Error)]
pub enum CoreError {
    /// A snapshot violated one of its structural invariants
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
