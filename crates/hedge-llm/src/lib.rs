//! Scoring-oracle abstraction for hedge-rs
//!
//! The pipeline treats its generative-language collaborator as an opaque
//! scoring oracle: a structured prompt goes in, free text expected to
//! contain one JSON object comes out. This crate provides:
//!
//! - [`LlmProvider`] - the provider trait the consuming stages are handed
//!   (dependency-injected, so tests use doubles with zero global state)
//! - [`GeminiProvider`] - a Google `generateContent` implementation
//! - [`json`] - helpers that locate and clean the first `{...}` span in a
//!   response, and `parse_or_default` for the documented fallback values

pub mod error;
pub mod json;
pub mod provider;
pub mod providers;

pub use error::{LlmError, Result};
pub use provider::{CompletionRequest, LlmProvider};
pub use providers::gemini::{GeminiConfig, GeminiProvider};
