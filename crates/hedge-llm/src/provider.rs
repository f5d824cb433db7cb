//! Oracle provider trait definition

use crate::Result;
use async_trait::async_trait;

/// A single completion request to the scoring oracle
///
/// Calls are blocking, synchronous operations from the pipeline's
/// perspective; no cancellation is supported mid-call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Optional system prompt framing the oracle's role
    pub system: Option<String>,
    /// The structured user prompt
    pub prompt: String,
    /// Sampling temperature (provider default when `None`)
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Create a request with just a user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: None,
        }
    }

    /// Set the system prompt
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Trait for scoring-oracle providers
///
/// Implementations are constructed once at process start and passed into
/// the consuming stages, which keeps test doubles free of global state.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate free text for the given request
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;
}
