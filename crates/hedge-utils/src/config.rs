//! Environment-variable configuration

use serde::{Deserialize, Serialize};

/// Process-level configuration read from the environment
///
/// Every field has a usable default; the API keys stay optional because
/// runs against a manual dataset need neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Google Gemini API key (`GOOGLE_GEMINI_API_KEY`)
    pub gemini_api_key: Option<String>,
    /// Financial Datasets API key (`FINANCIAL_DATASETS_API_KEY`)
    pub financial_datasets_api_key: Option<String>,
    /// Starting cash for analysis runs (`INITIAL_CASH`)
    pub initial_cash: f64,
    /// Starting share count for analysis runs (`INITIAL_STOCK`)
    pub initial_stock: u64,
    /// Log each stage's reasoning (`SHOW_REASONING`)
    pub show_reasoning: bool,
}

impl AppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: non_empty_var("GOOGLE_GEMINI_API_KEY"),
            financial_datasets_api_key: non_empty_var("FINANCIAL_DATASETS_API_KEY"),
            initial_cash: parsed_var("INITIAL_CASH").unwrap_or(100_000.0),
            initial_stock: parsed_var("INITIAL_STOCK").unwrap_or(0),
            show_reasoning: parsed_var("SHOW_REASONING").unwrap_or(false),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            financial_datasets_api_key: None,
            initial_cash: 100_000.0,
            initial_stock: 0,
            show_reasoning: false,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.initial_cash, 100_000.0);
        assert_eq!(config.initial_stock, 0);
        assert!(!config.show_reasoning);
        assert!(config.gemini_api_key.is_none());
    }
}
