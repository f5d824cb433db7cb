//! Data source abstraction
//!
//! The pipeline loads snapshots through one trait so the same run logic
//! works against a pre-supplied manual dataset, a REST provider, or a test
//! double.

use crate::dates::DateWindow;
use crate::error::Result;
use crate::manual::ManualDataset;
use async_trait::async_trait;
use hedge_core::MarketSnapshot;

/// Source of market snapshots
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Assemble a snapshot for the ticker over the inclusive window
    ///
    /// Fails with `DataError::DataUnavailable` when a required field
    /// (prices, metrics, sentiment) is absent from the source.
    async fn fetch_snapshot(&self, ticker: &str, window: DateWindow) -> Result<MarketSnapshot>;
}

/// Data source backed by an in-memory manual dataset
pub struct ManualDataSource {
    dataset: ManualDataset,
}

impl ManualDataSource {
    /// Wrap an already-validated dataset
    pub fn new(dataset: ManualDataset) -> Self {
        Self { dataset }
    }

    /// The underlying dataset
    pub fn dataset(&self) -> &ManualDataset {
        &self.dataset
    }
}

#[async_trait]
impl DataSource for ManualDataSource {
    async fn fetch_snapshot(&self, ticker: &str, window: DateWindow) -> Result<MarketSnapshot> {
        self.dataset.snapshot(ticker, window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;
    use serde_json::json;

    #[tokio::test]
    async fn test_manual_source_fetch() {
        let dataset = ManualDataset::from_value(json!({
            "prices": [
                {"time": "2024-06-03", "open": 100.0, "close": 101.0, "high": 102.0, "low": 99.0, "volume": 1000}
            ],
            "financial_metrics": {},
            "insider_trades": [],
            "market_cap": 1.0e12,
            "market_sentiment": {"overall_sentiment": "neutral"}
        }))
        .unwrap();

        let source = ManualDataSource::new(dataset);
        let window = DateWindow::new(
            parse_date("2024-06-01").unwrap(),
            parse_date("2024-06-30").unwrap(),
        )
        .unwrap();
        let snapshot = source.fetch_snapshot("MSFT", window).await.unwrap();
        assert_eq!(snapshot.ticker, "MSFT");
        assert_eq!(snapshot.prices.len(), 1);
    }
}
