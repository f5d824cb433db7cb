//! Pre-supplied manual dataset
//!
//! A manual dataset is a JSON file with top-level keys `prices`,
//! `financial_metrics`, `insider_trades`, `market_cap`, and
//! `market_sentiment` (plus optional `financial_line_items`). Price entries
//! carry `{time, open, close, high, low, volume}` with `time` in
//! `YYYY-MM-DD`; they are sorted ascending on load and malformed entries
//! fail validation.

use crate::dates::DateWindow;
use crate::error::{DataError, Result};
use chrono::NaiveDate;
use hedge_core::{
    FinancialLineItem, FinancialMetrics, InsiderTrade, MarketSnapshot, PriceBar, SentimentInput,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Wire shape of the manual data file, before required-field checks
#[derive(Debug, Deserialize)]
struct RawDataset {
    prices: Option<Vec<PriceBar>>,
    financial_metrics: Option<FinancialMetrics>,
    #[serde(default)]
    financial_line_items: Vec<FinancialLineItem>,
    insider_trades: Option<Vec<InsiderTrade>>,
    market_cap: Option<f64>,
    market_sentiment: Option<SentimentInput>,
}

/// A validated manual dataset, ready to cut snapshots from
#[derive(Debug, Clone, Serialize)]
pub struct ManualDataset {
    pub prices: Vec<PriceBar>,
    pub financial_metrics: FinancialMetrics,
    pub financial_line_items: Vec<FinancialLineItem>,
    pub insider_trades: Vec<InsiderTrade>,
    pub market_cap: f64,
    pub market_sentiment: SentimentInput,
}

impl ManualDataset {
    /// Load and validate a dataset from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|_| DataError::MissingFile(path.display().to_string()))?;
        Self::from_json(&text)
            .map_err(|err| match err {
                DataError::InvalidJson(msg) => {
                    DataError::InvalidJson(format!("{}: {msg}", path.display()))
                }
                other => other,
            })
    }

    /// Parse and validate a dataset from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawDataset =
            serde_json::from_str(text).map_err(|err| DataError::InvalidJson(err.to_string()))?;
        Self::from_raw(raw)
    }

    /// Parse and validate a dataset from an already-decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawDataset = serde_json::from_value(value)
            .map_err(|err| DataError::InvalidJson(err.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDataset) -> Result<Self> {
        let mut prices = raw
            .prices
            .ok_or_else(|| DataError::DataUnavailable("prices".to_string()))?;
        let financial_metrics = raw
            .financial_metrics
            .ok_or_else(|| DataError::DataUnavailable("financial_metrics".to_string()))?;
        let market_sentiment = raw
            .market_sentiment
            .ok_or_else(|| DataError::DataUnavailable("market_sentiment".to_string()))?;
        let market_cap = raw
            .market_cap
            .ok_or_else(|| DataError::DataUnavailable("market_cap".to_string()))?;
        let insider_trades = raw.insider_trades.unwrap_or_default();

        for bar in &prices {
            bar.validate()?;
        }
        prices.sort_by_key(|bar| bar.date);

        Ok(Self {
            prices,
            financial_metrics,
            financial_line_items: raw.financial_line_items,
            insider_trades,
            market_cap,
            market_sentiment,
        })
    }

    /// Price bars inside the inclusive window, ordered ascending
    pub fn price_window(&self, window: DateWindow) -> Vec<PriceBar> {
        self.prices
            .iter()
            .filter(|bar| bar.date >= window.start && bar.date <= window.end)
            .cloned()
            .collect()
    }

    /// Date and closing price of the last bar inside the window
    pub fn last_close_in(&self, window: DateWindow) -> Option<(NaiveDate, f64)> {
        self.prices
            .iter()
            .filter(|bar| bar.date >= window.start && bar.date <= window.end)
            .next_back()
            .map(|bar| (bar.date, bar.close))
    }

    /// Cut an immutable snapshot for the given ticker and window
    pub fn snapshot(&self, ticker: &str, window: DateWindow) -> Result<MarketSnapshot> {
        let snapshot = MarketSnapshot {
            ticker: ticker.to_string(),
            start_date: window.start,
            end_date: window.end,
            prices: self.price_window(window),
            financial_metrics: vec![self.financial_metrics.clone()],
            financial_line_items: self.financial_line_items.clone(),
            insider_trades: self.insider_trades.clone(),
            market_cap: self.market_cap,
            sentiment: self.market_sentiment.clone(),
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}
