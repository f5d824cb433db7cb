//! Market snapshot types
//!
//! A [`MarketSnapshot`] bundles everything one pipeline run consumes: a
//! dated window of price bars, the latest financial metrics, insider
//! trades, market capitalization, and sentiment inputs. It is assembled
//! once by the loader and read-only afterward.

use crate::error::{CoreError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily OHLCV bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date (wire name `time`, `YYYY-MM-DD`)
    #[serde(rename = "time")]
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Check the OHLC envelope invariants
    pub fn validate(&self) -> Result<()> {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if fields.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(CoreError::InvalidSnapshot(format!(
                "price bar {} has a negative or non-finite field",
                self.date
            )));
        }
        if self.high < self.low
            || self.high < self.open.max(self.close)
            || self.low > self.open.min(self.close)
        {
            return Err(CoreError::InvalidSnapshot(format!(
                "price bar {} violates the high/low envelope",
                self.date
            )));
        }
        Ok(())
    }
}

/// One period of financial metrics, all real-valued (may be negative)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialMetrics {
    #[serde(default)]
    pub return_on_equity: f64,
    #[serde(default)]
    pub net_margin: f64,
    #[serde(default)]
    pub operating_margin: f64,
    #[serde(default)]
    pub revenue_growth: f64,
    #[serde(default)]
    pub earnings_growth: f64,
    #[serde(default)]
    pub book_value_growth: f64,
    #[serde(default)]
    pub current_ratio: f64,
    #[serde(default)]
    pub debt_to_equity: f64,
    #[serde(default)]
    pub free_cash_flow_per_share: f64,
    #[serde(default)]
    pub earnings_per_share: f64,
    #[serde(default)]
    pub price_to_earnings_ratio: f64,
    #[serde(default)]
    pub price_to_book_ratio: f64,
    #[serde(default)]
    pub price_to_sales_ratio: f64,
}

/// One reported financial line item (only free cash flow is consumed)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialLineItem {
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
    /// Provider-specific fields we carry but do not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A reported insider transaction
///
/// Field sets vary by provider; only the common ones are named.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsiderTrade {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub transaction_shares: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Overall market mood label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryBullish,
    Bullish,
    Neutral,
    Bearish,
    VeryBearish,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryBullish => "very_bullish",
            Self::Bullish => "bullish",
            Self::Neutral => "neutral",
            Self::Bearish => "bearish",
            Self::VeryBearish => "very_bearish",
        }
    }
}

/// Impact classification of a news item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsImpact {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

/// A recent news headline with its assessed impact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub summary: String,
    pub impact: NewsImpact,
}

/// Analyst rating counts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnalystRatings {
    #[serde(default)]
    pub strong_buy: u32,
    #[serde(default)]
    pub buy: u32,
    #[serde(default)]
    pub hold: u32,
    #[serde(default)]
    pub sell: u32,
    #[serde(default)]
    pub strong_sell: u32,
}

impl AnalystRatings {
    /// Total number of ratings across all categories
    pub fn total(&self) -> u32 {
        self.strong_buy + self.buy + self.hold + self.sell + self.strong_sell
    }
}

/// Sentiment inputs for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentInput {
    pub overall_sentiment: SentimentLabel,
    /// Source-reported certainty in `[0, 1]`
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub recent_news: Vec<NewsItem>,
    #[serde(default)]
    pub market_trends: Option<String>,
    #[serde(default)]
    pub upcoming_events: Vec<String>,
    #[serde(default)]
    pub analyst_ratings: AnalystRatings,
}

impl Default for SentimentInput {
    fn default() -> Self {
        Self {
            overall_sentiment: SentimentLabel::Neutral,
            confidence: 0.5,
            recent_news: Vec::new(),
            market_trends: None,
            upcoming_events: Vec::new(),
            analyst_ratings: AnalystRatings::default(),
        }
    }
}

/// Immutable bundle of all market data needed for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Daily bars, ordered by date ascending with no duplicates
    pub prices: Vec<PriceBar>,
    pub financial_metrics: Vec<FinancialMetrics>,
    #[serde(default)]
    pub financial_line_items: Vec<FinancialLineItem>,
    #[serde(default)]
    pub insider_trades: Vec<InsiderTrade>,
    pub market_cap: f64,
    pub sentiment: SentimentInput,
}

impl MarketSnapshot {
    /// Validate the snapshot invariants: date window ordering, bar
    /// envelopes, and ascending non-duplicate bar dates
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(CoreError::InvalidSnapshot(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        for bar in &self.prices {
            bar.validate()?;
        }
        for pair in self.prices.windows(2) {
            if pair[0].date >= pair[1].date {
                return Err(CoreError::InvalidSnapshot(format!(
                    "price bars out of order or duplicated at {}",
                    pair[1].date
                )));
            }
        }
        Ok(())
    }

    /// Closing price of the most recent bar in the window
    pub fn latest_close(&self) -> Option<f64> {
        self.prices.last().map(|bar| bar.close)
    }

    /// The most recent financial metrics record
    pub fn latest_metrics(&self) -> Option<&FinancialMetrics> {
        self.financial_metrics.first()
    }

    /// Free cash flow from the first financial line item, if reported
    pub fn free_cash_flow(&self) -> Option<f64> {
        self.financial_line_items
            .first()
            .and_then(|item| item.free_cash_flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> PriceBar {
        PriceBar {
            date: date.parse().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000.0,
        }
    }

    fn snapshot_with(prices: Vec<PriceBar>) -> MarketSnapshot {
        MarketSnapshot {
            ticker: "AAPL".to_string(),
            start_date: "2024-01-01".parse().unwrap(),
            end_date: "2024-03-01".parse().unwrap(),
            prices,
            financial_metrics: vec![FinancialMetrics::default()],
            financial_line_items: Vec::new(),
            insider_trades: Vec::new(),
            market_cap: 1.0e12,
            sentiment: SentimentInput::default(),
        }
    }

    #[test]
    fn test_price_bar_envelope() {
        let mut b = bar("2024-01-02", 100.0);
        assert!(b.validate().is_ok());

        b.low = 150.0; // low above close
        assert!(b.validate().is_err());

        let mut b = bar("2024-01-02", 100.0);
        b.volume = -1.0;
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_snapshot_ordering_invariant() {
        let ok = snapshot_with(vec![bar("2024-01-02", 100.0), bar("2024-01-03", 101.0)]);
        assert!(ok.validate().is_ok());

        let dup = snapshot_with(vec![bar("2024-01-02", 100.0), bar("2024-01-02", 101.0)]);
        assert!(dup.validate().is_err());

        let reversed = snapshot_with(vec![bar("2024-01-03", 100.0), bar("2024-01-02", 101.0)]);
        assert!(reversed.validate().is_err());
    }

    #[test]
    fn test_window_ordering() {
        let mut snapshot = snapshot_with(vec![bar("2024-01-02", 100.0)]);
        snapshot.start_date = "2024-04-01".parse().unwrap();
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_latest_accessors() {
        let snapshot = snapshot_with(vec![bar("2024-01-02", 100.0), bar("2024-01-03", 104.5)]);
        assert_eq!(snapshot.latest_close(), Some(104.5));
        assert!(snapshot.latest_metrics().is_some());
        assert_eq!(snapshot.free_cash_flow(), None);
    }

    #[test]
    fn test_analyst_ratings_total() {
        let ratings = AnalystRatings {
            strong_buy: 5,
            buy: 10,
            hold: 8,
            sell: 2,
            strong_sell: 1,
        };
        assert_eq!(ratings.total(), 26);
    }

    #[test]
    fn test_price_bar_wire_name() {
        let bar: PriceBar = serde_json::from_str(
            r#"{"time": "2024-01-02", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "volume": 10}"#,
        )
        .unwrap();
        assert_eq!(bar.date, "2024-01-02".parse::<NaiveDate>().unwrap());
    }
}
