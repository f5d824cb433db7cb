//! LLM-backed market research gatherer
//!
//! Asks the scoring oracle to assemble a manual-dataset-shaped JSON bundle
//! for a ticker from its web knowledge. Responses that cannot be parsed
//! degrade to a conservative default dataset instead of failing the run.

use crate::error::Result;
use crate::manual::ManualDataset;
use chrono::{Days, NaiveDate};
use hedge_core::{AnalystRatings, FinancialMetrics, PriceBar, SentimentInput, SentimentLabel};
use hedge_llm::{CompletionRequest, LlmProvider, json::extract_json};
use std::sync::Arc;
use tracing::{info, warn};

const LOOKBACK_DAYS: u64 = 30;

const RESEARCH_SYSTEM_PROMPT: &str = "You are a financial research assistant. \
You produce factual market data bundles as a single JSON object, with no \
markdown fences and no commentary outside the JSON.";

/// Gathers a manual dataset for a ticker via the scoring oracle
pub struct MarketResearcher {
    provider: Arc<dyn LlmProvider>,
}

impl MarketResearcher {
    /// Create a researcher over an injected oracle client
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Gather a dataset covering the 30 days up to `today`
    ///
    /// Oracle transport errors propagate; unparsable oracle output falls
    /// back to [`default_dataset`].
    pub async fn gather(&self, ticker: &str, today: NaiveDate) -> Result<ManualDataset> {
        let start = today
            .checked_sub_days(Days::new(LOOKBACK_DAYS))
            .unwrap_or(today);
        let prompt = research_prompt(ticker, start, today);

        info!(ticker, "gathering market data via research oracle");
        let response = self
            .provider
            .complete(CompletionRequest::new(prompt).with_system(RESEARCH_SYSTEM_PROMPT))
            .await
            .map_err(crate::error::DataError::Research)?;

        let parsed = extract_json(&response)
            .and_then(|json| ManualDataset::from_json(&json).ok());
        match parsed {
            Some(dataset) => Ok(dataset),
            None => {
                warn!(ticker, "could not parse research response, using default market data");
                Ok(default_dataset(start, today))
            }
        }
    }
}

fn research_prompt(ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "Provide a market data bundle for the stock {ticker} covering {start} \
to {end}. Respond with exactly one JSON object with these top-level keys:\n\
- \"prices\": array of daily entries {{\"time\": \"YYYY-MM-DD\", \"open\", \
\"high\", \"low\", \"close\", \"volume\"}} for each trading day in the range\n\
- \"financial_metrics\": object with return_on_equity, net_margin, \
operating_margin, revenue_growth, earnings_growth, book_value_growth, \
current_ratio, debt_to_equity, free_cash_flow_per_share, earnings_per_share, \
price_to_earnings_ratio, price_to_book_ratio, price_to_sales_ratio (decimals)\n\
- \"financial_line_items\": array with one object containing free_cash_flow\n\
- \"insider_trades\": array (may be empty)\n\
- \"market_cap\": number\n\
- \"market_sentiment\": object with overall_sentiment (very_bullish | bullish \
| neutral | bearish | very_bearish), confidence (0-1), recent_news (array of \
{{\"summary\", \"impact\"}} with impact in very_positive | positive | neutral \
| negative | very_negative), upcoming_events (array of strings), and \
analyst_ratings ({{\"strong_buy\", \"buy\", \"hold\", \"sell\", \
\"strong_sell\"}} counts)\n\
Use your best current knowledge. Output only the JSON object."
    )
}

/// Conservative default dataset used when research output is unparsable
///
/// A flat price series with metrics chosen so every fundamental sub-score
/// lands neutral; sentiment is neutral with no news.
pub fn default_dataset(start: NaiveDate, end: NaiveDate) -> ManualDataset {
    let mut prices = Vec::new();
    let mut date = start;
    while date <= end {
        prices.push(PriceBar {
            date,
            open: 100.0,
            high: 100.0,
            low: 100.0,
            close: 100.0,
            volume: 1_000_000.0,
        });
        match date.checked_add_days(Days::new(1)) {
            Some(next) => date = next,
            None => break,
        }
    }

    ManualDataset {
        prices,
        financial_metrics: FinancialMetrics {
            return_on_equity: 0.16,
            net_margin: 0.10,
            operating_margin: 0.10,
            revenue_growth: 0.12,
            earnings_growth: 0.05,
            book_value_growth: 0.05,
            current_ratio: 2.0,
            debt_to_equity: 1.0,
            free_cash_flow_per_share: 1.0,
            earnings_per_share: 2.0,
            price_to_earnings_ratio: 20.0,
            price_to_book_ratio: 4.0,
            price_to_sales_ratio: 6.0,
        },
        financial_line_items: Vec::new(),
        insider_trades: Vec::new(),
        market_cap: 1.0e11,
        market_sentiment: SentimentInput {
            overall_sentiment: SentimentLabel::Neutral,
            confidence: 0.5,
            recent_news: Vec::new(),
            market_trends: None,
            upcoming_events: Vec::new(),
            analyst_ratings: AnalystRatings::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hedge_llm::Result as LlmResult;

    struct ScriptedProvider {
        response: String,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(&self, _request: CompletionRequest) -> LlmResult<String> {
            Ok(self.response.clone())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_gather_parses_oracle_dataset() {
        let response = r#"Here you go:
```json
{"prices": [{"time": "2024-06-03", "open": 10.0, "high": 11.0, "low": 9.0, "close": 10.5, "volume": 500}],
 "financial_metrics": {"return_on_equity": 0.2},
 "insider_trades": [],
 "market_cap": 5.0e10,
 "market_sentiment": {"overall_sentiment": "bullish", "confidence": 0.7}}
```"#;
        let researcher = MarketResearcher::new(Arc::new(ScriptedProvider {
            response: response.to_string(),
        }));
        let dataset = researcher.gather("NVDA", date("2024-06-20")).await.unwrap();
        assert_eq!(dataset.prices.len(), 1);
        assert_eq!(dataset.market_cap, 5.0e10);
    }

    #[tokio::test]
    async fn test_gather_falls_back_on_garbage() {
        let researcher = MarketResearcher::new(Arc::new(ScriptedProvider {
            response: "I could not find any data, sorry!".to_string(),
        }));
        let dataset = researcher.gather("NVDA", date("2024-06-20")).await.unwrap();
        // 31 calendar days of flat default prices
        assert_eq!(dataset.prices.len(), 31);
        assert_eq!(
            dataset.market_sentiment.overall_sentiment,
            SentimentLabel::Neutral
        );
    }

    #[test]
    fn test_default_dataset_is_valid() {
        let dataset = default_dataset(date("2024-06-01"), date("2024-06-10"));
        for bar in &dataset.prices {
            assert!(bar.validate().is_ok());
        }
        assert_eq!(dataset.prices.len(), 10);
    }
}
