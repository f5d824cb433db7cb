//! End-to-end pipeline runs over an in-memory manual dataset

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use hedge_agents::Pipeline;
use hedge_core::{Portfolio, Signal, TradeAction};
use hedge_data::{DateWindow, ManualDataSource, ManualDataset, dates::parse_date};
use hedge_llm::{CompletionRequest, LlmError, LlmProvider};
use serde_json::{Value, json};
use std::sync::Arc;

struct ScriptedOracle {
    response: Option<String>,
}

impl ScriptedOracle {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Some(text.to_string()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self { response: None })
    }
}

#[async_trait]
impl LlmProvider for ScriptedOracle {
    async fn complete(&self, _request: CompletionRequest) -> hedge_llm::Result<String> {
        self.response.clone().ok_or(LlmError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Forty rising daily bars starting at 2024-06-03, strong fundamentals,
/// bullish sentiment. Two analysts at least will call this bullish.
fn bullish_dataset() -> ManualDataset {
    let start: NaiveDate = "2024-06-03".parse().unwrap();
    let prices: Vec<Value> = (0..40)
        .map(|i| {
            let date = start.checked_add_days(Days::new(i)).unwrap();
            let close = 100.0 + i as f64;
            json!({
                "time": date.format("%Y-%m-%d").to_string(),
                "open": close - 0.5,
                "high": close + 1.0,
                "low": close - 1.0,
                "close": close,
                "volume": 1_000_000,
            })
        })
        .collect();

    ManualDataset::from_value(json!({
        "prices": prices,
        "financial_metrics": {
            "return_on_equity": 0.30,
            "net_margin": 0.25,
            "operating_margin": 0.28,
            "revenue_growth": 0.15,
            "earnings_growth": 0.20,
            "book_value_growth": 0.12,
            "current_ratio": 2.0,
            "debt_to_equity": 0.3,
            "free_cash_flow_per_share": 6.0,
            "earnings_per_share": 6.0,
            "price_to_earnings_ratio": 18.0,
            "price_to_book_ratio": 2.0,
            "price_to_sales_ratio": 3.0
        },
        "financial_line_items": [{"free_cash_flow": 6.0e9}],
        "insider_trades": [],
        "market_cap": 1.0e11,
        "market_sentiment": {
            "overall_sentiment": "bullish",
            "confidence": 0.8,
            "recent_news": [
                {"summary": "Record quarter", "impact": "very_positive"}
            ],
            "analyst_ratings": {"strong_buy": 10, "buy": 5, "hold": 2, "sell": 1, "strong_sell": 0}
        }
    }))
    .unwrap()
}

fn window() -> DateWindow {
    DateWindow::new(
        parse_date("2024-06-01").unwrap(),
        parse_date("2024-08-01").unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_bullish_consensus_allows_full_position_buy() {
    let source = Arc::new(ManualDataSource::new(bullish_dataset()));
    let oracle = ScriptedOracle::replying(
        r#"{"action": "buy", "quantity": 500, "confidence": 0.85,
            "reasoning": "Strong fundamentals with technical confirmation",
            "agent_signals": [{"agent": "fundamentals_agent", "signal": "bullish", "confidence": 1.0}]}"#,
    );
    let pipeline = Pipeline::new(source, oracle);

    let portfolio = Portfolio::with_cash(100_000.0);
    let outcome = pipeline.run("NVDA", window(), &portfolio).await.unwrap();

    assert_eq!(outcome.fundamental.signal, Signal::Bullish);
    assert_eq!(outcome.sentiment.signal, Signal::Bullish);
    assert_eq!(outcome.risk.signal, Signal::Bullish);
    assert_eq!(outcome.risk.position_size, Some(1.0));

    // Latest close is 139; a full position affords floor(100000/139) = 719,
    // so the requested 500 stands.
    assert_eq!(outcome.decision.action, TradeAction::Buy);
    assert_eq!(outcome.decision.quantity, 500);
    assert_eq!(outcome.decision.agent_signals.len(), 1);
}

#[tokio::test]
async fn test_unparsable_oracle_output_degrades_to_hold() {
    let source = Arc::new(ManualDataSource::new(bullish_dataset()));
    let oracle = ScriptedOracle::replying("As an analyst I would recommend caution.");
    let pipeline = Pipeline::new(source, oracle);

    let outcome = pipeline
        .run("NVDA", window(), &Portfolio::default())
        .await
        .unwrap();

    assert_eq!(outcome.decision.action, TradeAction::Hold);
    assert_eq!(outcome.decision.quantity, 0);
    assert_eq!(outcome.decision.confidence.value(), 0.5);
    assert_eq!(
        outcome.decision.reasoning,
        "Error parsing portfolio management decision"
    );
}

#[tokio::test]
async fn test_unreachable_oracle_still_produces_outcome() {
    let source = Arc::new(ManualDataSource::new(bullish_dataset()));
    let pipeline = Pipeline::new(source, ScriptedOracle::failing()).with_show_reasoning(true);

    let outcome = pipeline
        .run("NVDA", window(), &Portfolio::default())
        .await
        .unwrap();

    // Upstream opinions are intact even though the oracle never answered
    assert_eq!(outcome.risk.signal, Signal::Bullish);
    assert_eq!(outcome.decision.action, TradeAction::Hold);
}

#[tokio::test]
async fn test_buy_capped_by_affordable_quantity() {
    let source = Arc::new(ManualDataSource::new(bullish_dataset()));
    let oracle = ScriptedOracle::replying(
        r#"{"action": "buy", "quantity": 10000, "confidence": 0.9, "reasoning": "all in"}"#,
    );
    let pipeline = Pipeline::new(source, oracle);

    let portfolio = Portfolio::with_cash(1_390.0);
    let outcome = pipeline.run("NVDA", window(), &portfolio).await.unwrap();

    // Latest close is 139.0: floor(1390 / 139) = 10 shares
    assert_eq!(outcome.decision.action, TradeAction::Buy);
    assert_eq!(outcome.decision.quantity, 10);
}
