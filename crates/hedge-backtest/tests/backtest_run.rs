//! Full backtest runs over an in-memory manual dataset

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use hedge_agents::Pipeline;
use hedge_backtest::{Backtester, PerformanceReport};
use hedge_data::{DateWindow, ManualDataSource, ManualDataset, dates::parse_date};
use hedge_llm::{CompletionRequest, LlmProvider};
use serde_json::{Value, json};
use std::sync::Arc;

struct AlwaysBuyOne;

#[async_trait]
impl LlmProvider for AlwaysBuyOne {
    async fn complete(&self, _request: CompletionRequest) -> hedge_llm::Result<String> {
        Ok(r#"{"action": "buy", "quantity": 1, "confidence": 0.7, "reasoning": "accumulate"}"#
            .to_string())
    }

    fn name(&self) -> &str {
        "always-buy-one"
    }
}

/// Weekday bars from 2024-05-01 through 2024-07-31 climbing 0.5/day
fn dataset() -> ManualDataset {
    let start: NaiveDate = "2024-05-01".parse().unwrap();
    let end: NaiveDate = "2024-07-31".parse().unwrap();
    let mut prices: Vec<Value> = Vec::new();
    let mut day = start;
    let mut close = 100.0;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            prices.push(json!({
                "time": day.format("%Y-%m-%d").to_string(),
                "open": close - 0.25,
                "high": close + 0.5,
                "low": close - 0.5,
                "close": close,
                "volume": 500_000,
            }));
            close += 0.5;
        }
        day = day.checked_add_days(Days::new(1)).unwrap();
    }

    ManualDataset::from_value(json!({
        "prices": prices,
        "financial_metrics": {
            "return_on_equity": 0.20,
            "net_margin": 0.22,
            "operating_margin": 0.18,
            "revenue_growth": 0.12,
            "earnings_growth": 0.15,
            "book_value_growth": 0.11,
            "current_ratio": 2.0,
            "debt_to_equity": 0.3,
            "free_cash_flow_per_share": 5.0,
            "earnings_per_share": 5.0,
            "price_to_earnings_ratio": 20.0,
            "price_to_book_ratio": 2.5,
            "price_to_sales_ratio": 4.0
        },
        "insider_trades": [],
        "market_cap": 5.0e10,
        "market_sentiment": {"overall_sentiment": "bullish", "confidence": 0.8}
    }))
    .unwrap()
}

fn backtester(window: DateWindow, initial_capital: f64) -> Backtester {
    let source = Arc::new(ManualDataSource::new(dataset()));
    let pipeline = Pipeline::new(source.clone(), Arc::new(AlwaysBuyOne));
    Backtester::new(pipeline, source, "AAPL", window, initial_capital)
}

#[tokio::test]
async fn test_accumulates_one_share_per_business_day() {
    let window = DateWindow::new(
        parse_date("2024-06-03").unwrap(),
        parse_date("2024-06-14").unwrap(),
    )
    .unwrap();
    let result = backtester(window, 100_000.0).run().await.unwrap();

    // Ten business days in the window, each buying exactly one share
    assert_eq!(result.equity_curve.len(), 10);
    assert_eq!(result.final_portfolio.shares, 10);
    assert!(result.final_portfolio.cash < 100_000.0);

    // Curve dates are strictly ascending weekdays
    for pair in result.equity_curve.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
}

#[tokio::test]
async fn test_days_without_prices_are_skipped() {
    // The dataset starts 2024-05-01; backtesting March has no lookback data
    let window = DateWindow::new(
        parse_date("2024-03-04").unwrap(),
        parse_date("2024-03-08").unwrap(),
    )
    .unwrap();
    let result = backtester(window, 50_000.0).run().await.unwrap();

    assert!(result.equity_curve.is_empty());
    assert_eq!(result.final_portfolio.shares, 0);
    assert_eq!(result.final_portfolio.cash, 50_000.0);
    assert!(PerformanceReport::from_equity_curve(50_000.0, &result.equity_curve).is_none());
}

#[tokio::test]
async fn test_performance_report_over_rising_market() {
    let window = DateWindow::new(
        parse_date("2024-06-03").unwrap(),
        parse_date("2024-07-26").unwrap(),
    )
    .unwrap();
    let result = backtester(window, 10_000.0).run().await.unwrap();
    let report =
        PerformanceReport::from_equity_curve(result.initial_capital, &result.equity_curve)
            .unwrap();

    // Rising prices with a long position: positive return, no drawdown floor breach
    assert!(report.total_return > 0.0);
    assert!(report.annualized_return > 0.0);
    assert!(report.max_drawdown <= 0.0);
    assert!(report.max_drawdown > -0.05);
}
