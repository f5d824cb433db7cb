//! Day-by-day backtest simulation
//!
//! The simulator iterates business days strictly in order, runs the full
//! pipeline once per day over a trailing 30-calendar-day lookback, and
//! executes the decision at that day's closing price. Days without any
//! price data in the lookback are skipped without touching the portfolio
//! or the equity curve.

use crate::Result;
use chrono::{Days, NaiveDate};
use hedge_agents::Pipeline;
use hedge_core::{Portfolio, TradeAction};
use hedge_data::{DateWindow, ManualDataSource, dates};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Calendar days of history handed to the pipeline each simulated day
const LOOKBACK_DAYS: u64 = 30;

/// One recorded mark-to-market portfolio value
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Everything a finished backtest produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub ticker: String,
    pub initial_capital: f64,
    pub final_portfolio: Portfolio,
    /// One point per simulated (non-skipped) business day, ascending
    pub equity_curve: Vec<EquityPoint>,
}

/// Execute a decision against the portfolio, returning the filled quantity
///
/// Buys that cost more than available cash are reduced to the maximum
/// affordable whole-share quantity; sells are clamped to the shares held.
/// Cash and shares never go negative.
pub fn execute_trade(
    portfolio: &mut Portfolio,
    action: TradeAction,
    quantity: u64,
    price: f64,
) -> u64 {
    match action {
        TradeAction::Buy if quantity > 0 => {
            let cost = quantity as f64 * price;
            let filled = if cost <= portfolio.cash {
                quantity
            } else {
                (portfolio.cash / price) as u64
            };
            if filled > 0 {
                portfolio.shares += filled;
                portfolio.cash -= filled as f64 * price;
            }
            filled
        }
        TradeAction::Sell if quantity > 0 => {
            let filled = quantity.min(portfolio.shares);
            if filled > 0 {
                portfolio.cash += filled as f64 * price;
                portfolio.shares -= filled;
            }
            filled
        }
        _ => 0,
    }
}

/// Replays the pipeline over a historical window
pub struct Backtester {
    pipeline: Pipeline,
    source: Arc<ManualDataSource>,
    ticker: String,
    window: DateWindow,
    initial_capital: f64,
}

impl Backtester {
    /// Set up a backtest over a manual dataset
    ///
    /// The pipeline must have been built over the same `source` so that
    /// each simulated day's snapshot comes from the dataset being
    /// replayed.
    pub fn new(
        pipeline: Pipeline,
        source: Arc<ManualDataSource>,
        ticker: impl Into<String>,
        window: DateWindow,
        initial_capital: f64,
    ) -> Self {
        Self {
            pipeline,
            source,
            ticker: ticker.into(),
            window,
            initial_capital,
        }
    }

    /// Run the simulation over every business day in the window
    pub async fn run(&self) -> Result<BacktestResult> {
        let mut portfolio = Portfolio::with_cash(self.initial_capital);
        let mut equity_curve = Vec::new();

        info!(
            ticker = %self.ticker,
            start = %self.window.start,
            end = %self.window.end,
            initial_capital = self.initial_capital,
            "starting backtest"
        );

        for day in dates::business_days(self.window.start, self.window.end) {
            let lookback_start = day
                .checked_sub_days(Days::new(LOOKBACK_DAYS))
                .unwrap_or(day);
            let lookback = DateWindow::new(lookback_start, day)?;

            let Some((_, price)) = self.source.dataset().last_close_in(lookback) else {
                info!(date = %day, "no price data available, skipping");
                continue;
            };

            let outcome = self.pipeline.run(&self.ticker, lookback, &portfolio).await?;
            let filled = execute_trade(
                &mut portfolio,
                outcome.decision.action,
                outcome.decision.quantity,
                price,
            );

            let total_value = portfolio.total_value(price);
            info!(
                date = %day,
                ticker = %self.ticker,
                action = %outcome.decision.action,
                quantity = filled,
                price,
                cash = portfolio.cash,
                shares = portfolio.shares,
                total_value,
                "simulated day"
            );
            equity_curve.push(EquityPoint {
                date: day,
                value: total_value,
            });
        }

        Ok(BacktestResult {
            ticker: self.ticker.clone(),
            initial_capital: self.initial_capital,
            final_portfolio: portfolio,
            equity_curve,
        })
    }
}
