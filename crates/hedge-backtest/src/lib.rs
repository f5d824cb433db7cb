//! Backtest simulator and performance analyzer for hedge-rs
//!
//! [`Backtester`] replays the full analysis pipeline over every business
//! day of a historical window against a pre-supplied manual dataset,
//! executing the resulting decisions against a simulated cash/shares
//! portfolio under strict no-negative constraints. The recorded equity
//! curve feeds [`PerformanceReport`], which computes total and annualized
//! return, annualized volatility, Sharpe ratio, and maximum drawdown.

pub mod error;
pub mod performance;
pub mod simulator;

pub use error::{BacktestError, Result};
pub use performance::PerformanceReport;
pub use simulator::{Backtester, BacktestResult, EquityPoint, execute_trade};
