//! Performance metrics over an equity curve
//!
//! All metrics treat the curve as daily observations over a 252-trading-day
//! year. Daily returns are consecutive-value percentage changes, and the
//! volatility estimate uses the sample standard deviation (n-1 divisor).

use crate::simulator::EquityPoint;
use serde::{Deserialize, Serialize};

/// Trading days per year used for annualization
const TRADING_DAYS: f64 = 252.0;

/// Summary statistics for one finished backtest
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Final value relative to initial capital, e.g. `0.10` for +10%
    pub total_return: f64,
    /// Total return compounded to a 252-day year
    pub annualized_return: f64,
    /// Sample standard deviation of daily returns, annualized
    pub annualized_volatility: f64,
    /// Annualized return over annualized volatility, `0.0` at zero volatility
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline, always `<= 0`
    pub max_drawdown: f64,
}

impl PerformanceReport {
    /// Analyze an equity curve against its starting capital
    ///
    /// Returns `None` for an empty curve: a backtest where every day was
    /// skipped has nothing to measure.
    pub fn from_equity_curve(initial_capital: f64, curve: &[EquityPoint]) -> Option<Self> {
        let last = curve.last()?;

        let total_return = (last.value - initial_capital) / initial_capital;
        let annualized_return = (1.0 + total_return).powf(TRADING_DAYS / curve.len() as f64) - 1.0;

        let daily_returns: Vec<f64> = curve
            .windows(2)
            .map(|pair| pair[1].value / pair[0].value - 1.0)
            .collect();
        let annualized_volatility = sample_std(&daily_returns) * TRADING_DAYS.sqrt();

        let sharpe_ratio = if annualized_volatility == 0.0 {
            0.0
        } else {
            annualized_return / annualized_volatility
        };

        let mut running_max = f64::MIN;
        let max_drawdown = curve
            .iter()
            .map(|point| {
                running_max = running_max.max(point.value);
                point.value / running_max - 1.0
            })
            .fold(0.0_f64, f64::min);

        Some(Self {
            total_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown,
        })
    }
}

/// Sample standard deviation (n-1 divisor), `0.0` below two observations
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}
