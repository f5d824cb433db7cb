//! Simulated single-asset portfolio

use serde::{Deserialize, Serialize};

/// A two-field cash/shares portfolio
///
/// Owned exclusively by the backtest simulator and mutated only between
/// sequential day iterations. Cash and shares never go negative; any
/// action that would violate this is clamped before execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Portfolio {
    /// Available cash, non-negative
    pub cash: f64,
    /// Held whole shares, non-negative
    pub shares: u64,
}

impl Portfolio {
    /// Create a portfolio with starting cash and no shares
    pub fn with_cash(cash: f64) -> Self {
        Self { cash, shares: 0 }
    }

    /// Total value marked to the given share price
    pub fn total_value(&self, price: f64) -> f64 {
        self.cash + self.shares as f64 * price
    }
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            cash: 100_000.0,
            shares: 0,
        }
    }
}
