//! Fundamental scoring stage
//!
//! A pure function of the latest financial metrics, market cap, and the
//! first reported free-cash-flow line item. Five sub-scores each vote
//! bullish/bearish/neutral by threshold; the overall signal is the
//! majority vote and the confidence is the winning category's share of
//! the five votes.

use crate::stage::ScoringStage;
use async_trait::async_trait;
use hedge_core::{
    AgentOpinion, Confidence, FinancialMetrics, MarketSnapshot, Signal, StageId,
};
use tracing::debug;

/// Fundamental scoring stage
#[derive(Debug, Default)]
pub struct FundamentalAnalyst;

/// Threshold score to a sub-signal: 2-of-3 is bullish, 0-of-3 is bearish
fn threshold_signal(score: u32) -> Signal {
    if score >= 2 {
        Signal::Bullish
    } else if score == 0 {
        Signal::Bearish
    } else {
        Signal::Neutral
    }
}

fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

impl FundamentalAnalyst {
    pub fn new() -> Self {
        Self
    }

    fn profitability(metrics: &FinancialMetrics) -> (Signal, String) {
        let mut score = 0;
        if metrics.return_on_equity > 0.15 {
            score += 1;
        }
        if metrics.net_margin > 0.20 {
            score += 1;
        }
        if metrics.operating_margin > 0.15 {
            score += 1;
        }
        let reasoning = format!(
            "Profitability: ROE={}, Net Margin={}, Op Margin={}",
            pct(metrics.return_on_equity),
            pct(metrics.net_margin),
            pct(metrics.operating_margin)
        );
        (threshold_signal(score), reasoning)
    }

    fn growth(metrics: &FinancialMetrics) -> (Signal, String) {
        let mut score = 0;
        if metrics.revenue_growth > 0.10 {
            score += 1;
        }
        if metrics.earnings_growth > 0.10 {
            score += 1;
        }
        if metrics.book_value_growth > 0.10 {
            score += 1;
        }
        let reasoning = format!(
            "Growth: Revenue={}, Earnings={}, Book Value={}",
            pct(metrics.revenue_growth),
            pct(metrics.earnings_growth),
            pct(metrics.book_value_growth)
        );
        (threshold_signal(score), reasoning)
    }

    fn financial_health(metrics: &FinancialMetrics) -> (Signal, String) {
        let mut score = 0;
        if metrics.current_ratio > 1.5 {
            score += 1;
        }
        if metrics.debt_to_equity < 0.5 {
            score += 1;
        }
        if metrics.free_cash_flow_per_share > metrics.earnings_per_share * 0.8 {
            score += 1;
        }
        let reasoning = format!(
            "Financial Health: Current Ratio={:.1}, D/E={:.1}, FCF/Share=${:.2}",
            metrics.current_ratio, metrics.debt_to_equity, metrics.free_cash_flow_per_share
        );
        (threshold_signal(score), reasoning)
    }

    fn valuation(metrics: &FinancialMetrics) -> (Signal, String) {
        let mut score = 0;
        if metrics.price_to_earnings_ratio < 25.0 {
            score += 1;
        }
        if metrics.price_to_book_ratio < 3.0 {
            score += 1;
        }
        if metrics.price_to_sales_ratio < 5.0 {
            score += 1;
        }
        let reasoning = format!(
            "Valuation: P/E={:.1}, P/B={:.1}, P/S={:.1}",
            metrics.price_to_earnings_ratio,
            metrics.price_to_book_ratio,
            metrics.price_to_sales_ratio
        );
        (threshold_signal(score), reasoning)
    }

    fn cash_flow(free_cash_flow: Option<f64>, market_cap: f64) -> (Signal, String) {
        let Some(fcf) = free_cash_flow else {
            return (
                Signal::Neutral,
                "Cash Flow: Insufficient data for analysis".to_string(),
            );
        };
        let fcf_yield = if market_cap > 0.0 { fcf / market_cap } else { 0.0 };
        if fcf_yield > 0.05 {
            (
                Signal::Bullish,
                format!("Cash Flow: Strong FCF yield of {}", pct(fcf_yield)),
            )
        } else if fcf_yield < 0.02 {
            (
                Signal::Bearish,
                format!("Cash Flow: Low FCF yield of {}", pct(fcf_yield)),
            )
        } else {
            (
                Signal::Neutral,
                format!("Cash Flow: Moderate FCF yield of {}", pct(fcf_yield)),
            )
        }
    }
}

#[async_trait]
impl ScoringStage for FundamentalAnalyst {
    fn id(&self) -> StageId {
        StageId::Fundamental
    }

    async fn evaluate(&self, snapshot: &MarketSnapshot) -> AgentOpinion {
        let Some(metrics) = snapshot.latest_metrics() else {
            return AgentOpinion::new(
                StageId::Fundamental,
                Signal::Neutral,
                Confidence::from_fraction(0.0),
                "No financial metrics available",
            );
        };

        let sub_scores = [
            Self::profitability(metrics),
            Self::growth(metrics),
            Self::financial_health(metrics),
            Self::valuation(metrics),
            Self::cash_flow(snapshot.free_cash_flow(), snapshot.market_cap),
        ];

        let signals: Vec<Signal> = sub_scores.iter().map(|(signal, _)| *signal).collect();
        let (overall, confidence) = Signal::majority(&signals);
        let reasoning = sub_scores
            .iter()
            .map(|(_, reason)| reason.as_str())
            .collect::<Vec<_>>()
            .join(" | ");

        debug!(signal = %overall, confidence = confidence.value(), "fundamental sub-scores merged");
        AgentOpinion::new(StageId::Fundamental, overall, confidence, reasoning)
    }
}
