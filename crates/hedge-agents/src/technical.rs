//! Technical scoring stage
//!
//! Derives trend and momentum indicators from the snapshot's price bars
//! and votes them into one opinion. The indicator set is a replaceable
//! detail; the contract is fixed: exactly one opinion per evaluation, and
//! insufficient price history yields a zero-confidence neutral opinion
//! rather than an error.

use crate::stage::ScoringStage;
use async_trait::async_trait;
use hedge_core::{AgentOpinion, Confidence, MarketSnapshot, Signal, StageId};
use ta::{
    Next,
    indicators::{ExponentialMovingAverage, RelativeStrengthIndex, SimpleMovingAverage},
};
use tracing::debug;

const RSI_PERIOD: usize = 14;
const SMA_PERIOD: usize = 20;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;

/// Minimum bars required before the indicators are meaningful
const MIN_BARS: usize = MACD_SLOW;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;

/// Technical scoring stage over RSI, SMA, and MACD votes
#[derive(Debug, Default)]
pub struct TechnicalAnalyst;

impl TechnicalAnalyst {
    pub fn new() -> Self {
        Self
    }

    fn insufficient_data() -> AgentOpinion {
        AgentOpinion::new(
            StageId::Technical,
            Signal::Neutral,
            Confidence::from_fraction(0.0),
            format!("Insufficient price history for technical analysis (need {MIN_BARS} bars)"),
        )
    }

    fn score(closes: &[f64]) -> Option<AgentOpinion> {
        let mut rsi = RelativeStrengthIndex::new(RSI_PERIOD).ok()?;
        let mut sma = SimpleMovingAverage::new(SMA_PERIOD).ok()?;
        let mut ema_fast = ExponentialMovingAverage::new(MACD_FAST).ok()?;
        let mut ema_slow = ExponentialMovingAverage::new(MACD_SLOW).ok()?;

        let (mut last_rsi, mut last_sma, mut last_macd) = (0.0, 0.0, 0.0);
        for &close in closes {
            last_rsi = rsi.next(close);
            last_sma = sma.next(close);
            last_macd = ema_fast.next(close) - ema_slow.next(close);
        }
        let last_close = *closes.last()?;

        let rsi_vote = if last_rsi < RSI_OVERSOLD {
            Signal::Bullish
        } else if last_rsi > RSI_OVERBOUGHT {
            Signal::Bearish
        } else {
            Signal::Neutral
        };
        let sma_vote = if last_close > last_sma {
            Signal::Bullish
        } else if last_close < last_sma {
            Signal::Bearish
        } else {
            Signal::Neutral
        };
        let macd_vote = if last_macd > 0.0 {
            Signal::Bullish
        } else if last_macd < 0.0 {
            Signal::Bearish
        } else {
            Signal::Neutral
        };

        let votes = [rsi_vote, sma_vote, macd_vote];
        let (signal, confidence) = Signal::majority(&votes);

        let reasoning = format!(
            "RSI({RSI_PERIOD})={last_rsi:.1} ({rsi_vote}) | \
             Price={last_close:.2} vs SMA({SMA_PERIOD})={last_sma:.2} ({sma_vote}) | \
             MACD={last_macd:.3} ({macd_vote})"
        );

        Some(AgentOpinion::new(
            StageId::Technical,
            signal,
            confidence,
            reasoning,
        ))
    }
}

#[async_trait]
impl ScoringStage for TechnicalAnalyst {
    fn id(&self) -> StageId {
        StageId::Technical
    }

    async fn evaluate(&self, snapshot: &MarketSnapshot) -> AgentOpinion {
        if snapshot.prices.len() < MIN_BARS {
            debug!(
                bars = snapshot.prices.len(),
                "not enough price history for indicators"
            );
            return Self::insufficient_data();
        }

        let closes: Vec<f64> = snapshot.prices.iter().map(|bar| bar.close).collect();
        Self::score(&closes).unwrap_or_else(Self::insufficient_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use hedge_core::{FinancialMetrics, PriceBar, SentimentInput};

    fn snapshot_from_closes(closes: &[f64]) -> MarketSnapshot {
        let start: NaiveDate = "2024-01-01".parse().unwrap();
        let prices = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000.0,
            })
            .collect::<Vec<_>>();
        let end = prices.last().map_or(start, |bar| bar.date);
        MarketSnapshot {
            ticker: "TEST".to_string(),
            start_date: start,
            end_date: end,
            prices,
            financial_metrics: vec![FinancialMetrics::default()],
            financial_line_items: Vec::new(),
            insider_trades: Vec::new(),
            market_cap: 1.0e12,
            sentiment: SentimentInput::default(),
        }
    }

    #[tokio::test]
    async fn test_insufficient_history_is_neutral_never_fails() {
        let analyst = TechnicalAnalyst::new();
        let opinion = analyst.evaluate(&snapshot_from_closes(&[100.0, 101.0])).await;
        assert_eq!(opinion.signal, Signal::Neutral);
        assert_eq!(opinion.confidence.value(), 0.0);
        assert!(opinion.reasoning.contains("Insufficient price history"));
    }

    #[tokio::test]
    async fn test_uptrend_scores_bullish() {
        // Steady climb: price above SMA, positive MACD
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let analyst = TechnicalAnalyst::new();
        let opinion = analyst.evaluate(&snapshot_from_closes(&closes)).await;
        assert_eq!(opinion.signal, Signal::Bullish);
        assert!(opinion.confidence.value() > 0.0);
    }

    #[tokio::test]
    async fn test_downtrend_scores_bearish() {
        let closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        let analyst = TechnicalAnalyst::new();
        let opinion = analyst.evaluate(&snapshot_from_closes(&closes)).await;
        assert_eq!(opinion.signal, Signal::Bearish);
    }

    #[tokio::test]
    async fn test_always_exactly_one_opinion() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 3) as f64).collect();
        let analyst = TechnicalAnalyst::new();
        let opinion = analyst.evaluate(&snapshot_from_closes(&closes)).await;
        assert_eq!(opinion.agent, StageId::Technical);
        let v = opinion.confidence.value();
        assert!((0.0..=1.0).contains(&v));
    }
}
