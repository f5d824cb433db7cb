//! Risk aggregation stage
//!
//! Turns the three analyst opinions into a risk posture: a directional
//! signal, a boosted or floored confidence, and a position size in
//! `[0, 1]` that caps the fraction of capital the portfolio stage may
//! deploy. Two or more agreeing directional signals are decisive; mixed
//! signals fall back to a half position.

use hedge_core::{AgentOpinion, Confidence, PipelineContext, Signal, StageId};
use tracing::debug;

/// Confidence boost applied when at least two analysts agree
const AGREEMENT_BOOST: f64 = 0.2;

/// Ceiling on boosted confidence
const CONFIDENCE_CAP: f64 = 0.95;

/// Risk aggregation stage over the analyst opinions
#[derive(Debug, Default)]
pub struct RiskAggregator;

impl RiskAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate the analyst opinions already in the context
    ///
    /// Missing analyst opinions are simply absent from the tally; the
    /// stage never fails. An empty tally averages to 50% confidence.
    pub fn aggregate(&self, ctx: &PipelineContext) -> AgentOpinion {
        let opinions = ctx.analyst_opinions();

        let bullish_count = opinions
            .iter()
            .filter(|o| o.signal == Signal::Bullish)
            .count();
        let bearish_count = opinions
            .iter()
            .filter(|o| o.signal == Signal::Bearish)
            .count();

        let avg_confidence = if opinions.is_empty() {
            0.5
        } else {
            opinions.iter().map(|o| o.confidence.value()).sum::<f64>() / opinions.len() as f64
        };

        let (signal, position_size, confidence) = if bearish_count >= 2 {
            (
                Signal::Bearish,
                0.0,
                (avg_confidence + AGREEMENT_BOOST).min(CONFIDENCE_CAP),
            )
        } else if bullish_count >= 2 {
            (
                Signal::Bullish,
                1.0,
                (avg_confidence + AGREEMENT_BOOST).min(CONFIDENCE_CAP),
            )
        } else {
            (Signal::Neutral, 0.5, avg_confidence.max(0.5))
        };

        let reasoning = format!(
            "Signal Agreement: {bullish_count} bullish, {bearish_count} bearish | \
             Average Signal Confidence: {:.1}% | Position Size: {:.1}%",
            avg_confidence * 100.0,
            position_size * 100.0
        );

        debug!(signal = %signal, position_size, "risk posture determined");
        AgentOpinion::new(
            StageId::Risk,
            signal,
            Confidence::from_fraction(confidence),
            reasoning,
        )
        .with_position_size(position_size)
    }
}
