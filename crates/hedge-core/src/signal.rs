//! Signals, confidence values, stage opinions, and the final trading decision
//!
//! Confidence arrives at the system boundary in two shapes: a numeric
//! fraction (`0.82`) or a percentage string (`"82%"`). [`Confidence`]
//! normalizes both into a closed `[0, 1]` value exactly once, so every
//! downstream consumer works with a single real number.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A stage's directional opinion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// Expecting the price to rise
    Bullish,
    /// No directional conviction
    Neutral,
    /// Expecting the price to fall
    Bearish,
}

impl Signal {
    /// Majority vote over a set of sub-signals
    ///
    /// Bullish wins when strictly more sub-signals are bullish than
    /// bearish, bearish when the reverse holds, neutral on exact ties.
    /// The returned confidence is the largest category count over the
    /// total number of votes.
    pub fn majority(signals: &[Signal]) -> (Signal, Confidence) {
        if signals.is_empty() {
            return (Signal::Neutral, Confidence::from_fraction(0.0));
        }
        let bullish = signals.iter().filter(|s| **s == Signal::Bullish).count();
        let bearish = signals.iter().filter(|s| **s == Signal::Bearish).count();
        let neutral = signals.len() - bullish - bearish;

        let overall = if bullish > bearish {
            Signal::Bullish
        } else if bearish > bullish {
            Signal::Bearish
        } else {
            Signal::Neutral
        };
        let winning = bullish.max(bearish).max(neutral);
        let confidence = Confidence::from_fraction(winning as f64 / signals.len() as f64);
        (overall, confidence)
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::Neutral
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bullish => "bullish",
            Self::Neutral => "neutral",
            Self::Bearish => "bearish",
        };
        write!(f, "{s}")
    }
}

/// Identity of a pipeline stage
///
/// Opinions are keyed by stage identity rather than by free-form name
/// strings, so "find the message from agent X" is a typed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageId {
    /// Technical scoring stage
    #[serde(rename = "technical_analyst")]
    Technical,
    /// Fundamental scoring stage
    #[serde(rename = "fundamentals_agent")]
    Fundamental,
    /// Sentiment scoring stage
    #[serde(rename = "sentiment_agent")]
    Sentiment,
    /// Risk aggregation stage
    #[serde(rename = "risk_management_agent")]
    Risk,
    /// Final portfolio decision stage
    #[serde(rename = "portfolio_management")]
    Portfolio,
}

impl StageId {
    /// Wire/report name of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical_analyst",
            Self::Fundamental => "fundamentals_agent",
            Self::Sentiment => "sentiment_agent",
            Self::Risk => "risk_management_agent",
            Self::Portfolio => "portfolio_management",
        }
    }

    /// The three analytical stages read by the risk aggregator
    pub const ANALYSTS: [StageId; 3] = [Self::Technical, Self::Fundamental, Self::Sentiment];
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Certainty of a signal, always in the closed range `[0, 1]`
///
/// Construction normalizes the two boundary representations:
/// numbers are taken by absolute value and clamped, percentage strings are
/// stripped of a trailing `%` and divided by 100. Anything unparsable
/// becomes `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// The 50% confidence used for neutral signals and missing opinions
    pub const NEUTRAL: Confidence = Confidence(0.5);

    /// Normalize a numeric fraction into `[0, 1]`
    pub fn from_fraction(value: f64) -> Self {
        if !value.is_finite() {
            return Self(0.0);
        }
        Self(value.abs().clamp(0.0, 1.0))
    }

    /// Normalize a JSON value that may be a number or a percentage string
    pub fn normalize(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => Self::from_fraction(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => {
                let trimmed = s.trim().trim_end_matches('%');
                match trimmed.parse::<f64>() {
                    Ok(v) => Self::from_fraction(v / 100.0),
                    Err(_) => Self(0.0),
                }
            }
            _ => Self(0.0),
        }
    }

    /// The normalized value in `[0, 1]`
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Percentage rendering, capped at 100
    pub fn percent(&self) -> f64 {
        self.0 * 100.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(0.0)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.percent())
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::normalize(&value))
    }
}

/// The immutable record a scoring stage appends to the pipeline context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOpinion {
    /// Stage that produced the opinion
    pub agent: StageId,
    /// Directional signal
    pub signal: Signal,
    /// Certainty of the signal
    pub confidence: Confidence,
    /// Human-readable explanation of the signal
    pub reasoning: String,
    /// Fraction of maximum capital exposure allowed (risk aggregator only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_size: Option<f64>,
}

impl AgentOpinion {
    /// Create a new opinion
    pub fn new(
        agent: StageId,
        signal: Signal,
        confidence: Confidence,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            agent,
            signal,
            confidence,
            reasoning: reasoning.into(),
            position_size: None,
        }
    }

    /// Attach a position size (risk aggregator output)
    pub fn with_position_size(mut self, position_size: f64) -> Self {
        self.position_size = Some(position_size);
        self
    }

    /// Placeholder substituted for a missing upstream opinion
    pub fn missing(agent: StageId) -> Self {
        Self::new(
            agent,
            Signal::Neutral,
            Confidence::NEUTRAL,
            "No analysis available",
        )
    }
}

/// Action component of the final decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    /// Open or extend a position
    Buy,
    /// Reduce or close a position
    Sell,
    /// Do nothing
    Hold,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Hold => "hold",
        };
        write!(f, "{s}")
    }
}

/// Upstream signal snapshot carried on the final decision for audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSummary {
    /// Name of the contributing agent
    #[serde(alias = "agent_name", alias = "name")]
    pub agent: String,
    /// The agent's directional signal
    #[serde(default)]
    pub signal: Signal,
    /// The agent's confidence
    #[serde(default)]
    pub confidence: Confidence,
}

/// Final output of the portfolio decision stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingDecision {
    /// What to do
    pub action: TradeAction,
    /// Whole-share quantity for buy/sell actions
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u64,
    /// Certainty of the decision
    #[serde(default)]
    pub confidence: Confidence,
    /// Explanation including how the signals were weighed
    #[serde(default)]
    pub reasoning: String,
    /// Snapshot of the upstream signals the decision was based on
    #[serde(default)]
    pub agent_signals: Vec<SignalSummary>,
}

impl TradingDecision {
    /// Safe fallback substituted when the scoring oracle's output cannot be
    /// parsed as the expected JSON shape
    pub fn hold_fallback() -> Self {
        Self {
            action: TradeAction::Hold,
            quantity: 0,
            confidence: Confidence::NEUTRAL,
            reasoning: "Error parsing portfolio management decision".to_string(),
            agent_signals: Vec::new(),
        }
    }
}

/// Accept a quantity expressed as an integer, a float, or a numeric string
fn lenient_quantity<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let quantity = match &value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0).floor() as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| f.max(0.0).floor() as u64)
            .unwrap_or(0),
        _ => 0,
    };
    Ok(quantity)
}
