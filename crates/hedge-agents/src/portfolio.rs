//! Portfolio decision stage
//!
//! The only stage that consults the scoring oracle. It assembles the four
//! upstream opinions and the current portfolio into a structured prompt,
//! asks the oracle for a JSON trading decision, and then enforces the risk
//! aggregator's constraints on whatever comes back: the risk direction is
//! binding, and buy quantities are capped by the allowed position size.
//! Unusable oracle output degrades to a documented hold decision.

use hedge_core::{
    AgentOpinion, PipelineContext, Portfolio, Signal, StageId, TradeAction, TradingDecision,
};
use hedge_llm::{CompletionRequest, LlmProvider, json};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const SYSTEM_PROMPT: &str = "\
You are a portfolio manager making final trading decisions.
Your job is to make a trading decision based on the team's analysis while strictly adhering
to risk management constraints.

RISK MANAGEMENT CONSTRAINTS:
- You MUST NOT exceed the max_position_size specified by the risk manager
- You MUST follow the trading_action (buy/sell/hold) recommended by risk management
- These are hard constraints that cannot be overridden by other signals

When weighing the different signals for direction and timing:
1. Fundamental Analysis (50% weight)
   - Primary driver of trading decisions
   - Should determine overall direction

2. Technical Analysis (35% weight)
   - Secondary confirmation
   - Helps with entry/exit timing

3. Sentiment Analysis (15% weight)
   - Final consideration
   - Can influence sizing within risk limits

The decision process should be:
1. First check risk management constraints
2. Then evaluate fundamental outlook
3. Use technical analysis for timing
4. Consider sentiment for final adjustment

Provide the following in your output:
- \"action\": \"buy\" | \"sell\" | \"hold\",
- \"quantity\": <positive integer>
- \"confidence\": <float between 0 and 1>
- \"agent_signals\": <list of agent signals including agent name, signal (bullish | bearish | neutral), and their confidence>
- \"reasoning\": <concise explanation of the decision including how you weighted the signals>

Trading Rules:
- Never exceed risk management position limits
- Only buy if you have available cash
- Only sell if you have shares to sell
- Quantity must be <= current position for sells
- Quantity must be <= max_position_size from risk management";

/// Portfolio decision stage backed by a scoring oracle
pub struct PortfolioManager {
    provider: Arc<dyn LlmProvider>,
}

impl PortfolioManager {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Serialize one opinion the way the prompt expects
    fn opinion_payload(opinion: &AgentOpinion) -> String {
        let mut payload = serde_json::json!({
            "signal": opinion.signal,
            "confidence": opinion.confidence,
            "reasoning": opinion.reasoning,
        });
        if let (Some(size), Some(object)) = (opinion.position_size, payload.as_object_mut()) {
            object.insert("max_position_size".to_string(), serde_json::json!(size));
        }
        payload.to_string()
    }

    fn user_prompt(ctx: &PipelineContext, portfolio: &Portfolio) -> String {
        let opinion_of = |stage: StageId| {
            ctx.opinion_for(stage)
                .cloned()
                .unwrap_or_else(|| AgentOpinion::missing(stage))
        };
        format!(
            "Based on the team's analysis below, make your trading decision.\n\n\
             Technical Analysis Trading Signal: {}\n\
             Fundamental Analysis Trading Signal: {}\n\
             Sentiment Analysis Trading Signal: {}\n\
             Risk Management Trading Signal: {}\n\n\
             Here is the current portfolio:\n\
             Portfolio:\n\
             Cash: {:.2}\n\
             Current Position: {} shares\n\n\
             Only include the action, quantity, reasoning, confidence, and agent_signals \
             in your output as JSON. Do not include any JSON markdown.\n\n\
             Remember, the action must be either buy, sell, or hold.\n\
             You can only buy if you have available cash.\n\
             You can only sell if you have shares in the portfolio to sell.",
            Self::opinion_payload(&opinion_of(StageId::Technical)),
            Self::opinion_payload(&opinion_of(StageId::Fundamental)),
            Self::opinion_payload(&opinion_of(StageId::Sentiment)),
            Self::opinion_payload(&opinion_of(StageId::Risk)),
            portfolio.cash,
            portfolio.shares,
        )
    }

    /// Make the risk aggregator's output binding on the parsed decision
    ///
    /// A bearish risk posture forbids buying and a bullish one forbids
    /// selling; violations are coerced to hold. Buys are capped at the
    /// whole-share quantity the allowed position size affords at the
    /// latest close, sells at the shares actually held.
    fn enforce_risk_constraints(
        mut decision: TradingDecision,
        risk: Option<&AgentOpinion>,
        portfolio: &Portfolio,
        latest_close: Option<f64>,
    ) -> TradingDecision {
        let risk_signal = risk.map_or(Signal::Neutral, |o| o.signal);
        let position_size = risk.and_then(|o| o.position_size).unwrap_or(1.0);

        match decision.action {
            TradeAction::Buy if risk_signal == Signal::Bearish => {
                decision.action = TradeAction::Hold;
                decision.quantity = 0;
                decision
                    .reasoning
                    .push_str(" [risk constraint: bearish posture forbids buying]");
            }
            TradeAction::Sell if risk_signal == Signal::Bullish => {
                decision.action = TradeAction::Hold;
                decision.quantity = 0;
                decision
                    .reasoning
                    .push_str(" [risk constraint: bullish posture forbids selling]");
            }
            TradeAction::Buy => {
                let cap = latest_close
                    .filter(|price| *price > 0.0)
                    .map_or(0, |price| (position_size * portfolio.cash / price) as u64);
                if decision.quantity > cap {
                    debug!(
                        requested = decision.quantity,
                        cap, "buy quantity capped by position size"
                    );
                    decision.quantity = cap;
                }
            }
            TradeAction::Sell => {
                decision.quantity = decision.quantity.min(portfolio.shares);
            }
            TradeAction::Hold => {
                decision.quantity = 0;
            }
        }
        decision
    }

    /// Ask the oracle for the final decision over the run's opinions
    ///
    /// Never fails: an unreachable oracle or unparsable response degrades
    /// to a hold decision.
    #[instrument(skip_all, fields(ticker = %ctx.snapshot().ticker))]
    pub async fn decide(&self, ctx: &PipelineContext, portfolio: &Portfolio) -> TradingDecision {
        let request = CompletionRequest::new(Self::user_prompt(ctx, portfolio))
            .with_system(SYSTEM_PROMPT)
            .with_temperature(0.2);

        let raw = match self.provider.complete(request).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, provider = self.provider.name(), "oracle unreachable, holding");
                return TradingDecision {
                    reasoning: "Portfolio management oracle unavailable".to_string(),
                    ..TradingDecision::hold_fallback()
                };
            }
        };

        let decision = json::parse_or_default(&raw, TradingDecision::hold_fallback());
        Self::enforce_risk_constraints(
            decision,
            ctx.opinion_for(StageId::Risk),
            portfolio,
            ctx.snapshot().latest_close(),
        )
    }
}
