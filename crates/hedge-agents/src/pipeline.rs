//! Pipeline orchestration
//!
//! One [`Pipeline::run`] executes the fixed stage graph for a single
//! ticker and window: load the snapshot, evaluate the three analytical
//! stages concurrently, aggregate risk, and ask the portfolio stage for
//! the final decision. Only the load can fail; every later stage degrades
//! locally.

use crate::Result;
use crate::fundamental::FundamentalAnalyst;
use crate::portfolio::PortfolioManager;
use crate::risk::RiskAggregator;
use crate::sentiment::SentimentAnalyst;
use crate::stage::ScoringStage;
use crate::technical::TechnicalAnalyst;
use hedge_core::{AgentOpinion, PipelineContext, Portfolio, TradingDecision};
use hedge_data::{DataSource, DateWindow};
use hedge_llm::LlmProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Everything one pipeline run produced, for reporting and backtesting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub ticker: String,
    pub technical: AgentOpinion,
    pub fundamental: AgentOpinion,
    pub sentiment: AgentOpinion,
    pub risk: AgentOpinion,
    pub decision: TradingDecision,
}

/// The fixed analysis stage graph
pub struct Pipeline {
    source: Arc<dyn DataSource>,
    technical: TechnicalAnalyst,
    fundamental: FundamentalAnalyst,
    sentiment: SentimentAnalyst,
    risk: RiskAggregator,
    portfolio: PortfolioManager,
    show_reasoning: bool,
}

impl Pipeline {
    /// Assemble the pipeline over a data source and a scoring oracle
    pub fn new(source: Arc<dyn DataSource>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            source,
            technical: TechnicalAnalyst::new(),
            fundamental: FundamentalAnalyst::new(),
            sentiment: SentimentAnalyst::new(),
            risk: RiskAggregator::new(),
            portfolio: PortfolioManager::new(provider),
            show_reasoning: false,
        }
    }

    /// Log each stage's reasoning as it completes
    pub fn with_show_reasoning(mut self, show_reasoning: bool) -> Self {
        self.show_reasoning = show_reasoning;
        self
    }

    fn trace_opinion(&self, opinion: &AgentOpinion) {
        if self.show_reasoning {
            info!(
                stage = %opinion.agent,
                signal = %opinion.signal,
                confidence = %opinion.confidence,
                reasoning = %opinion.reasoning,
                "stage completed"
            );
        }
    }

    /// Run the full stage graph once
    ///
    /// Fails only when the data source cannot assemble a snapshot.
    #[instrument(skip(self, window, portfolio), fields(start = %window.start, end = %window.end))]
    pub async fn run(
        &self,
        ticker: &str,
        window: DateWindow,
        portfolio: &Portfolio,
    ) -> Result<AnalysisOutcome> {
        let snapshot = self.source.fetch_snapshot(ticker, window).await?;
        let mut ctx = PipelineContext::new(snapshot, self.show_reasoning);

        // The analytical stages share only the immutable snapshot
        let (technical, fundamental, sentiment) = tokio::join!(
            self.technical.evaluate(ctx.snapshot()),
            self.fundamental.evaluate(ctx.snapshot()),
            self.sentiment.evaluate(ctx.snapshot()),
        );
        for opinion in [&technical, &fundamental, &sentiment] {
            self.trace_opinion(opinion);
        }
        ctx.push_opinion(technical.clone());
        ctx.push_opinion(fundamental.clone());
        ctx.push_opinion(sentiment.clone());

        let risk = self.risk.aggregate(&ctx);
        self.trace_opinion(&risk);
        ctx.push_opinion(risk.clone());

        let decision = self.portfolio.decide(&ctx, portfolio).await;
        info!(
            ticker,
            action = %decision.action,
            quantity = decision.quantity,
            confidence = %decision.confidence,
            "final decision"
        );

        Ok(AnalysisOutcome {
            ticker: ticker.to_string(),
            technical,
            fundamental,
            sentiment,
            risk,
            decision,
        })
    }
}
