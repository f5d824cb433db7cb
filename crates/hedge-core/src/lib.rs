//! Core domain types for the hedge-rs decision pipeline
//!
//! This crate defines the vocabulary shared by every stage of the pipeline:
//!
//! - [`Signal`] - a stage's directional opinion (bullish / neutral / bearish)
//! - [`Confidence`] - certainty of a signal, normalized into `[0, 1]` once at
//!   the system boundary regardless of whether the source expressed it as a
//!   fraction or a percentage string
//! - [`AgentOpinion`] - the `{signal, confidence, reasoning}` record each
//!   scoring stage emits
//! - [`TradingDecision`] - the final `{action, quantity, ...}` output
//! - [`MarketSnapshot`] - the immutable bundle of price, fundamental, and
//!   sentiment data a single pipeline run consumes
//! - [`PipelineContext`] - the append-only opinion log threaded through the
//!   stages, with typed lookup by [`StageId`]

pub mod context;
pub mod error;
pub mod portfolio;
pub mod signal;
pub mod snapshot;

// Re-export main types for convenience
pub use context::PipelineContext;
pub use error::{CoreError, Result};
pub use portfolio::Portfolio;
pub use signal::{
    AgentOpinion, Confidence, Signal, SignalSummary, StageId, TradeAction, TradingDecision,
};
pub use snapshot::{
    AnalystRatings, FinancialLineItem, FinancialMetrics, InsiderTrade, MarketSnapshot, NewsImpact,
    NewsItem, PriceBar, SentimentInput, SentimentLabel,
};
