//! Scoring stages and pipeline orchestration for hedge-rs
//!
//! The pipeline is a fixed directed acyclic graph of analysis stages:
//!
//! ```text
//! Loader -> { Technical, Fundamental, Sentiment } -> Risk -> Portfolio
//!                     (evaluated concurrently)
//! ```
//!
//! Each scoring stage maps the immutable [`hedge_core::MarketSnapshot`]
//! to one `{signal, confidence, reasoning}` opinion. The risk aggregator
//! merges the three analytical opinions under a 2-of-3 agreement policy
//! and emits a bounded position size; the portfolio decision stage weighs
//! everything (fundamentals 50%, technicals 35%, sentiment 15%) through a
//! scoring oracle under hard risk constraints.
//!
//! Scoring stages never fail: missing inputs degrade to neutral opinions
//! and unparsable oracle output degrades to a hold decision.

pub mod error;
pub mod fundamental;
pub mod pipeline;
pub mod portfolio;
pub mod risk;
pub mod sentiment;
pub mod stage;
pub mod technical;

// Re-export main types for convenience
pub use error::{PipelineError, Result};
pub use fundamental::FundamentalAnalyst;
pub use pipeline::{AnalysisOutcome, Pipeline};
pub use portfolio::PortfolioManager;
pub use risk::RiskAggregator;
pub use sentiment::SentimentAnalyst;
pub use stage::ScoringStage;
pub use technical::TechnicalAnalyst;
