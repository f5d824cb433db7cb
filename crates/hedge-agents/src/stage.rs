//! Scoring stage trait

use async_trait::async_trait;
use hedge_core::{AgentOpinion, MarketSnapshot, StageId};

/// A scoring stage: a replaceable function from snapshot to opinion
///
/// The three analytical stages implement this trait. They have no data
/// dependency on each other - each reads only the immutable snapshot - so
/// the orchestrator may evaluate them concurrently, joining before the
/// risk aggregator reads their opinions.
///
/// Implementations must always return exactly one opinion; insufficient
/// input degrades to a neutral opinion rather than an error.
#[async_trait]
pub trait ScoringStage: Send + Sync {
    /// Identity of this stage
    fn id(&self) -> StageId;

    /// Score the snapshot
    async fn evaluate(&self, snapshot: &MarketSnapshot) -> AgentOpinion;
}
