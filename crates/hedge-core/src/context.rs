//! Pipeline execution context
//!
//! The context threads one immutable [`MarketSnapshot`] and an append-only
//! log of [`AgentOpinion`]s through the stages of a single run. Each stage
//! reads the history and appends exactly one new entry; lookup is typed by
//! [`StageId`] rather than by name strings.

use crate::signal::{AgentOpinion, StageId};
use crate::snapshot::MarketSnapshot;

/// State threaded through the stages of one pipeline run
///
/// Created by the orchestrator at run start and discarded after the final
/// decision is extracted. Mutable only by appending.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    snapshot: MarketSnapshot,
    show_reasoning: bool,
    opinions: Vec<AgentOpinion>,
}

impl PipelineContext {
    /// Create a context for one run over the given snapshot
    pub fn new(snapshot: MarketSnapshot, show_reasoning: bool) -> Self {
        Self {
            snapshot,
            show_reasoning,
            opinions: Vec::new(),
        }
    }

    /// The immutable snapshot this run analyzes
    pub fn snapshot(&self) -> &MarketSnapshot {
        &self.snapshot
    }

    /// Whether stages should print their reasoning as they run
    pub fn show_reasoning(&self) -> bool {
        self.show_reasoning
    }

    /// Append a stage's opinion to the run history
    pub fn push_opinion(&mut self, opinion: AgentOpinion) {
        self.opinions.push(opinion);
    }

    /// Full opinion history, in stage-completion order
    pub fn opinions(&self) -> &[AgentOpinion] {
        &self.opinions
    }

    /// The first opinion recorded by the given stage, if any
    pub fn opinion_for(&self, stage: StageId) -> Option<&AgentOpinion> {
        self.opinions.iter().find(|o| o.agent == stage)
    }

    /// Opinions from the three analytical stages that are present
    ///
    /// Missing stages are simply absent; callers degrade rather than error.
    pub fn analyst_opinions(&self) -> Vec<&AgentOpinion> {
        StageId::ANALYSTS
            .iter()
            .filter_map(|stage| self.opinion_for(*stage))
            .collect()
    }
}
