//! Per-asset pipeline state machine

use std::fmt;

use tracing::{debug, error};

use crate::error::PipelineError;

/// Stage an asset pipeline run is in.
///
/// `Storing` and `Classifying` are entered once per downloaded file; the
/// run returns to `Fetching` while downloads remain. Object files are
/// placed once every download has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Resolving,
    Fetching,
    Storing,
    Classifying,
    Placing,
    Placed,
    Failed(PipelineError),
}

impl PipelineState {
    /// `Placed` and `Failed` end a run; only a fresh run can follow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Placed | PipelineState::Failed(_))
    }

    pub fn can_transition_to(&self, next: &PipelineState) -> bool {
        use PipelineState::*;

        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (_, Failed(_)) => true,
            (Idle, Resolving)
            | (Resolving, Fetching)
            | (Fetching, Storing)
            | (Fetching, Placing)
            | (Storing, Classifying)
            // A file that could not be stored does not stop the others.
            | (Storing, Fetching)
            | (Classifying, Fetching)
            | (Placing, Placing)
            | (Placing, Placed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Failed(reason) => write!(f, "Failed({})", reason),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Tracks the current state and every state visited.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Move to `next`. Returns false and stays put if the move is not allowed.
    pub fn advance(&mut self, next: PipelineState) -> bool {
        if !self.state.can_transition_to(&next) {
            error!("Invalid pipeline transition {} -> {}", self.state, next);
            return false;
        }
        debug!("Pipeline {} -> {}", self.state, next);
        self.history.push(next.clone());
        self.state = next;
        true
    }

    pub fn fail(&mut self, reason: PipelineError) -> bool {
        self.advance(PipelineState::Failed(reason))
    }

    pub fn into_parts(self) -> (PipelineState, Vec<PipelineState>) {
        (self.state, self.history)
    }
}
