//! Agent contracts: tree search and raw policy.

use crate::{MoveDistribution, PlaySettings, Position, SearchLimits};
use thiserror::Error;

/// An agent failed to produce a move for the current position.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Agent {agent} failed: {message}")]
pub struct AgentError {
    pub agent: String,
    pub message: String,
}

impl AgentError {
    pub fn new(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            message: message.into(),
        }
    }
}

/// What a search returns for one position.
#[derive(Debug, Clone)]
pub struct SearchOutput<M> {
    /// The move selected by the agent under the given play settings.
    pub best_move: M,
    /// Normalized visit distribution over the root moves.
    pub distribution: MoveDistribution<M>,
    /// Value estimate of `best_move` from the side to move, in `[-1, 1]`.
    pub value: f32,
}

/// A tree-search agent guided by a policy/value model.
///
/// The agent may keep a tree or transposition cache between calls of the
/// same game; [`SearchAgent::clear_game_history`] discards it.
pub trait SearchAgent {
    type Position: Position;

    /// Name used in game records and tournament results.
    fn name(&self) -> &str;

    /// Searches `position` within `limits` and selects a move according to `settings`.
    fn search(
        &mut self,
        position: &Self::Position,
        limits: &SearchLimits,
        settings: &PlaySettings,
    ) -> Result<SearchOutput<<Self::Position as Position>::Move>, AgentError>;

    /// Forgets everything retained from the current game.
    fn clear_game_history(&mut self);
}

/// Raw network policy without search.
pub trait PolicyAgent {
    type Position: Position;

    fn name(&self) -> &str;

    /// Prior move distribution for `position`.
    fn policy(
        &mut self,
        position: &Self::Position,
    ) -> Result<MoveDistribution<<Self::Position as Position>::Move>, AgentError>;
}
