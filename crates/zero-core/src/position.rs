//! Position and position-state lifecycle contracts.

use crate::{Color, TerminalState};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A move was rejected by the rules engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Illegal move: {0}")]
pub struct IllegalMove(pub String);

/// Identifier of the game variant being played (e.g. `chess`, `crazyhouse`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(String);

impl Variant {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::new("chess")
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A mutable game position as provided by the rules engine.
///
/// Implementations carry whatever history they need for repetition and
/// move-rule detection; [`Position::terminal_state`] reports every way the
/// game can end on the board.
pub trait Position: Clone {
    /// Move type. `Display` is used for the game record move text.
    type Move: Clone + PartialEq + fmt::Debug + fmt::Display;

    /// The side to move.
    fn side_to_move(&self) -> Color;

    /// Plays `mv`, or rejects it without changing the position.
    fn play(&mut self, mv: &Self::Move) -> Result<(), IllegalMove>;

    /// `Some` once the position is checkmate, stalemate, drawn by rule or
    /// ended by a variant rule.
    fn terminal_state(&self) -> Option<TerminalState>;

    /// Network input representation of the position.
    fn features(&self) -> Vec<f32>;

    /// Index of `mv` in the policy output of the network.
    fn policy_index(&self, mv: &Self::Move) -> usize;

    fn is_terminal(&self) -> bool {
        self.terminal_state().is_some()
    }
}

/// Creates positions and owns the per-game state history behind them.
///
/// One position is live per running game. [`StatesManager::clear_active`]
/// releases it at the end of the game.
pub trait StatesManager {
    type Position: Position;

    /// Creates the starting position of `variant` and makes it the active state.
    fn init_board(&mut self, variant: &Variant) -> Self::Position;

    /// Drops the states of the active game.
    fn clear_active(&mut self);
}
