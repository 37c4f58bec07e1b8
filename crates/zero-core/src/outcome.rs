//! Game outcomes and the reasons a game ended.

use crate::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// White won the game.
    WhiteWins,
    /// Black won the game.
    BlackWins,
    /// The game ended in a draw.
    Draw,
}

impl GameResult {
    /// Returns the result in which `color` is the winner.
    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }

    /// Returns the winning color, or `None` for a draw.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw => None,
        }
    }

    /// Value target for the side `perspective`: 1 for a win, -1 for a loss, 0 for a draw.
    pub fn value_for(self, perspective: Color) -> f32 {
        match self.winner() {
            Some(winner) if winner == perspective => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        }
    }

    /// PGN result string (`1-0`, `0-1` or `1/2-1/2`).
    pub const fn pgn(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pgn())
    }
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    Checkmate,
    Stalemate,
    Repetition,
    /// Draw by a move-count rule such as the fifty-move rule.
    MoveRule,
    InsufficientMaterial,
    /// A variant-specific ending (e.g. king of the hill, three checks).
    VariantEnd,
    /// The side to move resigned.
    Resignation,
    /// The game hit the configured ply limit and was scored as a draw.
    Adjudication,
}

impl Termination {
    /// Value for the PGN `Termination` tag.
    pub const fn pgn_tag(self) -> &'static str {
        match self {
            Termination::Resignation => "resignation",
            Termination::Adjudication => "adjudication",
            _ => "normal",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Termination::Checkmate => "checkmate",
            Termination::Stalemate => "stalemate",
            Termination::Repetition => "repetition",
            Termination::MoveRule => "move rule",
            Termination::InsufficientMaterial => "insufficient material",
            Termination::VariantEnd => "variant end",
            Termination::Resignation => "resignation",
            Termination::Adjudication => "adjudication",
        };
        f.write_str(s)
    }
}

/// A terminal position's result together with the reason it is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalState {
    pub result: GameResult,
    pub termination: Termination,
}

impl TerminalState {
    pub const fn new(result: GameResult, termination: Termination) -> Self {
        Self {
            result,
            termination,
        }
    }
}
