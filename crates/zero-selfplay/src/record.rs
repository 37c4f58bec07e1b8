//! The record of the game currently being played.

use std::fmt::Display;
use zero_core::{GameResult, TerminalState, Termination, Variant};

/// Moves, result and metadata of one game.
///
/// A single record is reused across the games of a batch:
/// [`GameRecord::new_game`] clears the moves and result and advances the
/// round counter.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub event: String,
    pub site: String,
    pub variant: Variant,
    pub white: String,
    pub black: String,
    round: usize,
    moves: Vec<String>,
    outcome: Option<TerminalState>,
}

impl GameRecord {
    /// Creates an empty record for round 1.
    pub fn new(event: impl Into<String>, variant: Variant) -> Self {
        Self {
            event: event.into(),
            site: "local".to_string(),
            variant,
            white: "?".to_string(),
            black: "?".to_string(),
            round: 1,
            moves: Vec::new(),
            outcome: None,
        }
    }

    pub fn set_players(&mut self, white: impl Into<String>, black: impl Into<String>) {
        self.white = white.into();
        self.black = black.into();
    }

    /// Appends a move in the rules engine's notation.
    pub fn push_move(&mut self, mv: &impl Display) {
        self.moves.push(mv.to_string());
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    /// Number of plies played.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn round(&self) -> usize {
        self.round
    }

    /// Finalizes the game. Later calls overwrite the outcome.
    pub fn set_outcome(&mut self, outcome: TerminalState) {
        self.outcome = Some(outcome);
    }

    /// `None` while the game is unterminated.
    pub fn result(&self) -> Option<GameResult> {
        self.outcome.map(|o| o.result)
    }

    pub fn termination(&self) -> Option<Termination> {
        self.outcome.map(|o| o.termination)
    }

    /// PGN result token; `*` for an unterminated game.
    pub fn result_str(&self) -> &'static str {
        self.result().map_or("*", GameResult::pgn)
    }

    /// Resets the record for the next game of the batch.
    pub fn new_game(&mut self) {
        self.moves.clear();
        self.outcome = None;
        self.round += 1;
    }
}
