//! Arena series scoring.

use serde::{Deserialize, Serialize};
use std::fmt;
use zero_core::{Color, GameResult};

/// Which color the contender plays in each game of an arena series.
///
/// The contender plays `contender_first` in even-numbered games (counting
/// from zero) and the opposite color in odd-numbered games, so neither agent
/// has the same color twice in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSchedule {
    pub contender_first: Color,
}

impl ColorSchedule {
    pub const fn new(contender_first: Color) -> Self {
        Self { contender_first }
    }

    /// Contender's color in game `game_index`.
    pub const fn contender_color(&self, game_index: usize) -> Color {
        if game_index % 2 == 0 {
            self.contender_first
        } else {
            self.contender_first.opposite()
        }
    }
}

impl Default for ColorSchedule {
    fn default() -> Self {
        Self::new(Color::White)
    }
}

/// A game of the series that produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaFailure {
    pub game: usize,
    pub error: String,
}

/// Win/draw/loss tally of an arena series, from the contender's side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentResult {
    /// The contender.
    pub player_a: String,
    /// The reference agent.
    pub player_b: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Games that failed; they do not count towards the tally.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ArenaFailure>,
}

impl TournamentResult {
    pub fn new(contender: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            player_a: contender.into(),
            player_b: reference.into(),
            ..Self::default()
        }
    }

    /// Adds a game in which the contender played `contender_color`.
    pub fn record(&mut self, result: GameResult, contender_color: Color) {
        match result.winner() {
            Some(winner) if winner == contender_color => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
    }

    pub fn record_failure(&mut self, game: usize, error: impl fmt::Display) {
        self.failures.push(ArenaFailure {
            game,
            error: error.to_string(),
        });
    }

    /// Completed games.
    pub fn number_games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// `(wins + 0.5 * draws) / games`, or 0 before any game completed.
    pub fn score(&self) -> f64 {
        let games = self.number_games();
        if games == 0 {
            return 0.0;
        }
        (f64::from(self.wins) + 0.5 * f64::from(self.draws)) / f64::from(games)
    }
}

impl fmt::Display for TournamentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vs {}: W:{} D:{} L:{} score {:.3}",
            self.player_a,
            self.player_b,
            self.wins,
            self.draws,
            self.losses,
            self.score()
        )?;
        if !self.failures.is_empty() {
            write!(f, " ({} failed)", self.failures.len())?;
        }
        Ok(())
    }
}
