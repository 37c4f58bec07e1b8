//! Sample types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use zero_core::{Color, GameResult};

/// Key grouping the samples of one generated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A sample whose game outcome is not known yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSample {
    /// Network input features of the position.
    pub features: Vec<f32>,
    /// Sparse policy target as `(policy index, probability)` pairs.
    pub policy: Vec<(u32, f32)>,
    /// Side to move in the sampled position.
    pub side_to_move: Color,
    /// Ply of the sampled position within its game.
    pub ply: usize,
}

impl PendingSample {
    /// Attaches the value target derived from the final `result`.
    pub fn finish(self, result: GameResult) -> ExportedSample {
        ExportedSample {
            value: result.value_for(self.side_to_move),
            features: self.features,
            policy: self.policy,
            ply: self.ply,
        }
    }
}

/// A complete (state, policy, value) training triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedSample {
    pub features: Vec<f32>,
    pub policy: Vec<(u32, f32)>,
    /// Outcome from the side to move: 1 win, 0 draw, -1 loss.
    pub value: f32,
    pub ply: usize,
}
