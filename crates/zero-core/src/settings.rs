//! Search limits and play settings.
//!
//! Both are plain configuration values handed through to the search agent.

use serde::{Deserialize, Serialize};

/// Per-move search budget.
///
/// Unset limits are left to the agent's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Time budget per move in milliseconds.
    #[serde(default)]
    pub movetime_ms: Option<u64>,
    /// Node (simulation) budget per move.
    #[serde(default)]
    pub nodes: Option<u64>,
    /// Maximum search depth.
    #[serde(default)]
    pub depth: Option<u32>,
}

impl SearchLimits {
    pub fn nodes(nodes: u64) -> Self {
        Self {
            nodes: Some(nodes),
            ..Self::default()
        }
    }

    pub fn movetime(ms: u64) -> Self {
        Self {
            movetime_ms: Some(ms),
            ..Self::default()
        }
    }
}

/// Move-selection and game-termination settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaySettings {
    /// Temperature applied to the visit distribution when selecting a move.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Number of plies after which the temperature drops to zero.
    #[serde(default = "default_temperature_moves")]
    pub temperature_moves: usize,
    /// Dirichlet noise concentration at the root.
    #[serde(default = "default_dirichlet_alpha")]
    pub dirichlet_alpha: f32,
    /// Weight of the Dirichlet noise at the root; zero disables noise.
    #[serde(default = "default_dirichlet_epsilon")]
    pub dirichlet_epsilon: f32,
    /// Value below which the side to move resigns. `None` disables resignation.
    #[serde(default)]
    pub resign_threshold: Option<f32>,
    /// Probability that resignation is enabled for a generated game.
    #[serde(default = "default_resign_probability")]
    pub resign_probability: f32,
    /// Games reaching this many plies are adjudicated as a draw.
    #[serde(default = "default_max_game_plies")]
    pub max_game_plies: usize,
}

fn default_temperature() -> f32 {
    1.0
}

fn default_temperature_moves() -> usize {
    15
}

fn default_dirichlet_alpha() -> f32 {
    0.2
}

fn default_dirichlet_epsilon() -> f32 {
    0.25
}

fn default_resign_probability() -> f32 {
    0.9
}

fn default_max_game_plies() -> usize {
    512
}

impl Default for PlaySettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            temperature_moves: default_temperature_moves(),
            dirichlet_alpha: default_dirichlet_alpha(),
            dirichlet_epsilon: default_dirichlet_epsilon(),
            resign_threshold: None,
            resign_probability: default_resign_probability(),
            max_game_plies: default_max_game_plies(),
        }
    }
}

impl PlaySettings {
    /// Greedy settings for strength comparison: no temperature, no noise,
    /// no resignation. The ply limit is kept.
    pub fn competitive(&self) -> Self {
        Self {
            temperature: 0.0,
            temperature_moves: 0,
            dirichlet_epsilon: 0.0,
            resign_threshold: None,
            resign_probability: 0.0,
            ..self.clone()
        }
    }

    /// Temperature to use at `ply`.
    pub fn temperature_at(&self, ply: usize) -> f32 {
        if ply < self.temperature_moves {
            self.temperature
        } else {
            0.0
        }
    }
}
