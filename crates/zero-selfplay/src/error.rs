//! Error types for game generation and the orchestration loops.

use crate::config::ConfigError;
use thiserror::Error;
use zero_core::AgentError;
use zero_export::ExportError;

/// Failures that end the current game.
///
/// `Agent` and `IllegalMove` discard the game and the batch continues;
/// `Export` means training data could not be written and stops the batch.
#[derive(Error, Debug)]
pub enum GameError {
    /// The search agent failed to produce a move.
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),
    /// The search agent selected a move the rules engine rejected.
    #[error("Illegal move {mv} at ply {ply}")]
    IllegalMove { mv: String, ply: usize },
    /// Writing exported samples failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Failures that stop a self-play or arena batch.
#[derive(Error, Debug)]
pub enum SelfPlayError {
    /// The batch was rejected before any game started.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Writing a game log or the generated-games file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Writing training data failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    /// The recent games were all discarded or ended without a searched ply.
    #[error("{0} consecutive games exported no samples")]
    TooManyFailures(usize),
}
