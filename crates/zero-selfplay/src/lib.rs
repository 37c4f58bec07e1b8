//! Self-play and arena orchestration.
//!
//! [`SelfPlay`] sequences calls between a raw policy agent, a search agent,
//! a rules engine and a [`TrainingExporter`](zero_export::TrainingExporter):
//! - [`SelfPlay::go`] generates training games and exports their samples
//! - [`SelfPlay::go_until_file_full`] keeps playing until the export file is full
//! - [`SelfPlay::go_arena`] plays a contender against the current agent and
//!   returns a [`TournamentResult`]
//!
//! Every game is appended to a PGN log and followed by a clean-up that leaves
//! the agents and states manager ready for the next game.

mod arena;
mod config;
mod error;
mod game;
mod opening;
mod pgn;
mod record;
mod selfplay;
mod stats;
mod tournament;

#[cfg(test)]
mod testing;

pub use arena::generate_arena_game;
pub use config::{
    ArenaConfig, ConfigError, ExportConfig, OpeningConfig, OutputConfig, SelfPlayConfig,
};
pub use error::{GameError, SelfPlayError};
pub use game::{generate_game, FinishedGame, GameSetup};
pub use opening::{clip_ply, draw_opening_ply, init_starting_pos_from_raw_policy};
pub use pgn::{format_pgn, write_game_to_pgn};
pub use record::GameRecord;
pub use selfplay::{clean_up, SelfPlay, SelfPlaySummary};
pub use stats::{ThroughputReport, ThroughputTracker};
pub use tournament::{ArenaFailure, ColorSchedule, TournamentResult};
