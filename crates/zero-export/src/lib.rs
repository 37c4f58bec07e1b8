//! Training-data export for self-play.
//!
//! Samples are written in two phases. While a game is running, each searched
//! ply is submitted as a [`PendingSample`] under the game's [`GameId`]. Once
//! the outcome is known, [`TrainingExporter::finalize_game`] converts the
//! pending samples into [`ExportedSample`]s with their value target and hands
//! them to the chunk writer. Failed games are dropped with
//! [`TrainingExporter::discard_game`] and never reach disk.

mod chunked;
mod error;
mod sample;

pub use chunked::ChunkedExporter;
pub use error::ExportError;
pub use sample::{ExportedSample, GameId, PendingSample};

use zero_core::GameResult;

/// Sink for self-play training samples.
pub trait TrainingExporter {
    /// Queues a sample whose value target is not known yet.
    fn export_sample(&mut self, game: GameId, sample: PendingSample) -> Result<(), ExportError>;

    /// Supplies the outcome for every sample queued under `game` and writes
    /// them out. Returns the number of samples written.
    fn finalize_game(&mut self, game: GameId, result: GameResult) -> Result<usize, ExportError>;

    /// Drops the samples queued under `game`. Returns how many were dropped.
    fn discard_game(&mut self, game: GameId) -> usize;

    /// Samples written to the current output file.
    fn samples_in_file(&self) -> usize;

    /// Games whose last sample went to the current output file.
    fn games_in_file(&self) -> usize;

    /// Whether the current output file has reached its capacity. The next
    /// written sample opens a new file.
    fn is_file_full(&self) -> bool;

    /// Samples written over the lifetime of the exporter.
    fn total_samples(&self) -> u64;

    /// Writes any partially filled chunk.
    fn flush(&mut self) -> Result<(), ExportError>;
}
