use crate::GameId;
use thiserror::Error;

/// Errors raised while exporting training samples.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Failed to create or write an export file.
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to serialize a chunk.
    #[error("Failed to serialize chunk: {0}")]
    Json(#[from] serde_json::Error),
    /// No samples were queued under this game.
    #[error("Unknown game: {0}")]
    UnknownGame(GameId),
    /// Chunk size and chunk count must both be positive.
    #[error("Invalid export capacity: {number_chunks} chunks of {chunk_size} samples")]
    InvalidCapacity {
        chunk_size: usize,
        number_chunks: usize,
    },
}
