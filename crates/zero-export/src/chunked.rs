//! File-backed exporter that batches samples into fixed-size chunks.
//!
//! Each output file holds at most `number_chunks * chunk_size` samples and is
//! written as JSON lines, one chunk per line:
//!
//! ```json
//! {"chunk":0,"samples":[{"features":[...],"policy":[[12,0.8]],"value":1.0,"ply":0}]}
//! ```
//!
//! Files are named `{file_stem}_{index:04}.jsonl` inside the export
//! directory. A file is opened when its first sample is written.

use crate::{ExportError, ExportedSample, GameId, PendingSample, TrainingExporter};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zero_core::GameResult;

#[derive(Serialize)]
struct ChunkJson<'a> {
    chunk: usize,
    samples: &'a [ExportedSample],
}

/// Chunked JSON-lines exporter.
///
/// # Example
///
/// ```no_run
/// use zero_export::{ChunkedExporter, GameId, PendingSample, TrainingExporter};
/// use zero_core::{Color, GameResult};
///
/// let mut exporter = ChunkedExporter::new("data", "selfplay", 128, 64)?;
/// let game = GameId::new();
/// exporter.export_sample(game, PendingSample {
///     features: vec![0.0; 8],
///     policy: vec![(0, 1.0)],
///     side_to_move: Color::White,
///     ply: 0,
/// })?;
/// exporter.finalize_game(game, GameResult::WhiteWins)?;
/// exporter.flush()?;
/// # Ok::<(), zero_export::ExportError>(())
/// ```
pub struct ChunkedExporter {
    directory: PathBuf,
    file_stem: String,
    chunk_size: usize,
    number_chunks: usize,
    pending: HashMap<GameId, Vec<PendingSample>>,
    chunk: Vec<ExportedSample>,
    writer: Option<BufWriter<File>>,
    file_index: usize,
    chunks_in_file: usize,
    samples_in_file: usize,
    games_in_file: usize,
    total_samples: u64,
}

impl ChunkedExporter {
    /// Creates an exporter writing into `directory`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidCapacity`] if `chunk_size` or
    /// `number_chunks` is zero, or [`ExportError::Io`] if the directory
    /// cannot be created.
    pub fn new(
        directory: impl Into<PathBuf>,
        file_stem: impl Into<String>,
        chunk_size: usize,
        number_chunks: usize,
    ) -> Result<Self, ExportError> {
        if chunk_size == 0 || number_chunks == 0 {
            return Err(ExportError::InvalidCapacity {
                chunk_size,
                number_chunks,
            });
        }
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            file_stem: file_stem.into(),
            chunk_size,
            number_chunks,
            pending: HashMap::new(),
            chunk: Vec::with_capacity(chunk_size),
            writer: None,
            file_index: 0,
            chunks_in_file: 0,
            samples_in_file: 0,
            games_in_file: 0,
            total_samples: 0,
        })
    }

    /// Maximum number of samples in one output file.
    pub fn file_capacity(&self) -> usize {
        self.chunk_size * self.number_chunks
    }

    /// Index of the file currently being written.
    pub fn file_index(&self) -> usize {
        self.file_index
    }

    /// Path of the file with the given index.
    pub fn file_path(&self, index: usize) -> PathBuf {
        self.directory
            .join(format!("{}_{:04}.jsonl", self.file_stem, index))
    }

    /// Path of the file currently being written.
    pub fn current_file_path(&self) -> PathBuf {
        self.file_path(self.file_index)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Samples queued for games that have not been finalized.
    pub fn pending_samples(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    fn write_sample(&mut self, sample: ExportedSample) -> Result<(), ExportError> {
        if self.is_file_full() {
            self.roll_over()?;
        }
        self.chunk.push(sample);
        self.samples_in_file += 1;
        self.total_samples += 1;
        if self.chunk.len() == self.chunk_size {
            self.write_chunk()?;
        }
        Ok(())
    }

    fn write_chunk(&mut self) -> Result<(), ExportError> {
        if self.chunk.is_empty() {
            return Ok(());
        }
        if self.writer.is_none() {
            let path = self.current_file_path();
            tracing::debug!("Opening export file {:?}", path);
            self.writer = Some(BufWriter::new(File::create(path)?));
        }
        let line = ChunkJson {
            chunk: self.chunks_in_file,
            samples: &self.chunk,
        };
        if let Some(writer) = self.writer.as_mut() {
            serde_json::to_writer(&mut *writer, &line)?;
            writer.write_all(b"\n")?;
        }
        self.chunks_in_file += 1;
        self.chunk.clear();
        Ok(())
    }

    fn roll_over(&mut self) -> Result<(), ExportError> {
        self.write_chunk()?;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        tracing::info!(
            "Export file {:?} complete: {} samples, {} games",
            self.current_file_path(),
            self.samples_in_file,
            self.games_in_file
        );
        self.file_index += 1;
        self.chunks_in_file = 0;
        self.samples_in_file = 0;
        self.games_in_file = 0;
        Ok(())
    }
}

impl TrainingExporter for ChunkedExporter {
    fn export_sample(&mut self, game: GameId, sample: PendingSample) -> Result<(), ExportError> {
        self.pending.entry(game).or_default().push(sample);
        Ok(())
    }

    fn finalize_game(&mut self, game: GameId, result: GameResult) -> Result<usize, ExportError> {
        let samples = self
            .pending
            .remove(&game)
            .ok_or(ExportError::UnknownGame(game))?;
        let count = samples.len();
        for sample in samples {
            self.write_sample(sample.finish(result))?;
        }
        self.games_in_file += 1;
        Ok(count)
    }

    fn discard_game(&mut self, game: GameId) -> usize {
        self.pending.remove(&game).map_or(0, |samples| samples.len())
    }

    fn samples_in_file(&self) -> usize {
        self.samples_in_file
    }

    fn games_in_file(&self) -> usize {
        self.games_in_file
    }

    fn is_file_full(&self) -> bool {
        self.samples_in_file >= self.file_capacity()
    }

    fn total_samples(&self) -> u64 {
        self.total_samples
    }

    fn flush(&mut self) -> Result<(), ExportError> {
        self.write_chunk()?;
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}
