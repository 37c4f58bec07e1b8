//! Configuration file loading for self-play and arena runs.
//!
//! Settings are read from a TOML file. Every field has a default, so an empty
//! file (or a missing one) yields a usable configuration.

use crate::tournament::ColorSchedule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zero_core::{Color, PlaySettings, SearchLimits, Variant};
use zero_export::{ChunkedExporter, ExportError};

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Opening randomization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OpeningConfig {
    /// Mean of the exponential distribution the opening length is drawn from.
    /// Defaults to 8.
    #[serde(default = "default_mean_init_ply")]
    pub mean_init_ply: f32,
    /// Longest opening; longer draws are resampled uniformly below it.
    /// Defaults to 30.
    #[serde(default = "default_max_init_ply")]
    pub max_init_ply: usize,
}

fn default_mean_init_ply() -> f32 {
    8.0
}

fn default_max_init_ply() -> usize {
    30
}

impl Default for OpeningConfig {
    fn default() -> Self {
        Self {
            mean_init_ply: default_mean_init_ply(),
            max_init_ply: default_max_init_ply(),
        }
    }
}

/// Training-data export layout.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExportConfig {
    /// Directory receiving the export files. Defaults to `data/export`.
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,
    /// File name prefix. Defaults to `selfplay`.
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
    /// Samples per chunk. Defaults to 128.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Chunks per file. Defaults to 256.
    #[serde(default = "default_number_chunks")]
    pub number_chunks: usize,
}

fn default_export_directory() -> PathBuf {
    PathBuf::from("data/export")
}

fn default_file_stem() -> String {
    "selfplay".to_string()
}

fn default_chunk_size() -> usize {
    128
}

fn default_number_chunks() -> usize {
    256
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            file_stem: default_file_stem(),
            chunk_size: default_chunk_size(),
            number_chunks: default_number_chunks(),
        }
    }
}

impl ExportConfig {
    /// Opens a [`ChunkedExporter`] with this layout.
    pub fn open_exporter(&self) -> Result<ChunkedExporter, ExportError> {
        ChunkedExporter::new(
            &self.directory,
            &self.file_stem,
            self.chunk_size,
            self.number_chunks,
        )
    }
}

/// Game logs and reporting.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// PGN log of self-play games. Defaults to `data/games.pgn`.
    #[serde(default = "default_selfplay_pgn")]
    pub selfplay_pgn: PathBuf,
    /// PGN log of arena games. Defaults to `data/arena_games.pgn`.
    #[serde(default = "default_arena_pgn")]
    pub arena_pgn: PathBuf,
    /// File receiving the number of games in the current export file.
    /// Defaults to `data/generated_games.txt`.
    #[serde(default = "default_game_count")]
    pub game_count: PathBuf,
    /// Echo each finished game to stdout.
    #[serde(default)]
    pub verbose: bool,
    /// Log a throughput report every this many completed games. Defaults to 1.
    #[serde(default = "default_report_interval")]
    pub report_interval: usize,
}

fn default_selfplay_pgn() -> PathBuf {
    PathBuf::from("data/games.pgn")
}

fn default_arena_pgn() -> PathBuf {
    PathBuf::from("data/arena_games.pgn")
}

fn default_game_count() -> PathBuf {
    PathBuf::from("data/generated_games.txt")
}

fn default_report_interval() -> usize {
    1
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            selfplay_pgn: default_selfplay_pgn(),
            arena_pgn: default_arena_pgn(),
            game_count: default_game_count(),
            verbose: false,
            report_interval: default_report_interval(),
        }
    }
}

/// Arena series settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ArenaConfig {
    /// Games per arena series. Defaults to 10.
    #[serde(default = "default_arena_games")]
    pub games: usize,
    /// Color of the contender in the first game. Defaults to white.
    #[serde(default = "default_contender_first_color")]
    pub contender_first_color: Color,
}

fn default_arena_games() -> usize {
    10
}

fn default_contender_first_color() -> Color {
    Color::White
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            games: default_arena_games(),
            contender_first_color: default_contender_first_color(),
        }
    }
}

impl ArenaConfig {
    pub fn color_schedule(&self) -> ColorSchedule {
        ColorSchedule::new(self.contender_first_color)
    }
}

/// Main self-play configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SelfPlayConfig {
    /// Variant to play. Defaults to `chess`.
    #[serde(default)]
    pub variant: Variant,
    /// Seed for opening and resignation sampling; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Threshold below which exported visit probabilities are zeroed.
    #[serde(default)]
    pub policy_sharpening: f32,
    /// Consecutive discarded games after which a fill-the-file run gives up.
    /// Defaults to 16.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: usize,
    #[serde(default)]
    pub search: SearchLimits,
    #[serde(default)]
    pub play: PlaySettings,
    #[serde(default)]
    pub openings: OpeningConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

fn default_max_consecutive_failures() -> usize {
    16
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            seed: None,
            policy_sharpening: 0.0,
            max_consecutive_failures: default_max_consecutive_failures(),
            search: SearchLimits::default(),
            play: PlaySettings::default(),
            openings: OpeningConfig::default(),
            export: ExportConfig::default(),
            output: OutputConfig::default(),
            arena: ArenaConfig::default(),
        }
    }
}

impl SelfPlayConfig {
    /// Loads and validates the configuration at `path`.
    ///
    /// If the file does not exist, the validated default configuration is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it contains invalid TOML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(msg: &str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        }
        if self.export.chunk_size == 0 {
            return invalid("export.chunk_size must be positive");
        }
        if self.export.number_chunks == 0 {
            return invalid("export.number_chunks must be positive");
        }
        if self.openings.mean_init_ply.is_nan() || self.openings.mean_init_ply < 0.0 {
            return invalid("openings.mean_init_ply must not be negative");
        }
        if self.play.temperature.is_nan() || self.play.temperature < 0.0 {
            return invalid("play.temperature must not be negative");
        }
        if !(0.0..=1.0).contains(&self.play.resign_probability) {
            return invalid("play.resign_probability must be within [0, 1]");
        }
        if self.play.max_game_plies == 0 {
            return invalid("play.max_game_plies must be positive");
        }
        if !(0.0..1.0).contains(&self.policy_sharpening) {
            return invalid("policy_sharpening must be within [0, 1)");
        }
        if self.output.report_interval == 0 {
            return invalid("output.report_interval must be positive");
        }
        if self.max_consecutive_failures == 0 {
            return invalid("max_consecutive_failures must be positive");
        }
        Ok(())
    }
}
