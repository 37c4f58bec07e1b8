//! Self-play throughput statistics.

use std::fmt;
use std::time::{Duration, Instant};

/// Snapshot returned by [`ThroughputTracker::report`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputReport {
    pub games: usize,
    pub samples: u64,
    pub games_per_min: f32,
    pub samples_per_min: f32,
    pub elapsed: Duration,
}

impl fmt::Display for ThroughputReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "games: {} | samples: {} | games/min: {:.2} | samples/min: {:.1} | elapsed: {:.1}min",
            self.games,
            self.samples,
            self.games_per_min,
            self.samples_per_min,
            self.elapsed.as_secs_f32() / 60.0
        )
    }
}

/// Counts generated games and samples and derives per-minute rates.
///
/// Rates are running averages over the games reported since the last
/// [`ThroughputTracker::reset`]. The caller decides how often to report.
#[derive(Debug, Clone)]
pub struct ThroughputTracker {
    origin: Instant,
    games: usize,
    samples: u64,
    games_per_min: f32,
    samples_per_min: f32,
}

impl ThroughputTracker {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            games: 0,
            samples: 0,
            games_per_min: 0.0,
            samples_per_min: 0.0,
        }
    }

    /// Zeroes the counters and restarts the clock.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn games(&self) -> usize {
        self.games
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn games_per_min(&self) -> f32 {
        self.games_per_min
    }

    pub fn samples_per_min(&self) -> f32 {
        self.samples_per_min
    }

    /// Time since the last reset.
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Accounts for one finished game that took `elapsed_min` minutes and
    /// produced `samples` samples, and returns the updated rates.
    ///
    /// A non-positive duration counts the game without moving the rates.
    pub fn report(&mut self, elapsed_min: f32, samples: usize) -> ThroughputReport {
        if elapsed_min > 0.0 {
            let n = self.games as f32;
            self.games_per_min = (n * self.games_per_min + 1.0 / elapsed_min) / (n + 1.0);
            self.samples_per_min =
                (n * self.samples_per_min + samples as f32 / elapsed_min) / (n + 1.0);
        }
        self.games += 1;
        self.samples += samples as u64;
        self.snapshot()
    }

    pub fn snapshot(&self) -> ThroughputReport {
        ThroughputReport {
            games: self.games,
            samples: self.samples,
            games_per_min: self.games_per_min,
            samples_per_min: self.samples_per_min,
            elapsed: self.elapsed(),
        }
    }
}

impl Default for ThroughputTracker {
    fn default() -> Self {
        Self::new()
    }
}
