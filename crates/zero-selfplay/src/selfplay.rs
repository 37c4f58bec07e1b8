//! Self-play and arena orchestration.
//!
//! [`SelfPlay`] owns the agents, the exporter and the single [`GameRecord`]
//! reused for every game. Games run strictly one after another; a caller
//! that wants to stop early does so between `go` calls.

use crate::arena::generate_arena_game;
use crate::config::{ConfigError, OpeningConfig, OutputConfig, SelfPlayConfig};
use crate::error::{GameError, SelfPlayError};
use crate::game::{generate_game, FinishedGame, GameSetup};
use crate::opening::{draw_opening_ply, init_starting_pos_from_raw_policy};
use crate::pgn::write_game_to_pgn;
use crate::record::GameRecord;
use crate::stats::ThroughputTracker;
use crate::tournament::{ColorSchedule, TournamentResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use zero_core::{Color, PlaySettings, PolicyAgent, SearchAgent, SearchLimits, StatesManager, Variant};
use zero_export::TrainingExporter;

/// Counts of a finished self-play batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfPlaySummary {
    /// Games played to the end and exported.
    pub completed: usize,
    /// Games dropped after an agent failure or illegal move.
    pub discarded: usize,
    /// Samples exported by the completed games.
    pub samples: u64,
}

impl SelfPlaySummary {
    fn add(&mut self, finished: Option<FinishedGame>) {
        match finished {
            Some(finished) => {
                self.completed += 1;
                self.samples += finished.samples as u64;
            }
            None => self.discarded += 1,
        }
    }
}

/// Applies the clean-up after a game: drops the position, clears the
/// active states, clears the agent's game history and resets the record.
pub fn clean_up<A, S>(record: &mut GameRecord, agent: &mut A, states: &mut S, position: A::Position)
where
    A: SearchAgent,
    S: StatesManager,
{
    drop(position);
    states.clear_active();
    agent.clear_game_history();
    record.new_game();
}

/// Self-play game generator and arena runner.
///
/// # Example
///
/// ```ignore
/// let config = SelfPlayConfig::load("selfplay.toml")?;
/// let exporter = config.export.open_exporter()?;
/// let mut selfplay = SelfPlay::new(raw_agent, mcts_agent, exporter, &config)?;
///
/// let summary = selfplay.go(100, &config.search, &mut states, config.policy_sharpening)?;
/// let result = selfplay.go_arena(
///     &mut contender,
///     config.arena.games,
///     &config.search,
///     &mut states,
///     config.arena.color_schedule(),
/// )?;
/// println!("{}", result);
/// ```
pub struct SelfPlay<A, R, E>
where
    A: SearchAgent,
    R: PolicyAgent<Position = A::Position>,
    E: TrainingExporter,
{
    raw_agent: R,
    search_agent: A,
    exporter: E,
    settings: PlaySettings,
    variant: Variant,
    openings: OpeningConfig,
    output: OutputConfig,
    max_consecutive_failures: usize,
    record: GameRecord,
    tracker: ThroughputTracker,
    rng: StdRng,
}

impl<A, R, E> SelfPlay<A, R, E>
where
    A: SearchAgent,
    R: PolicyAgent<Position = A::Position>,
    E: TrainingExporter,
{
    /// Creates a self-play runner from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration is out of range.
    pub fn new(
        raw_agent: R,
        search_agent: A,
        exporter: E,
        config: &SelfPlayConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            raw_agent,
            search_agent,
            exporter,
            settings: config.play.clone(),
            variant: config.variant.clone(),
            openings: config.openings.clone(),
            output: config.output.clone(),
            max_consecutive_failures: config.max_consecutive_failures,
            record: GameRecord::new("SelfPlay", config.variant.clone()),
            tracker: ThroughputTracker::new(),
            rng,
        })
    }

    /// Replaces the random source used for openings and resignation.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn search_agent(&self) -> &A {
        &self.search_agent
    }

    pub fn raw_agent(&self) -> &R {
        &self.raw_agent
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    pub fn exporter_mut(&mut self) -> &mut E {
        &mut self.exporter
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn tracker(&self) -> &ThroughputTracker {
        &self.tracker
    }

    /// Generates `number_of_games` self-play games.
    ///
    /// Each game samples an opening, is played out and exported, appended to
    /// the self-play PGN log and cleaned up. Games failing in an agent are
    /// discarded and the batch continues. Afterwards the exporter is flushed
    /// and the number of games in the current export file is written to the
    /// generated-games file.
    ///
    /// # Errors
    ///
    /// Returns [`SelfPlayError::Config`] for zero games or a sharpening
    /// threshold outside `[0, 1)`, and [`SelfPlayError::Io`] or
    /// [`SelfPlayError::Export`] as soon as a game log or sample cannot be
    /// written.
    pub fn go<S>(
        &mut self,
        number_of_games: usize,
        limits: &SearchLimits,
        states: &mut S,
        policy_sharpening: f32,
    ) -> Result<SelfPlaySummary, SelfPlayError>
    where
        S: StatesManager<Position = A::Position>,
    {
        if number_of_games == 0 {
            return Err(ConfigError::Invalid("number of games must be positive".into()).into());
        }
        self.start_batch(policy_sharpening)?;

        let mut summary = SelfPlaySummary::default();
        for _ in 0..number_of_games {
            let finished = self.generate_one(limits, states, policy_sharpening)?;
            summary.add(finished);
        }
        let games = self.exporter.games_in_file();
        self.finish_batch(&summary, games)?;
        Ok(summary)
    }

    /// Generates games until the current export file is full.
    ///
    /// If the file is already full when called, the next file is filled.
    /// The run also ends once a game spills over into a new file. The
    /// generated-games file then holds the count of the file that was
    /// filled, not of the one the last game ended in.
    ///
    /// # Errors
    ///
    /// As [`SelfPlay::go`], plus [`SelfPlayError::TooManyFailures`] when the
    /// configured number of consecutive games export no samples.
    pub fn go_until_file_full<S>(
        &mut self,
        limits: &SearchLimits,
        states: &mut S,
        policy_sharpening: f32,
    ) -> Result<SelfPlaySummary, SelfPlayError>
    where
        S: StatesManager<Position = A::Position>,
    {
        self.start_batch(policy_sharpening)?;

        let mut summary = SelfPlaySummary::default();
        let mut idle_games = 0;
        let filled_games = loop {
            let was_full = self.exporter.is_file_full();
            let samples_before = self.exporter.samples_in_file();
            let games_before = self.exporter.games_in_file();
            let finished = self.generate_one(limits, states, policy_sharpening)?;
            // games without samples never fill the file
            if finished.is_some_and(|f| f.samples > 0) {
                idle_games = 0;
            } else {
                idle_games += 1;
                if idle_games >= self.max_consecutive_failures {
                    return Err(SelfPlayError::TooManyFailures(idle_games));
                }
            }
            summary.add(finished);

            if !was_full && self.exporter.samples_in_file() < samples_before {
                tracing::debug!("Game spilled over into the next export file");
                break games_before;
            }
            if self.exporter.is_file_full() {
                break self.exporter.games_in_file();
            }
        };
        self.finish_batch(&summary, filled_games)?;
        Ok(summary)
    }

    /// Plays `number_of_games` arena games between the current search agent
    /// and `contender`, with colors assigned by `schedule`.
    ///
    /// Both agents use competitive play settings and no samples are
    /// exported. Every game is appended to the arena PGN log. A game that
    /// fails in an agent is recorded in [`TournamentResult::failures`] and
    /// the series continues.
    ///
    /// # Errors
    ///
    /// Returns [`SelfPlayError::Config`] for zero games and
    /// [`SelfPlayError::Io`] if the arena log cannot be written.
    pub fn go_arena<S>(
        &mut self,
        contender: &mut A,
        number_of_games: usize,
        limits: &SearchLimits,
        states: &mut S,
        schedule: ColorSchedule,
    ) -> Result<TournamentResult, SelfPlayError>
    where
        S: StatesManager<Position = A::Position>,
    {
        if number_of_games == 0 {
            return Err(ConfigError::Invalid("number of games must be positive".into()).into());
        }
        let settings = self.settings.competitive();
        let mut tournament = TournamentResult::new(contender.name(), self.search_agent.name());
        self.record.event = "Arena".to_string();

        for game in 0..number_of_games {
            let contender_color = schedule.contender_color(game);
            match contender_color {
                Color::White => self
                    .record
                    .set_players(contender.name(), self.search_agent.name()),
                Color::Black => self
                    .record
                    .set_players(self.search_agent.name(), contender.name()),
            }

            let plys = draw_opening_ply(
                self.openings.mean_init_ply,
                self.openings.max_init_ply,
                &mut self.rng,
            );
            let mut position = init_starting_pos_from_raw_policy(
                &mut self.raw_agent,
                plys,
                &mut self.record,
                &self.variant,
                states,
                &mut self.rng,
            );

            let (white, black) = match contender_color {
                Color::White => (&mut *contender, &mut self.search_agent),
                Color::Black => (&mut self.search_agent, &mut *contender),
            };
            let logged = match generate_arena_game(
                white,
                black,
                &mut position,
                &mut self.record,
                limits,
                &settings,
            ) {
                Ok(outcome) => {
                    tournament.record(outcome.result, contender_color);
                    tracing::info!(
                        "Arena game {}: {} ({}, contender {})",
                        game + 1,
                        outcome.result,
                        outcome.termination,
                        contender_color
                    );
                    write_game_to_pgn(&self.output.arena_pgn, &self.record, self.output.verbose)
                }
                Err(e) => {
                    tracing::warn!("Arena game {} failed: {}", game + 1, e);
                    tournament.record_failure(game, &e);
                    Ok(())
                }
            };

            clean_up(&mut self.record, &mut self.search_agent, states, position);
            contender.clear_game_history();
            logged?;
        }

        tracing::info!("Arena finished: {}", tournament);
        Ok(tournament)
    }

    fn start_batch(&mut self, policy_sharpening: f32) -> Result<(), SelfPlayError> {
        if !(0.0..1.0).contains(&policy_sharpening) {
            return Err(ConfigError::Invalid(format!(
                "policy sharpening {} outside [0, 1)",
                policy_sharpening
            ))
            .into());
        }
        self.record.event = "SelfPlay".to_string();
        self.tracker.reset();
        Ok(())
    }

    fn finish_batch(
        &mut self,
        summary: &SelfPlaySummary,
        games_in_file: usize,
    ) -> Result<(), SelfPlayError> {
        self.exporter.flush()?;
        self.export_number_generated_games(games_in_file)?;
        tracing::info!(
            "Self-play batch finished: {} games, {} discarded, {} samples",
            summary.completed,
            summary.discarded,
            summary.samples
        );
        Ok(())
    }

    /// Plays one game. `Ok(None)` means the game was discarded.
    fn generate_one<S>(
        &mut self,
        limits: &SearchLimits,
        states: &mut S,
        policy_sharpening: f32,
    ) -> Result<Option<FinishedGame>, SelfPlayError>
    where
        S: StatesManager<Position = A::Position>,
    {
        let start = Instant::now();
        let name = self.search_agent.name().to_string();
        self.record.set_players(name.clone(), name);

        let plys = draw_opening_ply(
            self.openings.mean_init_ply,
            self.openings.max_init_ply,
            &mut self.rng,
        );
        let mut position = init_starting_pos_from_raw_policy(
            &mut self.raw_agent,
            plys,
            &mut self.record,
            &self.variant,
            states,
            &mut self.rng,
        );
        let allow_resignation = self.settings.resign_threshold.is_some()
            && self.rng.gen::<f32>() < self.settings.resign_probability;
        let setup = GameSetup {
            limits,
            settings: &self.settings,
            policy_sharpening,
            allow_resignation,
        };

        let outcome = match generate_game(
            &mut self.search_agent,
            &mut self.exporter,
            &mut position,
            &mut self.record,
            &setup,
        ) {
            Ok(finished) => {
                write_game_to_pgn(&self.output.selfplay_pgn, &self.record, self.output.verbose)
                    .map(|()| Some(finished))
                    .map_err(SelfPlayError::from)
            }
            Err(GameError::Export(e)) => Err(e.into()),
            Err(e) => {
                tracing::warn!("Discarding self-play game {}: {}", self.record.round(), e);
                Ok(None)
            }
        };

        clean_up(&mut self.record, &mut self.search_agent, states, position);
        let finished = outcome?;

        if let Some(finished) = &finished {
            let elapsed_min = start.elapsed().as_secs_f32() / 60.0;
            let report = self.tracker.report(elapsed_min, finished.samples);
            if report.games % self.output.report_interval == 0 {
                tracing::info!("{}", report);
            } else {
                tracing::debug!("{}", report);
            }
        }
        Ok(finished)
    }

    /// Writes the number of games of an export file.
    fn export_number_generated_games(&self, games: usize) -> std::io::Result<()> {
        let path = &self.output.game_count;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, format!("{}\n", games))
    }
}
