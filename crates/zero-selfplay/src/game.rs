//! Self-play game generation.
//!
//! One call plays a game from its (already sampled) opening position to the
//! end, submitting one training sample per searched ply and back-filling the
//! outcome once it is known.

use crate::error::GameError;
use crate::record::GameRecord;
use zero_core::{
    GameResult, PlaySettings, Position, SearchAgent, SearchLimits, TerminalState, Termination,
};
use zero_export::{GameId, PendingSample, TrainingExporter};

/// Per-game parameters of [`generate_game`].
#[derive(Debug, Clone, Copy)]
pub struct GameSetup<'a> {
    pub limits: &'a SearchLimits,
    pub settings: &'a PlaySettings,
    /// Threshold below which exported visit probabilities are zeroed.
    pub policy_sharpening: f32,
    /// Whether the side to move may resign below the resignation threshold.
    pub allow_resignation: bool,
}

/// Summary of a finished self-play game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishedGame {
    pub outcome: TerminalState,
    /// Total plies, opening included.
    pub plies: usize,
    /// Samples exported for this game.
    pub samples: usize,
}

/// Plays `mv`, records it, and checks whether the game is over.
///
/// A game reaching `settings.max_game_plies` is adjudicated as a draw.
pub(crate) fn apply_move<P: Position>(
    position: &mut P,
    record: &mut GameRecord,
    mv: &P::Move,
    settings: &PlaySettings,
) -> Result<Option<TerminalState>, GameError> {
    position
        .play(mv)
        .map_err(|_| GameError::IllegalMove {
            mv: mv.to_string(),
            ply: record.len(),
        })?;
    record.push_move(mv);
    if let Some(terminal) = position.terminal_state() {
        return Ok(Some(terminal));
    }
    if record.len() >= settings.max_game_plies {
        return Ok(Some(TerminalState::new(
            GameResult::Draw,
            Termination::Adjudication,
        )));
    }
    Ok(None)
}

/// Generates one self-play game starting from `position`.
///
/// On success the outcome is stored in `record` and every sample of the game
/// has been handed to the exporter with its value target. On failure the
/// game's pending samples are discarded and nothing of it is exported.
///
/// # Errors
///
/// [`GameError::Agent`] and [`GameError::IllegalMove`] only invalidate this
/// game. [`GameError::Export`] means samples could not be written.
pub fn generate_game<A, E>(
    agent: &mut A,
    exporter: &mut E,
    position: &mut A::Position,
    record: &mut GameRecord,
    setup: &GameSetup<'_>,
) -> Result<FinishedGame, GameError>
where
    A: SearchAgent,
    E: TrainingExporter,
{
    let game = GameId::new();
    let (outcome, searched) = match play_out(agent, exporter, game, position, record, setup) {
        Ok(played) => played,
        Err(e) => {
            let dropped = exporter.discard_game(game);
            tracing::debug!("Dropped {} pending samples of game {}", dropped, game);
            return Err(e);
        }
    };
    record.set_outcome(outcome);

    // a game that ends without a single search has no pending samples
    let samples = if searched > 0 {
        exporter.finalize_game(game, outcome.result)?
    } else {
        0
    };
    tracing::debug!(
        "Game {} finished: {} by {} after {} plies",
        game,
        outcome.result,
        outcome.termination,
        record.len()
    );
    Ok(FinishedGame {
        outcome,
        plies: record.len(),
        samples,
    })
}

fn play_out<A, E>(
    agent: &mut A,
    exporter: &mut E,
    game: GameId,
    position: &mut A::Position,
    record: &mut GameRecord,
    setup: &GameSetup<'_>,
) -> Result<(TerminalState, usize), GameError>
where
    A: SearchAgent,
    E: TrainingExporter,
{
    if let Some(terminal) = position.terminal_state() {
        return Ok((terminal, 0));
    }
    let mut searched = 0;
    loop {
        let ply = record.len();
        let ply_settings = PlaySettings {
            temperature: setup.settings.temperature_at(ply),
            ..setup.settings.clone()
        };
        let output = agent.search(position, setup.limits, &ply_settings)?;

        let mut distribution = output.distribution;
        distribution.sharpen(setup.policy_sharpening);
        let side_to_move = position.side_to_move();
        exporter.export_sample(
            game,
            PendingSample {
                features: position.features(),
                policy: distribution.map_moves(|mv| position.policy_index(mv) as u32),
                side_to_move,
                ply,
            },
        )?;
        searched += 1;

        if setup.allow_resignation {
            if let Some(threshold) = setup.settings.resign_threshold {
                if output.value < threshold {
                    let resigned = TerminalState::new(
                        GameResult::win_for(side_to_move.opposite()),
                        Termination::Resignation,
                    );
                    return Ok((resigned, searched));
                }
            }
        }

        if let Some(terminal) = apply_move(position, record, &output.best_move, setup.settings)? {
            return Ok((terminal, searched));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PerfectAgent, Pile, Take};
    use zero_core::{Color, Variant};
    use zero_export::ChunkedExporter;

    fn setup<'a>(
        limits: &'a SearchLimits,
        settings: &'a PlaySettings,
        policy_sharpening: f32,
    ) -> GameSetup<'a> {
        GameSetup {
            limits,
            settings,
            policy_sharpening,
            allow_resignation: false,
        }
    }

    fn read_samples(exporter: &mut ChunkedExporter) -> Vec<serde_json::Value> {
        exporter.flush().unwrap();
        std::fs::read_to_string(exporter.current_file_path())
            .unwrap()
            .lines()
            .flat_map(|line| {
                let chunk: serde_json::Value = serde_json::from_str(line).unwrap();
                chunk["samples"].as_array().unwrap().clone()
            })
            .collect()
    }

    #[test]
    fn test_forced_win_exports_one_sample_per_ply() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = ChunkedExporter::new(dir.path(), "data", 16, 4).unwrap();
        let mut agent = PerfectAgent::new("zero");
        let mut position = Pile::new(4);
        let mut record = GameRecord::new("SelfPlay", Variant::default());
        let limits = SearchLimits::nodes(100);
        let settings = PlaySettings::default();

        let finished = generate_game(
            &mut agent,
            &mut exporter,
            &mut position,
            &mut record,
            &setup(&limits, &settings, 0.0),
        )
        .unwrap();

        // 4 -> 3 -> 2 -> 0: white takes the last counter
        assert_eq!(record.moves(), &["t1", "t1", "t2"]);
        assert_eq!(finished.outcome.result, GameResult::WhiteWins);
        assert_eq!(finished.outcome.termination, Termination::Checkmate);
        assert_eq!(finished.samples, 3);
        assert_eq!(finished.plies, 3);
        assert_eq!(record.result(), Some(GameResult::WhiteWins));

        let samples = read_samples(&mut exporter);
        let values: Vec<f64> = samples.iter().map(|s| s["value"].as_f64().unwrap()).collect();
        assert_eq!(values, vec![1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_policy_sharpening_zeroes_noise() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = ChunkedExporter::new(dir.path(), "data", 16, 4).unwrap();
        let mut agent = PerfectAgent::new("zero");
        let mut position = Pile::new(4);
        let mut record = GameRecord::new("SelfPlay", Variant::default());
        let limits = SearchLimits::default();
        let settings = PlaySettings::default();

        generate_game(
            &mut agent,
            &mut exporter,
            &mut position,
            &mut record,
            &setup(&limits, &settings, 0.1),
        )
        .unwrap();

        let samples = read_samples(&mut exporter);
        // first ply: t1 is best with 0.95, t2 got 0.05 from noise
        let policy = samples[0]["policy"].as_array().unwrap();
        assert_eq!(policy[0][0], 0);
        assert_eq!(policy[0][1], 1.0);
        assert_eq!(policy[1][1], 0.0);
    }

    #[test]
    fn test_agent_failure_discards_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = ChunkedExporter::new(dir.path(), "data", 16, 4).unwrap();
        let mut agent = PerfectAgent::new("zero");
        agent.fail_on_call = Some(2);
        let mut position = Pile::new(4);
        let mut record = GameRecord::new("SelfPlay", Variant::default());
        let limits = SearchLimits::default();
        let settings = PlaySettings::default();

        let err = generate_game(
            &mut agent,
            &mut exporter,
            &mut position,
            &mut record,
            &setup(&limits, &settings, 0.0),
        )
        .unwrap_err();

        assert!(matches!(err, GameError::Agent(_)));
        assert_eq!(exporter.pending_samples(), 0);
        assert_eq!(exporter.total_samples(), 0);
        assert_eq!(record.result(), None);
    }

    #[test]
    fn test_resignation_ends_game_for_side_to_move() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = ChunkedExporter::new(dir.path(), "data", 16, 4).unwrap();
        let mut agent = PerfectAgent::new("zero");
        agent.value = -0.99;
        let mut position = Pile::new(10);
        let mut record = GameRecord::new("SelfPlay", Variant::default());
        let limits = SearchLimits::default();
        let settings = PlaySettings {
            resign_threshold: Some(-0.9),
            ..PlaySettings::default()
        };
        let mut game_setup = setup(&limits, &settings, 0.0);
        game_setup.allow_resignation = true;

        let finished = generate_game(
            &mut agent,
            &mut exporter,
            &mut position,
            &mut record,
            &game_setup,
        )
        .unwrap();

        assert_eq!(finished.outcome.termination, Termination::Resignation);
        assert_eq!(finished.outcome.result, GameResult::win_for(Color::Black));
        assert_eq!(finished.samples, 1);
        assert!(record.is_empty());
    }

    #[test]
    fn test_ply_limit_adjudicates_draw() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = ChunkedExporter::new(dir.path(), "data", 16, 4).unwrap();
        let mut agent = PerfectAgent::new("zero");
        let mut position = Pile::new(60);
        let mut record = GameRecord::new("SelfPlay", Variant::default());
        let limits = SearchLimits::default();
        let settings = PlaySettings {
            max_game_plies: 5,
            ..PlaySettings::default()
        };

        let finished = generate_game(
            &mut agent,
            &mut exporter,
            &mut position,
            &mut record,
            &setup(&limits, &settings, 0.0),
        )
        .unwrap();

        assert_eq!(
            finished.outcome,
            TerminalState::new(GameResult::Draw, Termination::Adjudication)
        );
        assert_eq!(record.len(), 5);
        assert_eq!(finished.samples, 5);
    }

    #[test]
    fn test_apply_move_rejects_illegal_move() {
        let mut position = Pile::new(1);
        let mut record = GameRecord::new("SelfPlay", Variant::default());
        let err = apply_move(&mut position, &mut record, &Take(2), &PlaySettings::default())
            .unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { ply: 0, .. }));
        assert!(record.is_empty());
        assert_eq!(position, Pile::new(1));
    }
}
