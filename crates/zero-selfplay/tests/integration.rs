//! End-to-end self-play and arena runs on a counting game.
//!
//! Players alternately take one or two counters and whoever takes the last
//! counter wins. From a count that is not a multiple of three the side to
//! move wins with perfect play, which gives fixed forced lines.

use std::fmt;
use std::path::Path;
use zero_core::{
    AgentError, Color, GameResult, IllegalMove, MoveDistribution, PlaySettings, PolicyAgent,
    Position, SearchAgent, SearchLimits, SearchOutput, StatesManager, TerminalState, Termination,
    Variant,
};
use zero_export::{ChunkedExporter, TrainingExporter};
use zero_selfplay::{ColorSchedule, SelfPlay, SelfPlayConfig, SelfPlayError};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Take(u32);

impl fmt::Display for Take {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "take{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Countdown {
    remaining: u32,
    side_to_move: Color,
}

impl Countdown {
    fn legal_moves(&self) -> Vec<Take> {
        (1..=self.remaining.min(2)).map(Take).collect()
    }

    fn winning_move(&self) -> Take {
        match self.remaining % 3 {
            0 => Take(1),
            n => Take(n),
        }
    }
}

impl Position for Countdown {
    type Move = Take;

    fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    fn play(&mut self, mv: &Take) -> Result<(), IllegalMove> {
        if mv.0 == 0 || mv.0 > 2 || mv.0 > self.remaining {
            return Err(IllegalMove(mv.to_string()));
        }
        self.remaining -= mv.0;
        self.side_to_move = self.side_to_move.opposite();
        Ok(())
    }

    fn terminal_state(&self) -> Option<TerminalState> {
        (self.remaining == 0).then(|| {
            TerminalState::new(
                GameResult::win_for(self.side_to_move.opposite()),
                Termination::VariantEnd,
            )
        })
    }

    fn features(&self) -> Vec<f32> {
        vec![self.remaining as f32]
    }

    fn policy_index(&self, mv: &Take) -> usize {
        mv.0 as usize - 1
    }
}

struct Counters {
    start: u32,
    active: bool,
}

impl StatesManager for Counters {
    type Position = Countdown;

    fn init_board(&mut self, _variant: &Variant) -> Countdown {
        self.active = true;
        Countdown {
            remaining: self.start,
            side_to_move: Color::White,
        }
    }

    fn clear_active(&mut self) {
        self.active = false;
    }
}

struct RawPolicy;

impl PolicyAgent for RawPolicy {
    type Position = Countdown;

    fn name(&self) -> &str {
        "raw"
    }

    fn policy(&mut self, position: &Countdown) -> Result<MoveDistribution<Take>, AgentError> {
        Ok(position.legal_moves().into_iter().map(|m| (m, 1.0)).collect())
    }
}

struct Solver {
    name: String,
    fail_after: Option<usize>,
    searches: usize,
}

impl Solver {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail_after: None,
            searches: 0,
        }
    }
}

impl SearchAgent for Solver {
    type Position = Countdown;

    fn name(&self) -> &str {
        &self.name
    }

    fn search(
        &mut self,
        position: &Countdown,
        _limits: &SearchLimits,
        _settings: &PlaySettings,
    ) -> Result<SearchOutput<Take>, AgentError> {
        self.searches += 1;
        if self.fail_after.is_some_and(|n| self.searches > n) {
            return Err(AgentError::new(&self.name, "network unavailable"));
        }
        let best = position.winning_move();
        let distribution = position
            .legal_moves()
            .into_iter()
            .map(|m| (m, if m == best { 0.9 } else { 0.1 }))
            .collect();
        Ok(SearchOutput {
            best_move: best,
            distribution,
            value: 1.0,
        })
    }

    fn clear_game_history(&mut self) {}
}

fn test_config(dir: &Path) -> SelfPlayConfig {
    let mut config = SelfPlayConfig::default();
    config.seed = Some(42);
    config.openings.max_init_ply = 0;
    config.export.directory = dir.join("export");
    config.export.chunk_size = 2;
    config.export.number_chunks = 2;
    config.output.selfplay_pgn = dir.join("games.pgn");
    config.output.arena_pgn = dir.join("arena.pgn");
    config.output.game_count = dir.join("generated_games.txt");
    config
}

fn selfplay(config: &SelfPlayConfig, agent: Solver) -> SelfPlay<Solver, RawPolicy, ChunkedExporter> {
    let exporter = config.export.open_exporter().unwrap();
    SelfPlay::new(RawPolicy, agent, exporter, config).unwrap()
}

fn exported_values(path: &Path) -> Vec<f64> {
    let contents = std::fs::read_to_string(path).unwrap();
    contents
        .lines()
        .flat_map(|line| {
            let chunk: serde_json::Value = serde_json::from_str(line).unwrap();
            chunk["samples"]
                .as_array()
                .unwrap()
                .iter()
                .map(|s| s["value"].as_f64().unwrap())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn test_forced_line_exports_one_sample_per_ply() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut runner = selfplay(&config, Solver::new("solver"));
    let mut states = Counters {
        start: 4,
        active: false,
    };

    let summary = runner.go(1, &config.search, &mut states, 0.0).unwrap();

    // 4 -> 3 -> 2 -> 0, white takes the last counters
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.samples, 3);
    assert!(!states.active);

    let pgn = std::fs::read_to_string(&config.output.selfplay_pgn).unwrap();
    assert_eq!(pgn.matches("[Event ").count(), 1);
    assert!(pgn.contains("[Result \"1-0\"]"));
    assert!(pgn.contains("1. take1 take1 2. take2 1-0"));

    let values = exported_values(&runner.exporter().file_path(0));
    assert_eq!(values, vec![1.0, -1.0, 1.0]);
}

#[test]
fn test_generated_games_file_tracks_current_export_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut runner = selfplay(&config, Solver::new("solver"));
    let mut states = Counters {
        start: 4,
        active: false,
    };

    // four samples per file: the second game spills over into file 1
    runner.go(2, &config.search, &mut states, 0.0).unwrap();

    assert_eq!(runner.exporter().file_index(), 1);
    assert_eq!(runner.exporter().samples_in_file(), 2);
    let count = std::fs::read_to_string(&config.output.game_count).unwrap();
    assert_eq!(count.trim(), runner.exporter().games_in_file().to_string());
    assert_eq!(count.trim(), "1");
    assert!(runner.exporter().file_path(1).exists());
}

#[test]
fn test_arena_series_with_alternating_colors() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut runner = selfplay(&config, Solver::new("reference"));
    let mut contender = Solver::new("contender");
    let mut states = Counters {
        start: 5,
        active: false,
    };

    let result = runner
        .go_arena(
            &mut contender,
            4,
            &config.search,
            &mut states,
            ColorSchedule::default(),
        )
        .unwrap();

    assert_eq!(result.wins, 2);
    assert_eq!(result.losses, 2);
    assert_eq!(result.draws, 0);
    assert_eq!(result.number_games(), 4);
    assert!((result.score() - 0.5).abs() < 1e-9);
    assert!(result.failures.is_empty());

    let pgn = std::fs::read_to_string(&config.output.arena_pgn).unwrap();
    let whites: Vec<&str> = pgn
        .lines()
        .filter(|line| line.starts_with("[White "))
        .collect();
    assert_eq!(
        whites,
        vec![
            "[White \"contender\"]",
            "[White \"reference\"]",
            "[White \"contender\"]",
            "[White \"reference\"]",
        ]
    );
}

#[test]
fn test_arena_can_start_contender_as_black() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut runner = selfplay(&config, Solver::new("reference"));
    let mut contender = Solver::new("contender");
    let mut states = Counters {
        start: 5,
        active: false,
    };
    let schedule = ColorSchedule {
        contender_first: Color::Black,
    };

    let result = runner
        .go_arena(&mut contender, 3, &config.search, &mut states, schedule)
        .unwrap();

    assert_eq!((result.wins, result.losses), (1, 2));
}

#[test]
fn test_arena_failure_is_recorded_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut runner = selfplay(&config, Solver::new("reference"));
    let mut contender = Solver::new("contender");
    contender.fail_after = Some(0);
    let mut states = Counters {
        start: 5,
        active: false,
    };

    let result = runner
        .go_arena(
            &mut contender,
            2,
            &config.search,
            &mut states,
            ColorSchedule::default(),
        )
        .unwrap();

    assert_eq!(result.number_games(), 0);
    assert_eq!(result.failures.len(), 2);
    assert_eq!(result.score(), 0.0);
    assert!(!states.active);
}

#[test]
fn test_zero_games_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut runner = selfplay(&config, Solver::new("solver"));
    let mut states = Counters {
        start: 4,
        active: false,
    };

    let err = runner.go(0, &config.search, &mut states, 0.0).unwrap_err();
    assert!(matches!(err, SelfPlayError::Config(_)));
}

#[test]
fn test_openings_never_start_from_a_finished_game() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.openings.mean_init_ply = 50.0;
    config.openings.max_init_ply = 10;
    let mut runner = selfplay(&config, Solver::new("solver"));
    let mut states = Counters {
        start: 3,
        active: false,
    };

    let summary = runner.go(20, &config.search, &mut states, 0.0).unwrap();

    // every game still needs at least one searched ply to finish
    assert_eq!(summary.completed, 20);
    assert!(summary.samples >= 20);
}
