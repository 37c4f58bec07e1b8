//! A tiny take-away game and scripted agents for unit tests.
//!
//! Players alternately take one or two counters from a pile; whoever takes
//! the last counter wins. A pile that is a multiple of three is lost for the
//! side to move under best play.

use std::fmt;
use zero_core::{
    AgentError, Color, GameResult, IllegalMove, MoveDistribution, PlaySettings, PolicyAgent,
    Position, SearchAgent, SearchLimits, SearchOutput, StatesManager, TerminalState, Termination,
    Variant,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Take(pub u32);

impl fmt::Display for Take {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pile {
    pub counters: u32,
    pub side_to_move: Color,
}

impl Pile {
    pub fn new(counters: u32) -> Self {
        Self {
            counters,
            side_to_move: Color::White,
        }
    }

    pub fn legal_moves(&self) -> Vec<Take> {
        (1..=2).filter(|n| *n <= self.counters).map(Take).collect()
    }

    /// Move that leaves a multiple of three, or a single counter if none does.
    pub fn best_move(&self) -> Take {
        match self.counters % 3 {
            0 => Take(1),
            n => Take(n),
        }
    }
}

impl Position for Pile {
    type Move = Take;

    fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    fn play(&mut self, mv: &Take) -> Result<(), IllegalMove> {
        if mv.0 == 0 || mv.0 > 2 || mv.0 > self.counters {
            return Err(IllegalMove(mv.to_string()));
        }
        self.counters -= mv.0;
        self.side_to_move = self.side_to_move.opposite();
        Ok(())
    }

    fn terminal_state(&self) -> Option<TerminalState> {
        (self.counters == 0).then(|| {
            TerminalState::new(
                GameResult::win_for(self.side_to_move.opposite()),
                Termination::Checkmate,
            )
        })
    }

    fn features(&self) -> Vec<f32> {
        vec![self.counters as f32, self.side_to_move.index() as f32]
    }

    fn policy_index(&self, mv: &Take) -> usize {
        mv.0 as usize - 1
    }
}

pub struct PileStates {
    pub counters: u32,
    pub created: usize,
    pub cleared: usize,
}

impl PileStates {
    pub fn new(counters: u32) -> Self {
        Self {
            counters,
            created: 0,
            cleared: 0,
        }
    }
}

impl StatesManager for PileStates {
    type Position = Pile;

    fn init_board(&mut self, _variant: &Variant) -> Pile {
        self.created += 1;
        Pile::new(self.counters)
    }

    fn clear_active(&mut self) {
        self.cleared += 1;
    }
}

/// Uniform raw policy over the legal moves.
pub struct UniformPolicy;

impl PolicyAgent for UniformPolicy {
    type Position = Pile;

    fn name(&self) -> &str {
        "uniform"
    }

    fn policy(&mut self, position: &Pile) -> Result<MoveDistribution<Take>, AgentError> {
        Ok(position.legal_moves().into_iter().map(|m| (m, 1.0)).collect())
    }
}

/// Plays the best move, reporting a fixed 95/5 visit split when two moves
/// are legal. Optionally fails on a given call or on every call.
pub struct PerfectAgent {
    pub name: String,
    pub calls: usize,
    pub fail_on_call: Option<usize>,
    pub fail_always: bool,
    pub value: f32,
    pub cleared: usize,
}

impl PerfectAgent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: 0,
            fail_on_call: None,
            fail_always: false,
            value: 0.0,
            cleared: 0,
        }
    }
}

impl SearchAgent for PerfectAgent {
    type Position = Pile;

    fn name(&self) -> &str {
        &self.name
    }

    fn search(
        &mut self,
        position: &Pile,
        _limits: &SearchLimits,
        _settings: &PlaySettings,
    ) -> Result<SearchOutput<Take>, AgentError> {
        self.calls += 1;
        if self.fail_always || self.fail_on_call == Some(self.calls) {
            return Err(AgentError::new(&self.name, "scripted failure"));
        }
        let best = position.best_move();
        let distribution = position
            .legal_moves()
            .into_iter()
            .map(|m| (m, if m == best { 0.95 } else { 0.05 }))
            .collect();
        Ok(SearchOutput {
            best_move: best,
            distribution,
            value: self.value,
        })
    }

    fn clear_game_history(&mut self) {
        self.cleared += 1;
    }
}
