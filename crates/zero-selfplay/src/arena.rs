//! Arena games between two search agents.

use crate::error::GameError;
use crate::game::apply_move;
use crate::record::GameRecord;
use zero_core::{Color, PlaySettings, Position, SearchAgent, SearchLimits, TerminalState};

/// Plays one game between `white` and `black` from `position`.
///
/// Arena games measure strength only: nothing is exported and the search
/// distribution is not sharpened. `settings` should be competitive settings
/// (see [`PlaySettings::competitive`]). The moves and outcome are recorded in
/// `record`.
///
/// # Errors
///
/// Returns [`GameError::Agent`] if either agent fails and
/// [`GameError::IllegalMove`] if one selects an illegal move.
pub fn generate_arena_game<A: SearchAgent>(
    white: &mut A,
    black: &mut A,
    position: &mut A::Position,
    record: &mut GameRecord,
    limits: &SearchLimits,
    settings: &PlaySettings,
) -> Result<TerminalState, GameError> {
    let outcome = match position.terminal_state() {
        Some(terminal) => terminal,
        None => loop {
            let agent = match position.side_to_move() {
                Color::White => &mut *white,
                Color::Black => &mut *black,
            };
            let output = agent.search(position, limits, settings)?;
            if let Some(terminal) = apply_move(position, record, &output.best_move, settings)? {
                break terminal;
            }
        },
    };
    record.set_outcome(outcome);
    Ok(outcome)
}
