//! Randomized opening positions sampled from the raw network policy.

use crate::record::GameRecord;
use rand::Rng;
use rand_distr::{Distribution, Exp};
use zero_core::{PolicyAgent, Position, StatesManager, Variant};

/// Clips `ply` to at most `max_ply`.
///
/// Values above the bound are not truncated but replaced by a uniform draw
/// from `[0, max_ply]`, so opening depths do not pile up at the maximum.
pub fn clip_ply<R: Rng + ?Sized>(ply: usize, max_ply: usize, rng: &mut R) -> usize {
    if ply > max_ply {
        rng.gen_range(0..=max_ply)
    } else {
        ply
    }
}

/// Draws an opening length from an exponential distribution with the given
/// mean, rounded to the nearest ply and passed through [`clip_ply`].
pub fn draw_opening_ply<R: Rng + ?Sized>(mean_ply: f32, max_ply: usize, rng: &mut R) -> usize {
    let ply = match Exp::new(1.0 / mean_ply) {
        Ok(exp) if mean_ply > 0.0 => exp.sample(rng).round() as usize,
        _ => 0,
    };
    clip_ply(ply, max_ply, rng)
}

/// Builds a starting position by sampling up to `plys` moves from the raw
/// policy at temperature 1.
///
/// Each candidate move is tried on a copy first; sampling stops before a move
/// that would end the game, so the returned position is never terminal unless
/// the variant's initial position already is. A failing agent or an empty
/// policy also ends the opening early. The sampled moves are appended to
/// `record`.
pub fn init_starting_pos_from_raw_policy<A, S, R>(
    raw_agent: &mut A,
    plys: usize,
    record: &mut GameRecord,
    variant: &Variant,
    states: &mut S,
    rng: &mut R,
) -> A::Position
where
    A: PolicyAgent,
    S: StatesManager<Position = A::Position>,
    R: Rng + ?Sized,
{
    let mut position = states.init_board(variant);
    for ply in 0..plys {
        if position.is_terminal() {
            break;
        }
        let policy = match raw_agent.policy(&position) {
            Ok(policy) => policy,
            Err(e) => {
                tracing::debug!("Opening stopped at ply {}: {}", ply, e);
                break;
            }
        };
        let Some(mv) = policy.sample(rng, 1.0).cloned() else {
            break;
        };
        let mut next = position.clone();
        if next.play(&mv).is_err() || next.is_terminal() {
            break;
        }
        position = next;
        record.push_move(&mv);
    }
    position
}
