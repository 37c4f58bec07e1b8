//! Core contracts for the self-play engine.
//!
//! This crate describes the collaborators the orchestration layer sequences
//! calls to, without implementing any of them:
//! - [`Position`] and [`StatesManager`] for the game rules and state lifecycle
//! - [`SearchAgent`] and [`PolicyAgent`] for move selection
//! - [`MoveDistribution`] for visit counts and policy priors
//! - [`SearchLimits`] and [`PlaySettings`] as pass-through configuration

mod agent;
mod color;
mod distribution;
mod outcome;
mod position;
mod settings;

pub use agent::{AgentError, PolicyAgent, SearchAgent, SearchOutput};
pub use color::Color;
pub use distribution::MoveDistribution;
pub use outcome::{GameResult, TerminalState, Termination};
pub use position::{IllegalMove, Position, StatesManager, Variant};
pub use settings::{PlaySettings, SearchLimits};
