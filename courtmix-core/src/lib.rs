//! Courtmix Core - Roster, fairness bookkeeping and round model
//!
//! This crate provides the data side of the doubles scheduler:
//! - Roster of players with fixed partnerships
//! - Fairness state (rest/played counts, opponent matrix, pair history)
//! - Round, game and partnership values handed to presentation
//! - Scheduler configuration and error types

pub mod config;
pub mod error;
pub mod roster;
pub mod round;
pub mod state;

// Re-exports for convenient access
pub use config::{resolve_courts, SchedulerConfig, DEFAULT_SEARCH_BUDGET, PLAYERS_PER_COURT};
pub use error::{RosterError, ScheduleError};
pub use roster::{FixedPairs, Player, Roster};
pub use round::{Game, Partnership, RestingPlayer, Round, Shortfall, Side};
pub use state::{FairnessState, PairKey, PlayerStanding};
