//! Courtmix Schedule - fairness-aware round generation for doubles play
//!
//! This crate turns a roster and the fairness history into rounds:
//! - Rest selection (fewest rests first, fixed pairs rest together)
//! - Partner pairing (bounded search favouring new partners)
//! - Matchups (fresh opponents first)
//! - Commit and manual edits
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: Scheduler, generate_round (orchestration)
//! - Level 2: round assembly and shortfall reporting (phases)
//! - Level 3: select_rest, form_partnerships, select_matchups, commit_round (steps)
//! - Level 4: candidate search, scoring utilities

mod commit;
mod edit;
mod generate;
mod matchup;
mod pairing;
mod rest;
mod scheduler;

pub use commit::{commit_round, new_opponents};
pub use edit::{move_resting_into_slot, swap_partnerships, swap_players, EditError, Slot};
pub use generate::generate_round;
pub use matchup::{score_matchups, select_matchups, MatchupScore};
pub use pairing::{form_partnerships, CandidatePool, PairingMethod, PairingOutcome, NEW_PAIR_BONUS};
pub use rest::{select_rest, RestPlan};
pub use scheduler::{Scheduler, SetupChange};
