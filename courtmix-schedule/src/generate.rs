//! Round generation - rest, pair and match one round
//!
//! Level 1 - Orchestration and Level 2 - Phases

use courtmix_core::{
    FairnessState, Partnership, RestingPlayer, Roster, Round, ScheduleError, Shortfall,
    PLAYERS_PER_COURT,
};
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::matchup::select_matchups;
use crate::pairing::form_partnerships;
use crate::rest::select_rest;

/// Generate round `index` from the current (pre-commit) state.
///
/// Nothing is mutated; the round only affects `state` once committed.
/// A round that cannot fill every court is returned with its shortfalls
/// recorded rather than failing.
pub fn generate_round<R: Rng + ?Sized>(
    roster: &Roster,
    courts: usize,
    index: u32,
    state: &FairnessState,
    search_budget: usize,
    rng: &mut R,
) -> Result<Round, ScheduleError> {
    if roster.active_count() == 0 {
        return Err(ScheduleError::NoActivePlayers);
    }
    if courts == 0 {
        return Err(ScheduleError::NoCourts);
    }

    let players_per_round = courts * PLAYERS_PER_COURT;
    let plan = select_rest(roster, players_per_round, state);

    let (mut partnerships, free) = split_fixed(roster, &plan.playing);
    let required = (players_per_round / 2).saturating_sub(partnerships.len());
    let outcome = form_partnerships(&free, required, state, search_budget);

    let mut shortfalls = Vec::new();
    if outcome.partnerships.len() < required {
        shortfalls.push(Shortfall::Partners {
            required,
            formed: outcome.partnerships.len(),
        });
    }
    partnerships.extend(outcome.partnerships);

    let games = select_matchups(partnerships, courts, state, rng);
    if games.len() < courts {
        shortfalls.push(Shortfall::Courts {
            requested: courts,
            filled: games.len(),
        });
    }

    for shortfall in &shortfalls {
        tracing::warn!("Round {}: {}", index, shortfall);
    }
    tracing::info!(
        "Round {}: {} games, {} resting, pairing {:?} ({} placements)",
        index,
        games.len(),
        plan.resting.len(),
        outcome.method,
        outcome.explored
    );

    Ok(Round {
        index,
        resting: label_resting(plan.resting, state),
        playing: plan.playing,
        games,
        shortfalls,
    })
}

/// Intact fixed pairs among the playing players, and everyone else
fn split_fixed(roster: &Roster, playing: &[String]) -> (Vec<Partnership>, Vec<String>) {
    let playing_set: FxHashSet<&str> = playing.iter().map(String::as_str).collect();
    let mut paired: FxHashSet<String> = FxHashSet::default();
    let mut fixed = Vec::new();

    for (a, b) in roster.active_fixed_pairs() {
        if playing_set.contains(a.as_str()) && playing_set.contains(b.as_str()) {
            paired.insert(a.clone());
            paired.insert(b.clone());
            fixed.push(Partnership::new(a, b));
        }
    }
    let free = playing
        .iter()
        .filter(|p| !paired.contains(p.as_str()))
        .cloned()
        .collect();
    (fixed, free)
}

fn label_resting(resting: Vec<String>, state: &FairnessState) -> Vec<RestingPlayer> {
    resting
        .into_iter()
        .map(|name| RestingPlayer {
            rest_number: state.rest_count(&name) + 1,
            name,
        })
        .collect()
}
