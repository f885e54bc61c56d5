//! Fairness bookkeeping carried between rounds
//!
//! `FairnessState` is pure data: rest and played counts, the symmetric
//! opponent-encounter matrix, partnership history and per-player fairness
//! score. Decision logic lives in `courtmix-schedule`; this module only
//! exposes reads and the increments a committed round applies.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unordered partnership key (members stored sorted)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            PairKey(a.to_string(), b.to_string())
        } else {
            PairKey(b.to_string(), a.to_string())
        }
    }

    pub fn members(&self) -> (&str, &str) {
        (&self.0, &self.1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0 == name || self.1 == name
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}&{}", self.0, self.1)
    }
}

/// Per-player summary for reporting
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub name: String,
    pub played: u32,
    pub rested: u32,
    pub fairness_score: u32,
}

/// Mutable fairness record for one scheduling session
#[derive(Clone, Debug, Default)]
pub struct FairnessState {
    rest_count: FxHashMap<String, u32>,
    played_count: FxHashMap<String, u32>,
    opponents: FxHashMap<String, FxHashMap<String, u32>>,
    pair_history: FxHashSet<PairKey>,
    pair_history_round: FxHashMap<PairKey, u32>,
    fairness_score: FxHashMap<String, u32>,
}

impl FairnessState {
    /// Fresh state with every active player at zero
    pub fn new(active: &[String]) -> Self {
        let mut state = Self::default();
        for name in active {
            state.rest_count.insert(name.clone(), 0);
            state.played_count.insert(name.clone(), 0);
            state.fairness_score.insert(name.clone(), 0);
        }
        state
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn rest_count(&self, name: &str) -> u32 {
        self.rest_count.get(name).copied().unwrap_or(0)
    }

    pub fn played_count(&self, name: &str) -> u32 {
        self.played_count.get(name).copied().unwrap_or(0)
    }

    pub fn fairness_score(&self, name: &str) -> u32 {
        self.fairness_score.get(name).copied().unwrap_or(0)
    }

    /// Times `a` and `b` have been on opposing partnerships
    pub fn encounters(&self, a: &str, b: &str) -> u32 {
        self.opponents
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(0)
    }

    pub fn has_partnered(&self, a: &str, b: &str) -> bool {
        self.pair_history.contains(&PairKey::new(a, b))
    }

    /// Round index in which `a` and `b` last partnered
    pub fn last_partnered(&self, a: &str, b: &str) -> Option<u32> {
        self.pair_history_round.get(&PairKey::new(a, b)).copied()
    }

    pub fn pair_history(&self) -> impl Iterator<Item = &PairKey> {
        self.pair_history.iter()
    }

    pub fn pair_history_len(&self) -> usize {
        self.pair_history.len()
    }

    /// Players tracked by rest/played counts (the active set)
    pub fn tracked_players(&self) -> impl Iterator<Item = &str> {
        self.rest_count.keys().map(String::as_str)
    }

    pub fn max_rest_count(&self) -> u32 {
        self.rest_count.values().copied().max().unwrap_or(0)
    }

    /// Whether every pair of `active` players has partnered at least once
    pub fn partner_history_exhausted(&self, active: &[String]) -> bool {
        if active.len() < 2 {
            return false;
        }
        active.iter().enumerate().all(|(i, a)| {
            active[i + 1..].iter().all(|b| self.has_partnered(a, b))
        })
    }

    /// Standings in the order of `names`
    pub fn standings(&self, names: &[String]) -> Vec<PlayerStanding> {
        names
            .iter()
            .map(|name| PlayerStanding {
                name: name.clone(),
                played: self.played_count(name),
                rested: self.rest_count(name),
                fairness_score: self.fairness_score(name),
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Updates
    // ------------------------------------------------------------------

    pub fn record_rest(&mut self, name: &str) {
        *self.rest_count.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn record_played(&mut self, name: &str) {
        *self.played_count.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Count one more encounter between `a` and `b` (both directions).
    /// Self-encounters are ignored.
    pub fn record_encounter(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        *self
            .opponents
            .entry(a.to_string())
            .or_default()
            .entry(b.to_string())
            .or_insert(0) += 1;
        *self
            .opponents
            .entry(b.to_string())
            .or_default()
            .entry(a.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_partnership(&mut self, a: &str, b: &str, round_index: u32) {
        let key = PairKey::new(a, b);
        self.pair_history_round.insert(key.clone(), round_index);
        self.pair_history.insert(key);
    }

    pub fn add_fairness(&mut self, name: &str, delta: u32) {
        *self.fairness_score.entry(name.to_string()).or_insert(0) += delta;
    }

    /// Move one round of a player's tally from rested to played
    pub fn shift_rest_to_played(&mut self, name: &str) {
        if let Some(rest) = self.rest_count.get_mut(name) {
            *rest = rest.saturating_sub(1);
        }
        self.record_played(name);
    }

    /// Move one round of a player's tally from played to rested
    pub fn shift_played_to_rest(&mut self, name: &str) {
        if let Some(played) = self.played_count.get_mut(name) {
            *played = played.saturating_sub(1);
        }
        self.record_rest(name);
    }

    pub fn clear_partner_history(&mut self) {
        self.pair_history.clear();
        self.pair_history_round.clear();
    }

    /// Align tracked players with a changed active set.
    ///
    /// Existing counts carry forward. Newcomers start at the current maximum
    /// rest count with nothing played. Departed players are pruned from the
    /// count and score maps; opponent and partnership history are kept.
    pub fn reconcile(&mut self, active: &[String]) {
        let seed_rest = active
            .iter()
            .filter_map(|name| self.rest_count.get(name))
            .copied()
            .max()
            .unwrap_or(0);

        for name in active {
            self.rest_count.entry(name.clone()).or_insert(seed_rest);
            self.played_count.entry(name.clone()).or_insert(0);
            self.fairness_score.entry(name.clone()).or_insert(0);
        }

        let keep: FxHashSet<&str> = active.iter().map(String::as_str).collect();
        self.rest_count.retain(|name, _| keep.contains(name.as_str()));
        self.played_count.retain(|name, _| keep.contains(name.as_str()));
        self.fairness_score.retain(|name, _| keep.contains(name.as_str()));
    }
}
