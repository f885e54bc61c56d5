//! Rest selection - who sits out and who plays this round
//!
//! Level 3 - Steps

use courtmix_core::{FairnessState, Roster};
use rustc_hash::{FxHashMap, FxHashSet};

/// Outcome of rest selection
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestPlan {
    /// Resting players in selection order
    pub resting: Vec<String>,
    /// Playing players, intact fixed pairs first
    pub playing: Vec<String>,
}

/// A fixed pair or a single free player, rested as a whole
#[derive(Clone, Debug)]
struct Unit<'a> {
    members: Vec<&'a str>,
    rest_sum: u32,
    turn_order: u64,
}

/// Choose `max(active - players_per_round, 0)` players to rest.
///
/// Fixed pairs rest together when at least two rest slots exist; otherwise
/// players are ranked individually. Fewer rests first, then lower turn order,
/// then roster order.
pub fn select_rest(roster: &Roster, players_per_round: usize, state: &FairnessState) -> RestPlan {
    let active = roster.active_names();
    let quota = active.len().saturating_sub(players_per_round);
    let fixed = roster.active_fixed_pairs();
    let turn_order: FxHashMap<&str, u64> = roster
        .players()
        .iter()
        .map(|p| (p.name.as_str(), p.turn_order))
        .collect();

    let mut resting = if !fixed.is_empty() && quota >= 2 {
        rest_by_units(&active, roster, &turn_order, quota, state)
    } else {
        rest_individually(&active, &turn_order, quota, state)
    };

    let rested: FxHashSet<&str> = resting.iter().map(String::as_str).collect();
    let mut playing: Vec<String> = active
        .iter()
        .filter(|p| !rested.contains(p.as_str()))
        .cloned()
        .collect();
    if playing.len() > players_per_round {
        resting.extend(playing.split_off(players_per_round));
    }

    RestPlan {
        playing: order_playing(playing, &fixed),
        resting,
    }
}

/// Rank individuals and rest the first `quota`
fn rest_individually(
    active: &[String],
    turn_order: &FxHashMap<&str, u64>,
    quota: usize,
    state: &FairnessState,
) -> Vec<String> {
    let mut ranked: Vec<&String> = active.iter().collect();
    ranked.sort_by_key(|name| (state.rest_count(name), order_of(turn_order, name)));
    ranked.into_iter().take(quota).cloned().collect()
}

/// Rest whole units without splitting fixed pairs.
///
/// Units are added while they fit. Singles and the quota share the roster's
/// parity, so the quota is always met exactly.
fn rest_by_units(
    active: &[String],
    roster: &Roster,
    turn_order: &FxHashMap<&str, u64>,
    quota: usize,
    state: &FairnessState,
) -> Vec<String> {
    let mut units = build_units(active, roster, turn_order, state);
    units.sort_by_key(|u| (u.rest_sum, u.turn_order));

    let mut resting: Vec<String> = Vec::with_capacity(quota);
    for unit in &units {
        if resting.len() + unit.members.len() <= quota {
            resting.extend(unit.members.iter().map(|m| m.to_string()));
        }
        if resting.len() >= quota {
            break;
        }
    }
    resting
}

/// Units in roster order; a pair sits at its first member's position
fn build_units<'a>(
    active: &'a [String],
    roster: &'a Roster,
    turn_order: &FxHashMap<&str, u64>,
    state: &FairnessState,
) -> Vec<Unit<'a>> {
    let fixed = roster.fixed_pairs();
    let active_set: FxHashSet<&str> = active.iter().map(String::as_str).collect();
    let mut placed: FxHashSet<&str> = FxHashSet::default();
    let mut units = Vec::with_capacity(active.len());

    for name in active {
        let name = name.as_str();
        if !placed.insert(name) {
            continue;
        }
        let members = match fixed.partner(name).filter(|p| active_set.contains(p)) {
            Some(p) => {
                placed.insert(p);
                vec![name, p]
            }
            None => vec![name],
        };

        units.push(Unit {
            rest_sum: members.iter().map(|m| state.rest_count(m)).sum(),
            turn_order: members
                .iter()
                .map(|m| order_of(turn_order, m))
                .max()
                .unwrap_or(0),
            members,
        });
    }

    units
}

/// Intact fixed pairs first (contiguous), then everyone else in roster order
fn order_playing(playing: Vec<String>, fixed: &[(String, String)]) -> Vec<String> {
    let playing_set: FxHashSet<&str> = playing.iter().map(String::as_str).collect();
    let mut paired: FxHashSet<&str> = FxHashSet::default();
    let mut ordered = Vec::with_capacity(playing.len());

    for (a, b) in fixed {
        if playing_set.contains(a.as_str()) && playing_set.contains(b.as_str()) {
            paired.insert(a.as_str());
            paired.insert(b.as_str());
            ordered.push(a.clone());
            ordered.push(b.clone());
        }
    }
    ordered.extend(
        playing
            .iter()
            .filter(|p| !paired.contains(p.as_str()))
            .cloned(),
    );
    ordered
}

fn order_of(turn_order: &FxHashMap<&str, u64>, name: &str) -> u64 {
    turn_order.get(name).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtmix_core::Player;

    fn roster(names: &[&str], pairs: &[(&str, &str)]) -> Roster {
        let players = names.iter().map(|n| Player::new(*n)).collect();
        let pairs = pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        Roster::new(players, pairs).unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_rest_when_roster_fits() {
        let r = roster(&["A", "B", "C", "D"], &[]);
        let state = FairnessState::new(&r.active_names());
        let plan = select_rest(&r, 4, &state);

        assert!(plan.resting.is_empty());
        assert_eq!(plan.playing, names(&["A", "B", "C", "D"]));
    }

    #[test]
    fn test_fewest_rests_rest_first() {
        let r = roster(&["A", "B", "C", "D", "E", "F"], &[]);
        let mut state = FairnessState::new(&r.active_names());
        state.record_rest("A");
        state.record_rest("B");

        let plan = select_rest(&r, 4, &state);
        assert_eq!(plan.resting, names(&["C", "D"]));
        assert_eq!(plan.playing, names(&["A", "B", "E", "F"]));
    }

    #[test]
    fn test_lower_turn_order_rests_first() {
        let players = vec![
            Player::new("A").with_turn_order(5),
            Player::new("B").with_turn_order(1),
            Player::new("C").with_turn_order(3),
            Player::new("D"),
            Player::new("E").with_turn_order(9),
        ];
        let r = Roster::new(players, vec![]).unwrap();
        let state = FairnessState::new(&r.active_names());

        let plan = select_rest(&r, 4, &state);
        assert_eq!(plan.resting, names(&["D"]));
    }

    #[test]
    fn test_fixed_pair_rests_together() {
        let r = roster(&["A", "B", "C", "D", "E", "F"], &[("C", "D")]);
        let mut state = FairnessState::new(&r.active_names());
        for name in ["A", "B", "E", "F"] {
            state.record_rest(name);
        }

        let plan = select_rest(&r, 4, &state);
        assert_eq!(plan.resting, names(&["C", "D"]));
        assert_eq!(plan.playing, names(&["A", "B", "E", "F"]));
    }

    #[test]
    fn test_pair_never_split() {
        // Quota 3: A&B rest, C&D would overshoot, E fills the last slot
        let r = roster(
            &["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K"],
            &[("A", "B"), ("C", "D"), ("G", "H"), ("I", "J")],
        );
        let state = FairnessState::new(&r.active_names());

        let plan = select_rest(&r, 8, &state);
        assert_eq!(plan.resting, names(&["A", "B", "E"]));
        assert_eq!(
            plan.playing,
            names(&["C", "D", "G", "H", "I", "J", "F", "K"])
        );
    }

    #[test]
    fn test_playing_lists_pairs_first() {
        let r = roster(&["A", "B", "C", "D", "E"], &[("B", "E")]);
        let state = FairnessState::new(&r.active_names());

        let plan = select_rest(&r, 4, &state);
        // One rest slot: individual ranking, A rests (roster order tie-break)
        assert_eq!(plan.resting, names(&["A"]));
        assert_eq!(plan.playing, names(&["B", "E", "C", "D"]));
    }

    #[test]
    fn test_partner_of_rested_member_plays_as_single() {
        let r = roster(&["A", "B", "C", "D", "E"], &[("A", "B")]);
        let state = FairnessState::new(&r.active_names());

        let plan = select_rest(&r, 4, &state);
        assert_eq!(plan.resting, names(&["A"]));
        assert_eq!(plan.playing, names(&["B", "C", "D", "E"]));
    }

    #[test]
    fn test_unit_turn_order_breaks_ties() {
        // A pair ranks by its members' highest turn order
        let players = vec![
            Player::new("A").with_turn_order(7),
            Player::new("B").with_turn_order(1),
            Player::new("C").with_turn_order(2),
            Player::new("D"),
            Player::new("E").with_turn_order(9),
            Player::new("F").with_turn_order(8),
        ];
        let r = Roster::new(players, vec![("A".to_string(), "B".to_string())]).unwrap();
        let state = FairnessState::new(&r.active_names());

        let plan = select_rest(&r, 4, &state);
        assert_eq!(plan.resting, names(&["D", "C"]));
        assert_eq!(plan.playing, names(&["A", "B", "E", "F"]));
    }

    #[test]
    fn test_large_roster_with_pairs() {
        let all: Vec<String> = (1..=48).map(|i| format!("P{}", i)).collect();
        let refs: Vec<&str> = all.iter().map(String::as_str).collect();
        let pairs: Vec<(&str, &str)> = (0..12).map(|k| (refs[2 * k], refs[2 * k + 1])).collect();
        let r = roster(&refs, &pairs);
        let mut state = FairnessState::new(&r.active_names());
        for name in &refs[..10] {
            state.record_rest(name);
        }

        let plan = select_rest(&r, 40, &state);
        assert_eq!(plan.resting.len(), 8);
        assert_eq!(plan.playing.len(), 40);
        for (a, b) in &pairs {
            let a_rests = plan.resting.iter().any(|p| p == a);
            let b_rests = plan.resting.iter().any(|p| p == b);
            assert_eq!(a_rests, b_rests, "{} & {} split", a, b);
        }
        // Players who already rested keep playing
        assert!(refs[..10].iter().all(|p| plan.playing.iter().any(|q| q == p)));
    }

    #[test]
    fn test_partition_covers_roster() {
        let r = roster(&["A", "B", "C", "D", "E", "F", "G", "H", "I"], &[("A", "I")]);
        let state = FairnessState::new(&r.active_names());

        let plan = select_rest(&r, 4, &state);
        assert_eq!(plan.resting.len(), 5);
        assert_eq!(plan.playing.len(), 4);
        for name in r.active_names() {
            assert!(plan.resting.contains(&name) ^ plan.playing.contains(&name));
        }
    }
}
