//! Round commit - folding an accepted round into the fairness state
//!
//! Level 3 - Steps
//!
//! Committing is purely additive. The caller must commit a round at most
//! once; the scheduler session enforces this.

use courtmix_core::{FairnessState, Round};

/// Apply `round` to `state`.
///
/// Resting players gain a rest, game players gain a game, opponents gain an
/// encounter, each player scores their new opponents and every partnership
/// is recorded with the round index.
pub fn commit_round(state: &mut FairnessState, round: &Round) {
    for resting in &round.resting {
        state.record_rest(&resting.name);
    }
    for name in round.players_in_games() {
        state.record_played(name);
    }

    for game in &round.games {
        for (a, b) in game.opposing_pairs() {
            state.record_encounter(a, b);
        }

        for (team, rivals) in [
            (&game.partnership_a, &game.partnership_b),
            (&game.partnership_b, &game.partnership_a),
        ] {
            for player in team.members() {
                let delta = new_opponents(state, player, rivals.members());
                state.add_fairness(player, delta);
            }
        }
    }

    for partnership in round.partnerships() {
        let [a, b] = partnership.members();
        state.record_partnership(a, b, round.index);
    }
}

/// Rivals this player has now met exactly once (0, 1 or 2).
///
/// Read after the round's encounters are recorded, so a count of one means
/// the meeting was their first.
pub fn new_opponents(state: &FairnessState, player: &str, rivals: &[String; 2]) -> u32 {
    rivals
        .iter()
        .filter(|rival| state.encounters(player, rival) == 1)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtmix_core::{Game, Partnership, RestingPlayer};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn round(index: u32, a: (&str, &str), b: (&str, &str), resting: &[&str]) -> Round {
        Round {
            index,
            resting: resting
                .iter()
                .map(|n| RestingPlayer {
                    name: n.to_string(),
                    rest_number: 1,
                })
                .collect(),
            playing: names(&[a.0, a.1, b.0, b.1]),
            games: vec![Game {
                court: 1,
                partnership_a: Partnership::new(a.0, a.1),
                partnership_b: Partnership::new(b.0, b.1),
            }],
            shortfalls: vec![],
        }
    }

    #[test]
    fn test_commit_counts() {
        let mut state = FairnessState::new(&names(&["A", "B", "C", "D", "E"]));
        commit_round(&mut state, &round(1, ("A", "B"), ("C", "D"), &["E"]));

        assert_eq!(state.rest_count("E"), 1);
        assert_eq!(state.played_count("E"), 0);
        for p in ["A", "B", "C", "D"] {
            assert_eq!(state.played_count(p), 1);
            assert_eq!(state.rest_count(p), 0);
        }
    }

    #[test]
    fn test_commit_opponents_symmetric() {
        let mut state = FairnessState::new(&names(&["A", "B", "C", "D"]));
        commit_round(&mut state, &round(1, ("A", "B"), ("C", "D"), &[]));

        assert_eq!(state.encounters("A", "C"), 1);
        assert_eq!(state.encounters("C", "A"), 1);
        assert_eq!(state.encounters("B", "D"), 1);
        assert_eq!(state.encounters("A", "B"), 0);
    }

    #[test]
    fn test_commit_pair_history() {
        let mut state = FairnessState::new(&names(&["A", "B", "C", "D"]));
        commit_round(&mut state, &round(4, ("A", "B"), ("C", "D"), &[]));

        assert!(state.has_partnered("B", "A"));
        assert!(state.has_partnered("C", "D"));
        assert!(!state.has_partnered("A", "C"));
        assert_eq!(state.last_partnered("A", "B"), Some(4));
    }

    #[test]
    fn test_fairness_score_rewards_new_opponents() {
        let mut state = FairnessState::new(&names(&["A", "B", "C", "D"]));

        // First meeting: both rivals new for everyone
        commit_round(&mut state, &round(1, ("A", "B"), ("C", "D"), &[]));
        assert_eq!(state.fairness_score("A"), 2);

        // A&C vs B&D: A meets B (new) and D (second time)
        commit_round(&mut state, &round(2, ("A", "C"), ("B", "D"), &[]));
        assert_eq!(state.fairness_score("A"), 3);

        // Same matchup again: nobody new
        commit_round(&mut state, &round(3, ("A", "C"), ("B", "D"), &[]));
        assert_eq!(state.fairness_score("A"), 3);
    }
}
