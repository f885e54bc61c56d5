//! Matchup selection - placing partnerships against each other on courts
//!
//! Level 3 - Steps

use courtmix_core::{FairnessState, Game, Partnership};
use rand::seq::SliceRandom;
use rand::Rng;

/// Score of one candidate matchup between two partnerships
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchupScore {
    /// Index of the first partnership
    pub first: usize,
    /// Index of the second partnership
    pub second: usize,
    /// Cross pairings that have never met (0-4)
    pub freshness: u32,
    /// Sum of prior encounters over the four cross pairings
    pub repeat_total: u32,
    /// Sum over the four players of their unseen rivals
    pub player_freshness: u32,
}

/// Score every unordered pair of partnerships, best first.
///
/// Sorted by freshness (desc), repeat total (asc), player freshness (desc).
/// The sort is stable, so equal candidates keep enumeration order.
pub fn score_matchups(partnerships: &[Partnership], state: &FairnessState) -> Vec<MatchupScore> {
    let mut scores = Vec::with_capacity(partnerships.len() * partnerships.len().saturating_sub(1) / 2);

    for i in 0..partnerships.len() {
        for j in (i + 1)..partnerships.len() {
            let [a1, a2] = partnerships[i].members();
            let [b1, b2] = partnerships[j].members();
            let counts = [
                [state.encounters(a1, b1), state.encounters(a1, b2)],
                [state.encounters(a2, b1), state.encounters(a2, b2)],
            ];
            let unseen = |n: u32| u32::from(n == 0);

            let freshness: u32 = counts.iter().flatten().map(|&n| unseen(n)).sum();
            let player_freshness = (0..2)
                .map(|k| {
                    unseen(counts[k][0]) + unseen(counts[k][1])
                        + unseen(counts[0][k]) + unseen(counts[1][k])
                })
                .sum();

            scores.push(MatchupScore {
                first: i,
                second: j,
                freshness,
                repeat_total: counts.iter().flatten().sum(),
                player_freshness,
            });
        }
    }

    scores.sort_by(|x, y| {
        y.freshness
            .cmp(&x.freshness)
            .then(x.repeat_total.cmp(&y.repeat_total))
            .then(y.player_freshness.cmp(&x.player_freshness))
    });
    scores
}

/// Place partnerships on up to `courts` courts.
///
/// The partnerships are shuffled with `rng` first so equally scored
/// matchups do not always favour the same teams. A partnership is used at
/// most once; courts are numbered from 1 in acceptance order.
pub fn select_matchups<R: Rng + ?Sized>(
    mut partnerships: Vec<Partnership>,
    courts: usize,
    state: &FairnessState,
    rng: &mut R,
) -> Vec<Game> {
    partnerships.shuffle(rng);

    let mut used = vec![false; partnerships.len()];
    let mut games = Vec::with_capacity(courts);

    for m in score_matchups(&partnerships, state) {
        if games.len() >= courts {
            break;
        }
        if used[m.first] || used[m.second] {
            continue;
        }
        used[m.first] = true;
        used[m.second] = true;
        games.push(Game {
            court: games.len() + 1,
            partnership_a: partnerships[m.first].clone(),
            partnership_b: partnerships[m.second].clone(),
        });
    }

    games
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn teams(list: &[(&str, &str)]) -> Vec<Partnership> {
        list.iter().map(|(a, b)| Partnership::new(*a, *b)).collect()
    }

    #[test]
    fn test_fresh_matchup_scores() {
        let state = FairnessState::default();
        let scores = score_matchups(&teams(&[("A", "B"), ("C", "D")]), &state);

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].freshness, 4);
        assert_eq!(scores[0].repeat_total, 0);
        assert_eq!(scores[0].player_freshness, 8);
    }

    #[test]
    fn test_repeat_opponents_sorted_last() {
        let mut state = FairnessState::default();
        state.record_encounter("A", "C");
        state.record_encounter("A", "C");
        state.record_encounter("B", "D");

        let scores = score_matchups(&teams(&[("A", "B"), ("C", "D"), ("E", "F")]), &state);
        let last = scores.last().unwrap();
        assert_eq!((last.first, last.second), (0, 1));
        assert_eq!(last.freshness, 2);
        assert_eq!(last.repeat_total, 3);
        assert!(scores[..2].iter().all(|s| s.freshness == 4));
    }

    #[test]
    fn test_lower_repeat_total_wins_ties() {
        let mut state = FairnessState::default();
        // Both matchups have freshness 3; A-C met twice, A-E met once
        state.record_encounter("A", "C");
        state.record_encounter("A", "C");
        state.record_encounter("A", "E");

        let scores = score_matchups(&teams(&[("A", "B"), ("C", "D"), ("E", "F")]), &state);
        assert_eq!((scores[0].first, scores[0].second), (1, 2));
        assert_eq!((scores[1].first, scores[1].second), (0, 2));
        assert_eq!((scores[2].first, scores[2].second), (0, 1));
    }

    #[test]
    fn test_partnership_used_once() {
        let state = FairnessState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let all = teams(&[("A", "B"), ("C", "D"), ("E", "F"), ("G", "H")]);

        let games = select_matchups(all, 2, &state, &mut rng);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].court, 1);
        assert_eq!(games[1].court, 2);

        let mut seen: Vec<&str> = games.iter().flat_map(|g| g.players()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_fewer_games_than_courts() {
        let state = FairnessState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let games = select_matchups(teams(&[("A", "B"), ("C", "D"), ("E", "F")]), 2, &state, &mut rng);
        assert_eq!(games.len(), 1);
    }

    #[test]
    fn test_same_seed_same_games() {
        let state = FairnessState::default();
        let all = teams(&[("A", "B"), ("C", "D"), ("E", "F"), ("G", "H")]);

        let first = select_matchups(all.clone(), 2, &state, &mut ChaCha8Rng::seed_from_u64(3));
        let second = select_matchups(all, 2, &state, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(first, second);
    }
}
