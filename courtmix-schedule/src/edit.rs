//! Manual edits to a generated round
//!
//! Level 3 - Steps
//!
//! Edits rewrite the round only. Whether any counts move is the scheduler
//! session's call, since it knows if the round has been committed.

use courtmix_core::{FairnessState, RestingPlayer, Round, Side};
use thiserror::Error;

/// Rejected manual edit; the round is left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no round has been generated yet")]
    NoRound,

    #[error("player is not resting this round: {0}")]
    NotResting(String),

    #[error("no game at index {0}")]
    NoSuchGame(usize),

    #[error("no position {0} in a partnership (expected 0 or 1)")]
    NoSuchPosition(usize),

    #[error("cannot swap partnerships within the same game ({0})")]
    SameGame(usize),

    #[error("cannot swap a slot with itself")]
    SameSlot,
}

/// A player slot in a round: game index (0-based), side, member position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub game: usize,
    pub side: Side,
    pub position: usize,
}

impl Slot {
    pub fn new(game: usize, side: Side, position: usize) -> Self {
        Self { game, side, position }
    }
}

/// Put a resting player into `slot`, sending its occupant to rest.
///
/// The displaced player is labelled with their next rest number, read from
/// `state` before any shift. Returns the displaced player's name.
pub fn move_resting_into_slot(
    round: &mut Round,
    player: &str,
    slot: Slot,
    state: &FairnessState,
) -> Result<String, EditError> {
    let rest_idx = round
        .resting
        .iter()
        .position(|r| r.name == player)
        .ok_or_else(|| EditError::NotResting(player.to_string()))?;
    if slot.position > 1 {
        return Err(EditError::NoSuchPosition(slot.position));
    }
    let game = round
        .games
        .get_mut(slot.game)
        .ok_or(EditError::NoSuchGame(slot.game))?;

    let partnership = game.side_mut(slot.side);
    let displaced = std::mem::replace(&mut partnership.0[slot.position], player.to_string());

    round.resting.remove(rest_idx);
    round.resting.push(RestingPlayer {
        rest_number: state.rest_count(&displaced) + 1,
        name: displaced.clone(),
    });
    for name in round.playing.iter_mut() {
        if *name == displaced {
            *name = player.to_string();
        }
    }

    Ok(displaced)
}

/// Exchange two partnerships between two different games
pub fn swap_partnerships(
    round: &mut Round,
    first: (usize, Side),
    second: (usize, Side),
) -> Result<(), EditError> {
    let (game_a, side_a) = first;
    let (game_b, side_b) = second;
    if game_a == game_b {
        return Err(EditError::SameGame(game_a));
    }

    let a = round
        .games
        .get(game_a)
        .ok_or(EditError::NoSuchGame(game_a))?
        .side(side_a)
        .clone();
    let b = round
        .games
        .get(game_b)
        .ok_or(EditError::NoSuchGame(game_b))?
        .side(side_b)
        .clone();

    *round.games[game_a].side_mut(side_a) = b;
    *round.games[game_b].side_mut(side_b) = a;
    Ok(())
}

/// Exchange the players in two game slots.
///
/// Both players stay in the round, so only team assignments change. The
/// slots may be in the same game or in different games.
pub fn swap_players(round: &mut Round, first: Slot, second: Slot) -> Result<(), EditError> {
    if first == second {
        return Err(EditError::SameSlot);
    }
    let a = player_at(round, first)?.to_string();
    let b = player_at(round, second)?.to_string();

    round.games[first.game].side_mut(first.side).0[first.position] = b;
    round.games[second.game].side_mut(second.side).0[second.position] = a;
    Ok(())
}

fn player_at(round: &Round, slot: Slot) -> Result<&str, EditError> {
    if slot.position > 1 {
        return Err(EditError::NoSuchPosition(slot.position));
    }
    let game = round
        .games
        .get(slot.game)
        .ok_or(EditError::NoSuchGame(slot.game))?;
    Ok(&game.side(slot.side).0[slot.position])
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtmix_core::{Game, Partnership};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn two_court_round() -> Round {
        Round {
            index: 1,
            resting: vec![RestingPlayer {
                name: "I".to_string(),
                rest_number: 1,
            }],
            playing: names(&["A", "B", "C", "D", "E", "F", "G", "H"]),
            games: vec![
                Game {
                    court: 1,
                    partnership_a: Partnership::new("A", "B"),
                    partnership_b: Partnership::new("C", "D"),
                },
                Game {
                    court: 2,
                    partnership_a: Partnership::new("E", "F"),
                    partnership_b: Partnership::new("G", "H"),
                },
            ],
            shortfalls: vec![],
        }
    }

    #[test]
    fn test_move_resting_player_in() {
        let mut round = two_court_round();
        let mut state = FairnessState::new(&round.playing);
        state.record_rest("D");

        let displaced =
            move_resting_into_slot(&mut round, "I", Slot::new(0, Side::B, 1), &state).unwrap();

        assert_eq!(displaced, "D");
        assert_eq!(round.games[0].partnership_b, Partnership::new("C", "I"));
        assert!(round.playing.contains(&"I".to_string()));
        assert!(!round.playing.contains(&"D".to_string()));
        assert_eq!(
            round.resting,
            vec![RestingPlayer {
                name: "D".to_string(),
                rest_number: 2,
            }]
        );
    }

    #[test]
    fn test_move_rejects_bad_requests() {
        let state = FairnessState::default();
        let original = two_court_round();

        let mut round = original.clone();
        assert_eq!(
            move_resting_into_slot(&mut round, "A", Slot::new(0, Side::A, 0), &state),
            Err(EditError::NotResting("A".to_string()))
        );
        assert_eq!(
            move_resting_into_slot(&mut round, "I", Slot::new(5, Side::A, 0), &state),
            Err(EditError::NoSuchGame(5))
        );
        assert_eq!(
            move_resting_into_slot(&mut round, "I", Slot::new(0, Side::A, 2), &state),
            Err(EditError::NoSuchPosition(2))
        );
        assert_eq!(round, original);
    }

    #[test]
    fn test_swap_partnerships_between_games() {
        let mut round = two_court_round();
        swap_partnerships(&mut round, (0, Side::B), (1, Side::A)).unwrap();

        assert_eq!(round.games[0].partnership_b, Partnership::new("E", "F"));
        assert_eq!(round.games[1].partnership_a, Partnership::new("C", "D"));
        assert_eq!(round.games[0].court, 1);
    }

    #[test]
    fn test_swap_players_between_games() {
        let mut round = two_court_round();
        swap_players(&mut round, Slot::new(0, Side::A, 1), Slot::new(1, Side::B, 0)).unwrap();

        assert_eq!(round.games[0].partnership_a, Partnership::new("A", "G"));
        assert_eq!(round.games[1].partnership_b, Partnership::new("B", "H"));
        assert_eq!(round.playing, two_court_round().playing);
        assert_eq!(round.resting, two_court_round().resting);
    }

    #[test]
    fn test_swap_players_across_net() {
        let mut round = two_court_round();
        swap_players(&mut round, Slot::new(0, Side::A, 0), Slot::new(0, Side::B, 0)).unwrap();

        assert_eq!(round.games[0].partnership_a, Partnership::new("C", "B"));
        assert_eq!(round.games[0].partnership_b, Partnership::new("A", "D"));
    }

    #[test]
    fn test_swap_players_rejects_bad_slots() {
        let mut round = two_court_round();
        let original = round.clone();
        let slot = Slot::new(0, Side::A, 0);

        assert_eq!(swap_players(&mut round, slot, slot), Err(EditError::SameSlot));
        assert_eq!(
            swap_players(&mut round, slot, Slot::new(2, Side::A, 0)),
            Err(EditError::NoSuchGame(2))
        );
        assert_eq!(
            swap_players(&mut round, Slot::new(1, Side::B, 3), slot),
            Err(EditError::NoSuchPosition(3))
        );
        assert_eq!(round, original);
    }

    #[test]
    fn test_swap_rejects_same_game() {
        let mut round = two_court_round();
        let original = round.clone();

        assert_eq!(
            swap_partnerships(&mut round, (1, Side::A), (1, Side::B)),
            Err(EditError::SameGame(1))
        );
        assert_eq!(
            swap_partnerships(&mut round, (0, Side::A), (3, Side::B)),
            Err(EditError::NoSuchGame(3))
        );
        assert_eq!(round, original);
    }
}
