//! Round model handed to presentation

use crate::state::PairKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two players playing as one team
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partnership(pub [String; 2]);

impl Partnership {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Partnership([a.into(), b.into()])
    }

    pub fn members(&self) -> &[String; 2] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|p| p == name)
    }

    pub fn key(&self) -> PairKey {
        PairKey::new(&self.0[0], &self.0[1])
    }
}

impl fmt::Display for Partnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} & {}", self.0[0], self.0[1])
    }
}

/// Which partnership of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// Two partnerships opposing each other on one court
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// 1-based court number
    pub court: usize,
    pub partnership_a: Partnership,
    pub partnership_b: Partnership,
}

impl Game {
    pub fn side(&self, side: Side) -> &Partnership {
        match side {
            Side::A => &self.partnership_a,
            Side::B => &self.partnership_b,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Partnership {
        match side {
            Side::A => &mut self.partnership_a,
            Side::B => &mut self.partnership_b,
        }
    }

    /// All four players, side A first
    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.partnership_a
            .0
            .iter()
            .chain(self.partnership_b.0.iter())
            .map(String::as_str)
    }

    /// Every (side A player, side B player) pairing
    pub fn opposing_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.partnership_a.0.iter().flat_map(move |a| {
            self.partnership_b
                .0
                .iter()
                .map(move |b| (a.as_str(), b.as_str()))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.partnership_a.contains(name) || self.partnership_b.contains(name)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Court {}: {} vs {}",
            self.court, self.partnership_a, self.partnership_b
        )
    }
}

/// A resting player with the rest number this round gives them
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingPlayer {
    pub name: String,
    pub rest_number: u32,
}

impl fmt::Display for RestingPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.rest_number)
    }
}

/// Why a round came out smaller than requested
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shortfall {
    /// Not enough free players for the partnerships needed
    Partners { required: usize, formed: usize },
    /// Not enough non-overlapping matchups for every court
    Courts { requested: usize, filled: usize },
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortfall::Partners { required, formed } => {
                write!(f, "formed {} of {} partnerships", formed, required)
            }
            Shortfall::Courts { requested, filled } => {
                write!(f, "filled {} of {} courts", filled, requested)
            }
        }
    }
}

/// One generated round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based, increases by one per appended round
    pub index: u32,
    pub resting: Vec<RestingPlayer>,
    pub playing: Vec<String>,
    pub games: Vec<Game>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shortfalls: Vec<Shortfall>,
}

impl Round {
    pub fn is_resting(&self, name: &str) -> bool {
        self.resting.iter().any(|r| r.name == name)
    }

    /// Names of everyone placed in a game
    pub fn players_in_games(&self) -> impl Iterator<Item = &str> {
        self.games.iter().flat_map(|g| g.players())
    }

    pub fn partnerships(&self) -> impl Iterator<Item = &Partnership> {
        self.games
            .iter()
            .flat_map(|g| [&g.partnership_a, &g.partnership_b])
    }

    pub fn is_degraded(&self) -> bool {
        !self.shortfalls.is_empty()
    }
}
