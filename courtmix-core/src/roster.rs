//! Roster - players and their fixed partnerships

use crate::error::RosterError;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A registered player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Display only
    #[serde(default)]
    pub gender: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Higher = returned from rest more recently
    #[serde(default)]
    pub turn_order: u64,
}

fn default_active() -> bool {
    true
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gender: String::new(),
            active: true,
            turn_order: 0,
        }
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }

    pub fn with_turn_order(mut self, turn_order: u64) -> Self {
        self.turn_order = turn_order;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Partnerships declared by the organizer.
///
/// Each player appears in at most one pair; `partner_of` maps both members
/// to each other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedPairs {
    pairs: Vec<(String, String)>,
    partner_of: FxHashMap<String, String>,
}

impl FixedPairs {
    pub fn partner(&self, name: &str) -> Option<&str> {
        self.partner_of.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.partner_of.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn insert(&mut self, a: String, b: String) -> Result<(), RosterError> {
        if a == b {
            return Err(RosterError::SelfPair(a));
        }
        for name in [&a, &b] {
            if self.partner_of.contains_key(name) {
                return Err(RosterError::AlreadyPaired(name.clone()));
            }
        }
        self.partner_of.insert(a.clone(), b.clone());
        self.partner_of.insert(b.clone(), a.clone());
        self.pairs.push((a, b));
        Ok(())
    }
}

/// On-disk roster layout
#[derive(Debug, Deserialize, Serialize)]
struct RosterFile {
    players: Vec<Player>,
    #[serde(default)]
    fixed_pairs: Vec<(String, String)>,
}

/// Ordered player list with fixed pairs, validated on construction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
    fixed_pairs: FixedPairs,
}

impl Roster {
    /// Build a roster, trimming names and rejecting duplicates
    /// (case-insensitive) and malformed fixed pairs.
    pub fn new(players: Vec<Player>, fixed_pairs: Vec<(String, String)>) -> Result<Self, RosterError> {
        let mut seen = FxHashSet::default();
        let mut cleaned = Vec::with_capacity(players.len());

        for mut player in players {
            player.name = player.name.trim().to_string();
            if player.name.is_empty() {
                return Err(RosterError::EmptyName);
            }
            if !seen.insert(player.name.to_lowercase()) {
                return Err(RosterError::DuplicateName(player.name));
            }
            cleaned.push(player);
        }

        let mut pairs = FixedPairs::default();
        for (a, b) in fixed_pairs {
            let (a, b) = (a.trim().to_string(), b.trim().to_string());
            for name in [&a, &b] {
                if !cleaned.iter().any(|p| &p.name == name) {
                    return Err(RosterError::UnknownPlayer(name.clone()));
                }
            }
            pairs.insert(a, b)?;
        }

        Ok(Self {
            players: cleaned,
            fixed_pairs: pairs,
        })
    }

    /// Active roster of the given names, no fixed pairs
    pub fn from_names<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let players = names.into_iter().map(Player::new).collect();
        Self::new(players, Vec::new())
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let file: RosterFile = serde_json::from_str(content)?;
        Ok(Self::new(file.players, file.fixed_pairs)?)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        let file = RosterFile {
            players: self.players.clone(),
            fixed_pairs: self
                .fixed_pairs
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn fixed_pairs(&self) -> &FixedPairs {
        &self.fixed_pairs
    }

    /// Names of active players in roster order
    pub fn active_names(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|p| p.active)
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.active).count()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.player(name).map_or(false, |p| p.active)
    }

    /// Turn order of a player (0 when unknown)
    pub fn turn_order(&self, name: &str) -> u64 {
        self.player(name).map_or(0, |p| p.turn_order)
    }

    /// Fixed pairs whose two members are both active
    pub fn active_fixed_pairs(&self) -> Vec<(String, String)> {
        self.fixed_pairs
            .iter()
            .filter(|(a, b)| self.is_active(a) && self.is_active(b))
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }
}
