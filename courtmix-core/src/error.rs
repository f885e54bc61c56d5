//! Error types shared across the scheduler crates

/// Rejections raised while building a roster
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("Player name cannot be empty")]
    EmptyName,

    #[error("Duplicate player name: {0}")]
    DuplicateName(String),

    #[error("Fixed pair references unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Player cannot be paired with themself: {0}")]
    SelfPair(String),

    #[error("Player already belongs to a fixed pair: {0}")]
    AlreadyPaired(String),
}

/// Configuration problems detected before a round is generated.
///
/// These are reported before any state mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("No active players to schedule")]
    NoActivePlayers,

    #[error("Court count resolved to zero")]
    NoCourts,
}
