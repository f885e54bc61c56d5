//! Configuration types for a scheduling session
//!
//! Level 4 - Utilities and configuration

use crate::error::ScheduleError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Players on one court (two partnerships of two)
pub const PLAYERS_PER_COURT: usize = 4;

/// Default cap on pair placements explored per candidate pool
pub const DEFAULT_SEARCH_BUDGET: usize = 200_000;

/// Scheduler configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Requested courts (None = as many as the roster fills)
    pub courts: Option<usize>,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Maximum pair placements the partner search explores per pool
    pub search_budget: usize,
    /// Clear partnership history once every pair has partnered
    pub recycle_partners: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            courts: None,
            seed: None,
            search_budget: DEFAULT_SEARCH_BUDGET,
            recycle_partners: false,
        }
    }
}

impl SchedulerConfig {
    /// Create config requesting the given number of courts
    pub fn with_courts(mut self, courts: usize) -> Self {
        self.courts = Some(courts);
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the partner search budget
    pub fn with_search_budget(mut self, budget: usize) -> Self {
        self.search_budget = budget;
        self
    }

    /// Enable partner-cycle recycling
    pub fn with_recycle_partners(mut self, recycle: bool) -> Self {
        self.recycle_partners = recycle;
        self
    }

    /// Create RNG from seed or random
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// Resolve the court count for `active_players`.
///
/// The automatic count is `active_players / 4` (at least 1); a request is
/// capped to it. An explicit request of zero is an error.
pub fn resolve_courts(requested: Option<usize>, active_players: usize) -> Result<usize, ScheduleError> {
    if active_players == 0 {
        return Err(ScheduleError::NoActivePlayers);
    }
    let auto = (active_players / PLAYERS_PER_COURT).max(1);
    let courts = requested.map_or(auto, |r| r.min(auto));
    if courts == 0 {
        return Err(ScheduleError::NoCourts);
    }
    Ok(courts)
}
