//! Scheduler session - round history, commit discipline and drift handling
//!
//! Level 1 - Orchestration
//!
//! The latest round stays pending until the next one is requested (or it
//! is committed explicitly). Regenerating a pending round therefore always
//! reads the state as it was before that round.

use courtmix_core::{
    resolve_courts, FairnessState, Roster, Round, ScheduleError, SchedulerConfig, Side,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::commit::commit_round;
use crate::edit::{self, EditError, Slot};
use crate::generate::generate_round;

/// What `update_setup` did with a new roster or court request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupChange {
    Unchanged,
    /// Players or fixed pairs changed; state carried forward
    Reconciled,
    /// Court count changed; history discarded
    Reset,
}

/// One scheduling session
pub struct Scheduler<R = ChaCha8Rng> {
    roster: Roster,
    config: SchedulerConfig,
    courts: usize,
    state: FairnessState,
    rounds: Vec<Round>,
    /// Rounds folded into `state`; at most one round is pending
    committed: usize,
    rng: R,
}

impl Scheduler<ChaCha8Rng> {
    /// Create a session seeded from `config.seed` (entropy when unset)
    pub fn new(roster: Roster, config: SchedulerConfig) -> Result<Self, ScheduleError> {
        let rng = config.rng();
        Self::with_rng(roster, config, rng)
    }
}

impl<R: Rng> Scheduler<R> {
    /// Create a session drawing randomness from `rng`
    pub fn with_rng(roster: Roster, config: SchedulerConfig, rng: R) -> Result<Self, ScheduleError> {
        let courts = resolve_courts(config.courts, roster.active_count())?;
        let state = FairnessState::new(&roster.active_names());

        tracing::info!(
            "Scheduler: {} active players, {} courts",
            roster.active_count(),
            courts
        );

        Ok(Self {
            roster,
            config,
            courts,
            state,
            rounds: Vec::new(),
            committed: 0,
            rng,
        })
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// Commit the pending round, then generate and append the next one
    pub fn next_round(&mut self) -> Result<&Round, ScheduleError> {
        self.commit_pending();

        let index = self.rounds.len() as u32 + 1;
        let round = self.generate(index)?;
        self.rounds.push(round);
        Ok(&self.rounds[self.rounds.len() - 1])
    }

    /// Replace the pending round with a fresh one of the same index.
    ///
    /// With nothing pending this is `next_round`.
    pub fn regenerate_round(&mut self) -> Result<&Round, ScheduleError> {
        if self.pending_round().is_none() {
            return self.next_round();
        }

        let index = self.rounds.len() as u32;
        let round = self.generate(index)?;
        let pending = self.committed;
        self.rounds[pending] = round;
        Ok(&self.rounds[pending])
    }

    /// Fold the pending round into the fairness state.
    ///
    /// Returns false when nothing was pending.
    pub fn commit_pending(&mut self) -> bool {
        let Some(round) = self.rounds.get(self.committed) else {
            return false;
        };
        commit_round(&mut self.state, round);
        self.committed += 1;

        if self.config.recycle_partners
            && self
                .state
                .partner_history_exhausted(&self.roster.active_names())
        {
            tracing::info!(
                "Every pair has partnered after round {}; starting a new partner cycle",
                self.committed
            );
            self.state.clear_partner_history();
        }
        true
    }

    fn generate(&mut self, index: u32) -> Result<Round, ScheduleError> {
        generate_round(
            &self.roster,
            self.courts,
            index,
            &self.state,
            self.config.search_budget,
            &mut self.rng,
        )
    }

    // ========================================================================
    // Setup changes
    // ========================================================================

    /// Apply a possibly changed roster and court request.
    ///
    /// A different court count discards all history. A different roster or
    /// set of fixed pairs reconciles the state and regenerates the pending
    /// round. Invalid setups are rejected before anything changes.
    pub fn update_setup(
        &mut self,
        roster: Roster,
        requested_courts: Option<usize>,
    ) -> Result<SetupChange, ScheduleError> {
        let courts = resolve_courts(requested_courts, roster.active_count())?;
        self.config.courts = requested_courts;

        if courts != self.courts {
            tracing::warn!(
                "Court count changed {} -> {}; resetting schedule",
                self.courts,
                courts
            );
            self.roster = roster;
            self.courts = courts;
            self.reset();
            return Ok(SetupChange::Reset);
        }

        if roster == self.roster {
            return Ok(SetupChange::Unchanged);
        }

        self.roster = roster;
        self.state.reconcile(&self.roster.active_names());
        tracing::info!(
            "Roster changed: {} active players, {} fixed pairs",
            self.roster.active_count(),
            self.roster.fixed_pairs().len()
        );

        if self.pending_round().is_some() {
            self.regenerate_round()?;
        }
        Ok(SetupChange::Reconciled)
    }

    /// Discard all rounds and fairness history
    pub fn reset(&mut self) {
        self.state = FairnessState::new(&self.roster.active_names());
        self.rounds.clear();
        self.committed = 0;
    }

    // ========================================================================
    // Manual edits (latest round only)
    // ========================================================================

    /// Move a resting player into a slot of the latest round.
    ///
    /// Returns the displaced player. If the latest round was already
    /// committed, the two players' rest and played counts are shifted.
    pub fn move_resting_player(&mut self, player: &str, slot: Slot) -> Result<String, EditError> {
        let latest = self.rounds.len().checked_sub(1).ok_or(EditError::NoRound)?;
        let displaced =
            edit::move_resting_into_slot(&mut self.rounds[latest], player, slot, &self.state)?;

        if latest < self.committed {
            self.state.shift_rest_to_played(player);
            self.state.shift_played_to_rest(&displaced);
        }
        Ok(displaced)
    }

    /// Swap two partnerships between different games of the latest round
    pub fn swap_partnerships(
        &mut self,
        first: (usize, Side),
        second: (usize, Side),
    ) -> Result<(), EditError> {
        let round = self.rounds.last_mut().ok_or(EditError::NoRound)?;
        edit::swap_partnerships(round, first, second)
    }

    /// Swap the players in two slots of the latest round
    pub fn swap_players(&mut self, first: Slot, second: Slot) -> Result<(), EditError> {
        let round = self.rounds.last_mut().ok_or(EditError::NoRound)?;
        edit::swap_players(round, first, second)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &FairnessState {
        &self.state
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn latest_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// The generated round not yet folded into the state
    pub fn pending_round(&self) -> Option<&Round> {
        self.rounds.get(self.committed)
    }

    pub fn committed_rounds(&self) -> usize {
        self.committed
    }

    pub fn courts(&self) -> usize {
        self.courts
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
