//! Partner pairing - forming partnerships among free players
//!
//! Level 3 - Steps
//!
//! A depth-first search picks `required` disjoint pairs maximizing
//! `100 per never-played pair + opponent freshness`. Three candidate pools are
//! tried in order (new only, new then repeated, all pairs); if none yields a
//! complete assignment the free players are paired off greedily.

use courtmix_core::{FairnessState, Partnership};

/// Score for a pair that has never partnered before
pub const NEW_PAIR_BONUS: u32 = 100;

/// Most freshness a new pair can gain against one earlier pair
/// (two players, two rivals each)
const MAX_FRESHNESS_PER_PAIR: u32 = 4;

/// Candidate pools, tried in order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidatePool {
    /// Pairs that have never partnered
    NewOnly,
    /// Never-partnered pairs ahead of repeated ones
    NewThenRepeat,
    /// Every pair in generation order
    All,
}

impl CandidatePool {
    pub const ORDER: [CandidatePool; 3] = [
        CandidatePool::NewOnly,
        CandidatePool::NewThenRepeat,
        CandidatePool::All,
    ];

    fn select(self, candidates: &[Candidate]) -> Vec<Candidate> {
        match self {
            CandidatePool::NewOnly => candidates.iter().filter(|c| c.is_new).copied().collect(),
            CandidatePool::NewThenRepeat => {
                let mut pool: Vec<Candidate> = candidates.iter().filter(|c| c.is_new).copied().collect();
                pool.extend(candidates.iter().filter(|c| !c.is_new).copied());
                pool
            }
            CandidatePool::All => candidates.to_vec(),
        }
    }
}

/// How the partnerships were formed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairingMethod {
    /// Nothing was required
    NotNeeded,
    /// Best scored assignment from a candidate pool
    Search(CandidatePool),
    /// Consecutive free players, freshness ignored
    Greedy,
}

/// Result of partner pairing
#[derive(Clone, Debug)]
pub struct PairingOutcome {
    pub partnerships: Vec<Partnership>,
    pub method: PairingMethod,
    /// Score of the chosen assignment (search only)
    pub score: u32,
    /// Pair placements explored across all pools
    pub explored: usize,
}

/// A possible partnership, by index into the free player list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Candidate {
    a: usize,
    b: usize,
    is_new: bool,
}

// ============================================================================
// Level 3 - Entry point
// ============================================================================

/// Form `required` disjoint partnerships from `free_players`.
///
/// Returns fewer only when the free players cannot supply them.
pub fn form_partnerships(
    free_players: &[String],
    required: usize,
    state: &FairnessState,
    budget: usize,
) -> PairingOutcome {
    if required == 0 {
        return PairingOutcome {
            partnerships: Vec::new(),
            method: PairingMethod::NotNeeded,
            score: 0,
            explored: 0,
        };
    }

    let candidates = build_candidates(free_players, state);
    let met_once = met_once_matrix(free_players, state);
    let mut explored = 0;

    for pool in CandidatePool::ORDER {
        let pool_candidates = pool.select(&candidates);
        if pool_candidates.len() < required {
            continue;
        }

        let search = PairSearch::new(&pool_candidates, &met_once, free_players.len(), required, budget);
        let result = search.run();
        explored += result.explored;

        tracing::debug!(
            "Partner search {:?}: {} candidates, {} placements, best={:?}",
            pool,
            pool_candidates.len(),
            result.explored,
            result.best.as_ref().map(|(score, _)| *score)
        );

        if let Some((score, chosen)) = result.best {
            let partnerships = chosen
                .into_iter()
                .map(|i| {
                    let c = pool_candidates[i];
                    Partnership::new(free_players[c.a].clone(), free_players[c.b].clone())
                })
                .collect();
            return PairingOutcome {
                partnerships,
                method: PairingMethod::Search(pool),
                score,
                explored,
            };
        }
    }

    PairingOutcome {
        partnerships: greedy_pairs(free_players, required),
        method: PairingMethod::Greedy,
        score: 0,
        explored,
    }
}

// ============================================================================
// Level 4 - Search
// ============================================================================

struct SearchResult {
    best: Option<(u32, Vec<usize>)>,
    explored: usize,
}

/// Bounded depth-first search over one candidate pool.
///
/// Depth never exceeds `required`. `budget` caps pair placements; once it is
/// spent the best complete assignment so far is returned.
struct PairSearch<'a> {
    candidates: &'a [Candidate],
    met_once: &'a [Vec<bool>],
    required: usize,
    budget: usize,
    used: Vec<bool>,
    selected: Vec<usize>,
    best: Option<(u32, Vec<usize>)>,
    explored: usize,
    /// Upper bounds on what one more pair can add
    max_bonus: u32,
    max_freshness: u32,
}

impl<'a> PairSearch<'a> {
    fn new(
        candidates: &'a [Candidate],
        met_once: &'a [Vec<bool>],
        player_count: usize,
        required: usize,
        budget: usize,
    ) -> Self {
        let any_new = candidates.iter().any(|c| c.is_new);
        let any_met_once = met_once.iter().any(|row| row.iter().any(|&m| m));
        Self {
            candidates,
            met_once,
            required,
            budget,
            used: vec![false; player_count],
            selected: Vec::with_capacity(required),
            best: None,
            explored: 0,
            max_bonus: if any_new { NEW_PAIR_BONUS } else { 0 },
            max_freshness: if any_met_once { MAX_FRESHNESS_PER_PAIR } else { 0 },
        }
    }

    fn run(mut self) -> SearchResult {
        self.dfs(0, 0);
        SearchResult {
            best: self.best,
            explored: self.explored,
        }
    }

    fn dfs(&mut self, start: usize, score: u32) {
        if self.selected.len() == self.required {
            if self.best.as_ref().map_or(true, |(best, _)| score > *best) {
                self.best = Some((score, self.selected.clone()));
            }
            return;
        }
        if let Some((best, _)) = &self.best {
            if self.upper_bound(score) <= *best {
                return;
            }
        }

        let remaining = self.required - self.selected.len();
        for i in start..self.candidates.len() {
            if self.candidates.len() - i < remaining || self.explored >= self.budget {
                return;
            }
            let c = self.candidates[i];
            if self.used[c.a] || self.used[c.b] {
                continue;
            }

            self.explored += 1;
            let gain = if c.is_new { NEW_PAIR_BONUS } else { 0 } + self.freshness(c);

            self.used[c.a] = true;
            self.used[c.b] = true;
            self.selected.push(i);

            self.dfs(i + 1, score + gain);

            self.selected.pop();
            self.used[c.a] = false;
            self.used[c.b] = false;
        }
    }

    /// Opponent freshness of `c` against the pairs already selected: for
    /// each member, the number of an earlier pair's players met exactly once.
    fn freshness(&self, c: Candidate) -> u32 {
        self.selected
            .iter()
            .map(|&s| {
                let earlier = self.candidates[s];
                [c.a, c.b]
                    .iter()
                    .flat_map(|&p| [earlier.a, earlier.b].map(|q| self.met_once[p][q]))
                    .filter(|&met| met)
                    .count() as u32
            })
            .sum()
    }

    /// Best score any completion of the current branch could reach
    fn upper_bound(&self, score: u32) -> u32 {
        let done = self.selected.len() as u32;
        let remaining = self.required as u32 - done;
        let earlier_pairs: u32 = (0..remaining).map(|j| done + j).sum();
        score + remaining * self.max_bonus + earlier_pairs * self.max_freshness
    }
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

/// Every pair of free players, flagged new when never partnered
fn build_candidates(players: &[String], state: &FairnessState) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(players.len() * players.len().saturating_sub(1) / 2);
    for a in 0..players.len() {
        for b in (a + 1)..players.len() {
            candidates.push(Candidate {
                a,
                b,
                is_new: !state.has_partnered(&players[a], &players[b]),
            });
        }
    }
    candidates
}

/// `m[i][j]` is true when players i and j have been opponents exactly once
fn met_once_matrix(players: &[String], state: &FairnessState) -> Vec<Vec<bool>> {
    players
        .iter()
        .map(|a| {
            players
                .iter()
                .map(|b| a != b && state.encounters(a, b) == 1)
                .collect()
        })
        .collect()
}

/// Pair consecutive players until `required` pairs exist
fn greedy_pairs(players: &[String], required: usize) -> Vec<Partnership> {
    players
        .chunks_exact(2)
        .take(required)
        .map(|pair| Partnership::new(pair[0].clone(), pair[1].clone()))
        .collect()
}
