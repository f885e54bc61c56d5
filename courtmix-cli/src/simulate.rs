//! Simulate command - fairness statistics over many synthetic sessions
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: synthetic_roster(), run_sessions(), report_results()
//! - Level 3: run_session(), count_split_pairs()
//! - Level 4: seed and formatting utilities

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use rayon::prelude::*;

use courtmix_core::{Player, Roster, Round, SchedulerConfig, DEFAULT_SEARCH_BUDGET};
use courtmix_schedule::Scheduler;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of active players
    #[arg(long, default_value = "10")]
    pub players: usize,

    /// Courts to fill (default: as many as the roster supports)
    #[arg(long)]
    pub courts: Option<usize>,

    /// Rounds per session
    #[arg(long, default_value = "12")]
    pub rounds: usize,

    /// Independent sessions to run in parallel
    #[arg(long, default_value = "8")]
    pub sessions: usize,

    /// Fixed pairs among the players (Player 1 & 2, Player 3 & 4, ...)
    #[arg(long, default_value = "0")]
    pub fixed_pairs: usize,

    /// Maximum partner search placements per candidate pool
    #[arg(long, default_value_t = DEFAULT_SEARCH_BUDGET)]
    pub search_budget: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Statistics for one simulated session
#[derive(Clone, Debug, serde::Serialize)]
struct SessionReport {
    seed: u64,
    /// Share of all possible pairs that have partnered
    partner_coverage: f32,
    /// Max minus min games played
    played_spread: u32,
    /// Max minus min rests
    rest_spread: u32,
    /// Rounds that could not fill every court
    degraded_rounds: usize,
    /// Fixed pairs seen split across the schedule (expected 0)
    split_pairs: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Build a synthetic roster
/// 2. Run every session in parallel
/// 3. Report per-session and aggregate statistics
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let roster = synthetic_roster(args.players, args.fixed_pairs)?;

    tracing::info!(
        "Simulating {} sessions: {} players, {} fixed pairs, {} rounds",
        args.sessions,
        args.players,
        args.fixed_pairs,
        args.rounds
    );

    let reports = run_sessions(&roster, &args, seed)?;

    report_results(&reports, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Roster of `players` named players, the first `fixed_pairs` pairs fixed
fn synthetic_roster(players: usize, fixed_pairs: usize) -> Result<Roster> {
    if players == 0 {
        bail!("--players must be at least 1");
    }
    if fixed_pairs * 2 > players {
        bail!(
            "{} fixed pairs need {} players, only {} given",
            fixed_pairs,
            fixed_pairs * 2,
            players
        );
    }

    let roster_players = (1..=players)
        .map(|i| Player::new(format!("Player {}", i)))
        .collect();
    let pairs = (0..fixed_pairs)
        .map(|k| (format!("Player {}", 2 * k + 1), format!("Player {}", 2 * k + 2)))
        .collect();

    Roster::new(roster_players, pairs).context("Failed to build synthetic roster")
}

fn run_sessions(roster: &Roster, args: &SimulateArgs, seed: Option<u64>) -> Result<Vec<SessionReport>> {
    let seeds = session_seeds(seed, args.sessions);

    let pb = ProgressBar::new(seeds.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} sessions ({eta})")?);

    let reports = seeds
        .par_iter()
        .map(|&session_seed| {
            let report = run_session(roster, args, session_seed);
            pb.inc(1);
            report
        })
        .collect::<Result<Vec<_>>>();

    pb.finish_and_clear();
    reports
}

fn report_results(reports: &[SessionReport], args: &SimulateArgs) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(reports).context("Failed to serialize reports")?;
        println!("{}", json);
        return Ok(());
    }

    println!("\n=== Simulation Results ===");
    println!(
        "{:>20} {:>9} {:>7} {:>7} {:>9} {:>6}",
        "Seed", "Coverage", "Played", "Rested", "Degraded", "Split"
    );
    for r in reports {
        println!(
            "{:>20} {:>8.1}% {:>7} {:>7} {:>9} {:>6}",
            r.seed,
            r.partner_coverage * 100.0,
            r.played_spread,
            r.rest_spread,
            r.degraded_rounds,
            r.split_pairs
        );
    }

    if !reports.is_empty() {
        let n = reports.len() as f32;
        let coverage: f32 = reports.iter().map(|r| r.partner_coverage).sum::<f32>() / n;
        let worst_spread = reports.iter().map(|r| r.played_spread).max().unwrap_or(0);
        println!("\nMean partner coverage: {:.1}%", coverage * 100.0);
        println!("Worst played spread:   {}", worst_spread);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn run_session(roster: &Roster, args: &SimulateArgs, seed: u64) -> Result<SessionReport> {
    let mut config = SchedulerConfig::default()
        .with_seed(seed)
        .with_search_budget(args.search_budget);
    config.courts = args.courts;

    let mut scheduler = Scheduler::new(roster.clone(), config).context("Invalid simulation setup")?;
    for _ in 0..args.rounds {
        scheduler.next_round()?;
    }
    scheduler.commit_pending();

    let names = roster.active_names();
    let standings = scheduler.state().standings(&names);
    let played: Vec<u32> = standings.iter().map(|s| s.played).collect();
    let rested: Vec<u32> = standings.iter().map(|s| s.rested).collect();
    let possible = names.len() * names.len().saturating_sub(1) / 2;

    Ok(SessionReport {
        seed,
        partner_coverage: if possible > 0 {
            scheduler.state().pair_history_len() as f32 / possible as f32
        } else {
            0.0
        },
        played_spread: spread(&played),
        rest_spread: spread(&rested),
        degraded_rounds: scheduler.rounds().iter().filter(|r| r.is_degraded()).count(),
        split_pairs: scheduler
            .rounds()
            .iter()
            .map(|r| count_split_pairs(roster, r))
            .sum(),
    })
}

/// Fixed pairs where both play in `round` but not as partners
fn count_split_pairs(roster: &Roster, round: &Round) -> usize {
    roster
        .active_fixed_pairs()
        .iter()
        .filter(|(a, b)| {
            let both_play = !round.is_resting(a) && !round.is_resting(b);
            both_play && !round.partnerships().any(|p| p.contains(a) && p.contains(b))
        })
        .count()
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// One seed per session, drawn from the session-level seed
fn session_seeds(seed: Option<u64>, sessions: usize) -> Vec<u64> {
    let mut config = SchedulerConfig::default();
    config.seed = seed;
    let mut rng = config.rng();
    (0..sessions).map(|_| rng.gen()).collect()
}

fn spread(values: &[u32]) -> u32 {
    match (values.iter().max(), values.iter().min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(players: usize, fixed_pairs: usize, rounds: usize) -> SimulateArgs {
        SimulateArgs {
            players,
            courts: None,
            rounds,
            sessions: 3,
            fixed_pairs,
            search_budget: DEFAULT_SEARCH_BUDGET,
            json: false,
        }
    }

    #[test]
    fn test_synthetic_roster_pairs() {
        let roster = synthetic_roster(6, 2).unwrap();
        assert_eq!(roster.active_count(), 6);
        assert_eq!(roster.fixed_pairs().partner("Player 1"), Some("Player 2"));
        assert_eq!(roster.fixed_pairs().partner("Player 4"), Some("Player 3"));
        assert_eq!(roster.fixed_pairs().partner("Player 5"), None);
    }

    #[test]
    fn test_synthetic_roster_rejects_too_many_pairs() {
        assert!(synthetic_roster(5, 3).is_err());
        assert!(synthetic_roster(0, 0).is_err());
    }

    #[test]
    fn test_eight_players_cover_every_pair() {
        let roster = synthetic_roster(8, 0).unwrap();
        let report = run_session(&roster, &args(8, 0, 10), 42).unwrap();

        assert!((report.partner_coverage - 1.0).abs() < 1e-6);
        assert_eq!(report.played_spread, 0);
        assert_eq!(report.degraded_rounds, 0);
    }

    #[test]
    fn test_fixed_pairs_never_split() {
        let roster = synthetic_roster(11, 3).unwrap();
        let report = run_session(&roster, &args(11, 3, 10), 5).unwrap();
        assert_eq!(report.split_pairs, 0);
    }

    #[test]
    fn test_sessions_are_reproducible() {
        let roster = synthetic_roster(10, 1).unwrap();
        let a = run_sessions(&roster, &args(10, 1, 6), Some(7)).unwrap();
        let b = run_sessions(&roster, &args(10, 1, 6), Some(7)).unwrap();

        assert_eq!(a.len(), 3);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.seed, y.seed);
            assert_eq!(x.played_spread, y.played_spread);
            assert_eq!(x.partner_coverage, y.partner_coverage);
        }
    }

    #[test]
    fn test_session_seeds_follow_seed() {
        assert_eq!(session_seeds(Some(3), 4), session_seeds(Some(3), 4));
        assert_ne!(session_seeds(Some(3), 4), session_seeds(Some(4), 4));
        assert_eq!(session_seeds(None, 5).len(), 5);
    }

    #[test]
    fn test_spread() {
        assert_eq!(spread(&[3, 5, 4]), 2);
        assert_eq!(spread(&[]), 0);
    }
}
