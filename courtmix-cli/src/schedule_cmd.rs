//! Schedule command - generate rounds for a roster file
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_scheduler(), play_rounds(), report_schedule()
//! - Level 3: print_round(), print_standings()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use courtmix_core::{PlayerStanding, Roster, Round, SchedulerConfig, DEFAULT_SEARCH_BUDGET};
use courtmix_schedule::Scheduler;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ScheduleArgs {
    /// Roster JSON file
    #[arg(long, value_name = "FILE")]
    pub roster: PathBuf,

    /// Courts to fill (default: as many as the roster supports)
    #[arg(long)]
    pub courts: Option<usize>,

    /// Number of rounds to generate
    #[arg(long, default_value = "8")]
    pub rounds: usize,

    /// Maximum partner search placements per candidate pool
    #[arg(long, default_value_t = DEFAULT_SEARCH_BUDGET)]
    pub search_budget: usize,

    /// Start a new partner cycle once every pair has played together
    #[arg(long)]
    pub recycle_partners: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run schedule command
///
/// 1. Load the roster and build a session
/// 2. Generate and commit the requested rounds
/// 3. Report rounds and standings
pub fn run(args: ScheduleArgs, seed: Option<u64>) -> Result<()> {
    let mut scheduler = build_scheduler(&args, seed)?;

    tracing::info!(
        "Scheduling {} rounds on {} courts for {} players",
        args.rounds,
        scheduler.courts(),
        scheduler.roster().active_count()
    );

    play_rounds(&mut scheduler, args.rounds)?;

    report_schedule(&scheduler, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_scheduler(args: &ScheduleArgs, seed: Option<u64>) -> Result<Scheduler> {
    let roster = Roster::load(&args.roster)
        .with_context(|| format!("Failed to load roster: {}", args.roster.display()))?;

    let mut config = SchedulerConfig::default()
        .with_search_budget(args.search_budget)
        .with_recycle_partners(args.recycle_partners);
    config.courts = args.courts;
    config.seed = seed;

    Scheduler::new(roster, config).context("Invalid schedule setup")
}

/// Generate `rounds` rounds and commit the last one too
fn play_rounds(scheduler: &mut Scheduler, rounds: usize) -> Result<()> {
    for _ in 0..rounds {
        scheduler
            .next_round()
            .context("Failed to generate round")?;
    }
    scheduler.commit_pending();
    Ok(())
}

fn report_schedule(scheduler: &Scheduler, args: &ScheduleArgs) -> Result<()> {
    let standings = scheduler
        .state()
        .standings(&scheduler.roster().active_names());

    if args.json {
        print_json(scheduler, &standings)
    } else {
        for round in scheduler.rounds() {
            print_round(round);
        }
        print_standings(&standings);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn print_round(round: &Round) {
    println!("\n=== Round {} ===", round.index);
    for game in &round.games {
        println!("  {}", game);
    }
    if !round.resting.is_empty() {
        println!("  Resting: {}", join(round.resting.iter()));
    }
    for shortfall in &round.shortfalls {
        println!("  Warning: {}", shortfall);
    }
}

fn print_standings(standings: &[PlayerStanding]) {
    println!("\n=== Standings ===");
    println!("{:<20} {:>6} {:>6} {:>9}", "Player", "Played", "Rested", "Fairness");
    for s in standings {
        println!(
            "{:<20} {:>6} {:>6} {:>9}",
            s.name, s.played, s.rested, s.fairness_score
        );
    }
}

fn print_json(scheduler: &Scheduler, standings: &[PlayerStanding]) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        courts: usize,
        rounds: &'a [Round],
        standings: &'a [PlayerStanding],
    }

    let output = JsonOutput {
        courts: scheduler.courts(),
        rounds: scheduler.rounds(),
        standings,
    };
    let json = serde_json::to_string_pretty(&output).context("Failed to serialize schedule")?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}
