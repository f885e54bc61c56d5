//! Courtmix CLI - Command-line interface
//!
//! Commands:
//! - schedule: Generate rounds for a roster file
//! - simulate: Run many synthetic sessions and report fairness statistics

mod schedule_cmd;
mod simulate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "courtmix")]
#[command(about = "Fairness-aware doubles court scheduler")]
struct Cli {
    /// Random seed for reproducible schedules
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate rounds for a roster
    Schedule(schedule_cmd::ScheduleArgs),
    /// Simulate sessions with a synthetic roster
    Simulate(simulate::SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schedule(args) => schedule_cmd::run(args, cli.seed),
        Commands::Simulate(args) => simulate::run(args, cli.seed),
    }
}
