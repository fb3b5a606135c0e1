//! Batch driver for 2D Ising Metropolis runs.
//!
//! Wraps the `ising-sim` core with a command-line surface that sweeps
//! temperature ranges, fans independent runs out over a thread pool and
//! writes the results as CSV.
//!
//! ```bash
//! # 10 final 16x16 lattices per temperature in [1.0, 4.0), step 0.1
//! metrosim store --size 16 --steps 100000 --replicas 10
//!
//! # Per-step energy and magnetization of one run at T = 2.27
//! metrosim trajectory --size 32 --steps 200000 --temperature 2.27
//!
//! # Mean energy and sign-split magnetization over 50 runs per temperature
//! metrosim average --size 16 --steps 100000 --runs 50 --t-start 1.5 --t-stop 3.5
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ising_sim::{InitialState, ObservableTracking};

pub mod commands;
pub mod run_info;
pub mod store;
pub mod sweep;

/// Metropolis Monte Carlo for the 2D Ising model
#[derive(Parser, Debug)]
#[command(name = "metrosim")]
#[command(author, version, about = "Metropolis Monte Carlo for the 2D Ising model")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory run outputs are written to
    #[arg(long, global = true, default_value = "runs")]
    pub out: PathBuf,

    /// Hide the progress bar
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store final lattices for a range of temperatures in one CSV file
    Store(StoreArgs),

    /// Record per-step energy and magnetization of a single run
    Trajectory(TrajectoryArgs),

    /// Average final energy and sign-split magnetization over independent runs
    Average(AverageArgs),
}

/// Half-open temperature range `[t_start, t_stop)` walked in steps of `t_step`.
#[derive(Args, Debug, Clone)]
pub struct TemperatureRange {
    /// First temperature
    #[arg(long, default_value_t = 1.0)]
    pub t_start: f64,

    /// Upper bound (exclusive)
    #[arg(long, default_value_t = 4.0)]
    pub t_stop: f64,

    /// Spacing between temperatures
    #[arg(long, default_value_t = 0.1)]
    pub t_step: f64,
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Lattice side length
    #[arg(short = 'L', long, default_value_t = 16)]
    pub size: usize,

    /// Metropolis trials per run
    #[arg(short, long, default_value_t = 100_000)]
    pub steps: usize,

    #[command(flatten)]
    pub temps: TemperatureRange,

    /// Independent lattices per temperature
    #[arg(short = 'n', long, default_value_t = 10)]
    pub replicas: usize,

    /// Initial spins: random, up or down
    #[arg(long, default_value = "random", value_parser = parse_initial)]
    pub initial: InitialState,

    /// Base PRNG seed; job k uses `seed + k`
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Run jobs on the current thread
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TrajectoryArgs {
    /// Lattice side length
    #[arg(short = 'L', long, default_value_t = 16)]
    pub size: usize,

    /// Metropolis trials
    #[arg(short, long, default_value_t = 100_000)]
    pub steps: usize,

    /// Temperature in units of J/k
    #[arg(short, long)]
    pub temperature: f64,

    /// Observable update after an accepted flip: recompute or incremental
    #[arg(long, default_value = "recompute", value_parser = parse_tracking)]
    pub tracking: ObservableTracking,

    /// Initial spins: random, up or down
    #[arg(long, default_value = "random", value_parser = parse_initial)]
    pub initial: InitialState,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Args, Debug, Clone)]
pub struct AverageArgs {
    /// Lattice side length
    #[arg(short = 'L', long, default_value_t = 16)]
    pub size: usize,

    /// Metropolis trials per run
    #[arg(short, long, default_value_t = 100_000)]
    pub steps: usize,

    /// Independent runs per temperature
    #[arg(short, long, default_value_t = 20)]
    pub runs: usize,

    #[command(flatten)]
    pub temps: TemperatureRange,

    /// Initial spins: random, up or down
    #[arg(long, default_value = "random", value_parser = parse_initial)]
    pub initial: InitialState,

    /// Base PRNG seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Run temperatures on the current thread
    #[arg(long)]
    pub sequential: bool,
}

fn parse_initial(s: &str) -> Result<InitialState, String> {
    InitialState::try_from(s)
}

fn parse_tracking(s: &str) -> Result<ObservableTracking, String> {
    ObservableTracking::try_from(s)
}

/// Dispatch a parsed command line.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let show_progress = !cli.quiet;
    match cli.command {
        Commands::Store(args) => {
            commands::store(&cli.out, &args, show_progress)?;
        }
        Commands::Trajectory(args) => {
            commands::trajectory(&cli.out, &args)?;
        }
        Commands::Average(args) => {
            commands::average(&cli.out, &args, show_progress)?;
        }
    }
    Ok(())
}
