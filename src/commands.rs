use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ising_sim::{AverageResult, InitialState, SimConfig};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::info;

use crate::run_info::RunInfo;
use crate::sweep;
use crate::{store, AverageArgs, StoreArgs, TrajectoryArgs};

/// Final lattices for every (temperature, replicate) pair, stored as one table.
///
/// Temperatures are rounded to one decimal before the runs, matching the row
/// labels of the table; a step finer than that is collapsed so every label
/// stays unique. Returns the path of the CSV file.
pub fn store(out: &Path, args: &StoreArgs, show_progress: bool) -> Result<PathBuf> {
    let temperatures = sweep::tenth_ladder(&sweep::temperature_range(
        args.temps.t_start,
        args.temps.t_stop,
        args.temps.t_step,
    )?);
    let configs = configs_for(&temperatures, args.steps, args.size, args.initial)?;
    prepare_out_dir(out)?;

    let jobs = sweep::jobs(&temperatures, args.replicas, args.seed, 1);
    info!(
        size = args.size,
        steps = args.steps,
        n_temps = temperatures.len(),
        replicas = args.replicas,
        "storing final lattices"
    );

    let snapshots = sweep::run_jobs(&jobs, args.sequential, show_progress, "lattices", |job| {
        let cfg = &configs[job.temp_index];
        let mut rng = Xoshiro256StarStar::seed_from_u64(job.seed);
        let lattice = ising_sim::run_final(cfg, &mut rng)?;
        Ok(lattice.snapshot(job.temperature, job.replica))
    })?;

    let file_name = store::snapshot_file_name(args.size, args.steps);
    let path = out.join(&file_name);
    store::write_snapshots(&path, args.size, &snapshots)
        .with_context(|| format!("writing {}", path.display()))?;

    let mut run_info = RunInfo::new("store", args.size, args.steps, args.seed);
    run_info.temperatures = temperatures;
    run_info.replicas = Some(args.replicas);
    run_info.initial_state = args.initial.to_string();
    run_info.sequential = args.sequential;
    run_info.outputs.push(file_name);
    run_info
        .write_to_dir(out)
        .context("writing config.json")?;

    info!(path = %path.display(), rows = snapshots.len(), "wrote lattice snapshots");
    Ok(path)
}

/// One run with the full per-step trajectory. Returns the path of the CSV file.
pub fn trajectory(out: &Path, args: &TrajectoryArgs) -> Result<PathBuf> {
    let cfg = SimConfig::new(args.steps, args.size, args.temperature)
        .with_initial(args.initial)
        .with_tracking(args.tracking);
    cfg.check()?;
    prepare_out_dir(out)?;

    info!(
        size = args.size,
        steps = args.steps,
        temperature = args.temperature,
        tracking = %args.tracking,
        "recording trajectory"
    );
    let mut rng = Xoshiro256StarStar::seed_from_u64(args.seed);
    let traj = ising_sim::run_trajectory(&cfg, &mut rng)?;

    let path = out.join("trajectory.csv");
    store::write_trajectory(&path, &traj)
        .with_context(|| format!("writing {}", path.display()))?;

    let mut run_info = RunInfo::new("trajectory", args.size, args.steps, args.seed);
    run_info.temperatures = vec![args.temperature];
    run_info.initial_state = args.initial.to_string();
    run_info.tracking = Some(args.tracking.to_string());
    run_info.outputs.push("trajectory.csv".to_string());
    run_info
        .write_to_dir(out)
        .context("writing config.json")?;

    if let Some(last) = traj.last() {
        info!(
            energy_per_site = last.energy,
            magnetization_per_site = last.magnetization,
            path = %path.display(),
            "wrote trajectory"
        );
    }
    Ok(path)
}

/// Sign-split averages for every temperature of the range. Returns the averages
/// in temperature order.
pub fn average(out: &Path, args: &AverageArgs, show_progress: bool) -> Result<Vec<AverageResult>> {
    let temperatures =
        sweep::temperature_range(args.temps.t_start, args.temps.t_stop, args.temps.t_step)?;
    if args.runs == 0 {
        return Err(ising_sim::SimError::EmptyAverage.into());
    }
    let configs = configs_for(&temperatures, args.steps, args.size, args.initial)?;
    prepare_out_dir(out)?;

    // One job per temperature; each consumes `runs` consecutive seeds.
    let jobs = sweep::jobs(&temperatures, 1, args.seed, args.runs as u64);
    info!(
        size = args.size,
        steps = args.steps,
        n_temps = temperatures.len(),
        runs = args.runs,
        "averaging final observables"
    );

    let averages = sweep::run_jobs(&jobs, args.sequential, show_progress, "temperatures", |job| {
        let cfg = &configs[job.temp_index];
        ising_sim::average(args.runs, cfg, job.seed)
    })?;

    let n2 = (args.size * args.size) as f64;
    for avg in &averages {
        info!(
            temperature = avg.temperature,
            energy_per_site = avg.energy / n2,
            magnetization_pos = ?avg.magnetization_pos.map(|m| m / n2),
            magnetization_neg = ?avg.magnetization_neg.map(|m| m / n2),
            n_pos = avg.n_pos,
            n_neg = avg.n_neg,
            "average"
        );
    }

    let path = out.join("averages.csv");
    store::write_averages(&path, &averages)
        .with_context(|| format!("writing {}", path.display()))?;

    let mut run_info = RunInfo::new("average", args.size, args.steps, args.seed);
    run_info.temperatures = temperatures;
    run_info.runs = Some(args.runs);
    run_info.initial_state = args.initial.to_string();
    run_info.sequential = args.sequential;
    run_info.outputs.push("averages.csv".to_string());
    run_info
        .write_to_dir(out)
        .context("writing config.json")?;

    Ok(averages)
}

/// Validate one config per temperature before any job starts.
fn configs_for(
    temperatures: &[f64],
    steps: usize,
    size: usize,
    initial: InitialState,
) -> Result<Vec<SimConfig>> {
    temperatures
        .iter()
        .map(|&t| {
            let cfg = SimConfig::new(steps, size, t).with_initial(initial);
            cfg.check()
                .with_context(|| format!("invalid run at temperature {t}"))?;
            Ok(cfg)
        })
        .collect()
}

fn prepare_out_dir(out: &Path) -> Result<()> {
    create_dir_all(out).with_context(|| format!("creating output directory {}", out.display()))
}
