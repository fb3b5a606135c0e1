use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::debug;

use crate::config::{check_temperature, ObservableTracking, SimConfig};
use crate::error::SimError;
use crate::geometry::Lattice;
use crate::mcmc;
use crate::statistics::{AverageResult, Statistics, Trajectory};

/// Build a lattice from `config` and run `config.steps` trials on it.
///
/// Only the final state is kept; no observables are recorded along the way.
pub fn run_final(config: &SimConfig, rng: &mut Xoshiro256StarStar) -> Result<Lattice, SimError> {
    config.check()?;
    let mut lattice = config.initial.build(config.size, rng)?;
    let accepted = mcmc::evolve(&mut lattice, config.steps, config.temperature, rng);
    debug!(
        size = config.size,
        steps = config.steps,
        temperature = config.temperature,
        accepted,
        "final-state run finished"
    );
    Ok(lattice)
}

/// Build a lattice from `config` and record its observables after every trial.
pub fn run_trajectory(
    config: &SimConfig,
    rng: &mut Xoshiro256StarStar,
) -> Result<Trajectory, SimError> {
    config.check()?;
    let mut lattice = config.initial.build(config.size, rng)?;
    record_trajectory(
        &mut lattice,
        config.steps,
        config.temperature,
        config.tracking,
        rng,
    )
}

/// Run `steps` trials on an existing lattice, recording per-site observables.
///
/// The initial state is recorded first, then one entry per trial: fresh
/// observables after an accepted flip, a copy of the previous entry after a
/// rejected one. The result always holds `steps + 1` entries.
pub fn record_trajectory(
    lattice: &mut Lattice,
    steps: usize,
    temperature: f64,
    tracking: ObservableTracking,
    rng: &mut Xoshiro256StarStar,
) -> Result<Trajectory, SimError> {
    check_temperature(temperature)?;

    let mut current = lattice.observables();
    let mut totals = Vec::with_capacity(steps + 1);
    totals.push(current);

    let mut accepted = 0usize;
    for _ in 0..steps {
        let trial = mcmc::metropolis_trial(lattice, temperature, rng);
        if trial.accepted {
            accepted += 1;
            current = match tracking {
                ObservableTracking::Recompute => lattice.observables(),
                ObservableTracking::Incremental => {
                    let s_new = lattice.spin(trial.row, trial.col) as f64;
                    current.shifted(trial.delta_e, 2.0 * s_new)
                }
            };
        }
        totals.push(current);
    }

    debug!(
        size = lattice.size(),
        steps,
        temperature,
        accepted,
        ?tracking,
        "trajectory run finished"
    );
    Ok(Trajectory::from_totals(&totals, lattice.n_spins()))
}

/// Average final-state observables over `runs` independent runs.
///
/// Run `r` gets a fresh lattice and its own PRNG seeded with `base_seed + r`.
/// Energies are averaged over every run; final magnetizations are averaged
/// separately over the strictly positive and strictly negative runs.
pub fn average(runs: usize, config: &SimConfig, base_seed: u64) -> Result<AverageResult, SimError> {
    if runs == 0 {
        return Err(SimError::EmptyAverage);
    }
    config.check()?;

    let mut energy_stat = Statistics::new(1);
    let mut energy2_stat = Statistics::new(2);
    let mut mag_pos_stat = Statistics::new(1);
    let mut mag_neg_stat = Statistics::new(1);
    let mut n_zero = 0usize;

    for r in 0..runs {
        let mut rng = Xoshiro256StarStar::seed_from_u64(base_seed.wrapping_add(r as u64));
        let lattice = run_final(config, &mut rng)?;
        let obs = lattice.observables();

        energy_stat.update(obs.energy);
        energy2_stat.update(obs.energy);
        if obs.magnetization > 0.0 {
            mag_pos_stat.update(obs.magnetization);
        } else if obs.magnetization < 0.0 {
            mag_neg_stat.update(obs.magnetization);
        } else {
            n_zero += 1;
        }
    }

    let result = AverageResult {
        temperature: config.temperature,
        n_runs: runs,
        energy: energy_stat.average().ok_or(SimError::EmptyAverage)?,
        energy2: energy2_stat.average().ok_or(SimError::EmptyAverage)?,
        magnetization_pos: mag_pos_stat.average(),
        magnetization_neg: mag_neg_stat.average(),
        n_pos: mag_pos_stat.count,
        n_neg: mag_neg_stat.count,
        n_zero,
    };
    debug!(
        temperature = config.temperature,
        runs,
        energy = result.energy,
        n_pos = result.n_pos,
        n_neg = result.n_neg,
        "average finished"
    );
    Ok(result)
}
