use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use ising_sim::SimError;
use rayon::prelude::*;
use tracing::warn;

/// Upper bound on the number of temperatures one sweep may hold.
pub const MAX_TEMPERATURES: usize = 100_000;

/// One independent unit of work: a temperature, a replicate index and the
/// seed of the PRNG that job owns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Job {
    /// Position of `temperature` in the swept range.
    pub temp_index: usize,
    pub temperature: f64,
    pub replica: usize,
    pub seed: u64,
}

/// Temperatures `start, start + step, ...` strictly below `stop`.
pub fn temperature_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        bail!("temperature step must be positive, got {step}");
    }
    if !(start.is_finite() && stop.is_finite()) {
        bail!("temperature range [{start}, {stop}) is not finite");
    }
    // Slack keeps `stop` itself out when (stop - start) / step lands a hair above an integer.
    let n = ((stop - start) / step - 1e-9).ceil().max(0.0);
    if n > MAX_TEMPERATURES as f64 {
        bail!(
            "temperature range [{start}, {stop}) with step {step} exceeds {MAX_TEMPERATURES} temperatures"
        );
    }
    let n = n as usize;
    Ok((0..n).map(|k| start + k as f64 * step).collect())
}

/// Round an ascending ladder to one decimal and drop the repeats this creates.
pub fn tenth_ladder(temperatures: &[f64]) -> Vec<f64> {
    let mut rounded: Vec<f64> = temperatures.iter().copied().map(round_to_tenth).collect();
    rounded.dedup();
    if rounded.len() < temperatures.len() {
        warn!(
            requested = temperatures.len(),
            kept = rounded.len(),
            "temperatures collapsed after rounding to one decimal"
        );
    }
    rounded
}

/// Round to one decimal, the precision snapshot rows are keyed by.
pub fn round_to_tenth(t: f64) -> f64 {
    (t * 10.0).round() / 10.0
}

/// Expand temperatures × replicates into jobs, temperature-major.
///
/// Job `k` is seeded with `base_seed + k * seeds_per_job`, so jobs that draw
/// several consecutive seeds internally never overlap.
pub fn jobs(temperatures: &[f64], replicas: usize, base_seed: u64, seeds_per_job: u64) -> Vec<Job> {
    temperatures
        .iter()
        .enumerate()
        .flat_map(|(temp_index, &temperature)| {
            (0..replicas).map(move |replica| (temp_index, temperature, replica))
        })
        .enumerate()
        .map(|(k, (temp_index, temperature, replica))| Job {
            temp_index,
            temperature,
            replica,
            seed: base_seed.wrapping_add((k as u64).wrapping_mul(seeds_per_job)),
        })
        .collect()
}

/// Run `work` over every job, in parallel unless `sequential` is set.
///
/// Each job owns its own lattice and PRNG, so results do not depend on
/// scheduling. Output order matches `jobs`; the first error wins.
pub fn run_jobs<T, F>(
    jobs: &[Job],
    sequential: bool,
    show_progress: bool,
    message: &'static str,
    work: F,
) -> Result<Vec<T>, SimError>
where
    T: Send,
    F: Fn(&Job) -> Result<T, SimError> + Send + Sync,
{
    let pb = progress_bar(jobs.len() as u64, message, show_progress);
    let run = |job: &Job| {
        let out = work(job);
        pb.inc(1);
        out
    };

    let results: Vec<Result<T, SimError>> = if sequential {
        jobs.iter().map(run).collect()
    } else {
        jobs.par_iter().map(run).collect()
    };
    pb.finish();

    results.into_iter().collect()
}

fn progress_bar(len: u64, message: &'static str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    pb.set_message(message);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use ising_sim::{run_final, LatticeSnapshot, SimConfig};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_temperature_range_is_half_open() {
        let temps: Vec<f64> = temperature_range(1.0, 1.5, 0.1)
            .unwrap()
            .into_iter()
            .map(round_to_tenth)
            .collect();
        assert_eq!(temps, vec![1.0, 1.1, 1.2, 1.3, 1.4]);
        assert!(temperature_range(2.0, 1.0, 0.1).unwrap().is_empty());
    }

    #[test]
    fn test_temperature_range_rejects_bad_step() {
        assert!(temperature_range(1.0, 2.0, 0.0).is_err());
        assert!(temperature_range(1.0, 2.0, -0.1).is_err());
        assert!(temperature_range(1.0, f64::INFINITY, 0.1).is_err());
    }

    #[test]
    fn test_temperature_range_rejects_huge_count() {
        let err = temperature_range(1.0, 4.0, 1e-300).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
        assert!(temperature_range(0.0, 1.0, 1.0 / MAX_TEMPERATURES as f64 * 2.0).is_ok());
    }

    #[test]
    fn test_tenth_ladder_drops_duplicates() {
        let temps = temperature_range(1.0, 1.3, 0.05).unwrap();
        assert_eq!(temps.len(), 6);
        assert_eq!(tenth_ladder(&temps), vec![1.0, 1.1, 1.2, 1.3]);
        assert_eq!(tenth_ladder(&[1.0, 1.5, 2.0]), vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(2.2999999), 2.3);
        assert_eq!(round_to_tenth(1.04), 1.0);
    }

    #[test]
    fn test_jobs_are_temperature_major_with_distinct_seeds() {
        let jobs = jobs(&[1.0, 2.0], 3, 10, 5);
        assert_eq!(jobs.len(), 6);
        assert_eq!(
            jobs[4],
            Job {
                temp_index: 1,
                temperature: 2.0,
                replica: 1,
                seed: 30
            }
        );
        let seeds: Vec<u64> = jobs.iter().map(|j| j.seed).collect();
        assert_eq!(seeds, vec![10, 15, 20, 25, 30, 35]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let jobs = jobs(&[1.5, 2.5, 3.5], 4, 7, 1);
        let work = |job: &Job| -> Result<LatticeSnapshot, SimError> {
            let cfg = SimConfig::new(2_000, 6, job.temperature);
            let mut rng = Xoshiro256StarStar::seed_from_u64(job.seed);
            Ok(run_final(&cfg, &mut rng)?.snapshot(job.temperature, job.replica))
        };
        let seq = run_jobs(&jobs, true, false, "test", work).unwrap();
        let par = run_jobs(&jobs, false, false, "test", work).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq.len(), 12);
        assert_eq!(seq[5].replica, 1);
        assert_eq!(seq[5].temperature, 2.5);
    }

    #[test]
    fn test_error_propagates() {
        let jobs = jobs(&[1.0, -1.0], 1, 0, 1);
        let res = run_jobs(&jobs, true, false, "test", |job| {
            let cfg = SimConfig::new(10, 4, job.temperature);
            let mut rng = Xoshiro256StarStar::seed_from_u64(job.seed);
            run_final(&cfg, &mut rng).map(|_| ())
        });
        assert!(matches!(res, Err(SimError::InvalidTemperature { .. })));
    }
}
