use std::time::Instant;

use ising_sim::{run_final, run_trajectory, ObservableTracking, SimConfig};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

const L: usize = 128;
const N_TEMPS: usize = 8;
const SWEEPS: usize = 50;
const TRAJ_L: usize = 32;

fn main() {
    let steps = SWEEPS * L * L;
    let temps: Vec<f64> = (0..N_TEMPS)
        .map(|i| 1.0 + 3.0 * i as f64 / (N_TEMPS - 1) as f64)
        .collect();

    println!(
        "Lattice: {}x{}  |  Temps: {}  |  Trials per run: {}",
        L, L, N_TEMPS, steps
    );
    println!("{}", "-".repeat(70));

    let t0 = Instant::now();
    for (i, &t) in temps.iter().enumerate() {
        let cfg = SimConfig::new(steps, L, t);
        let mut rng = Xoshiro256StarStar::seed_from_u64(42 + i as u64);
        let lattice = run_final(&cfg, &mut rng).unwrap();
        let obs = lattice.observables().per_site(lattice.n_spins());
        println!(
            "T = {:.3}  e = {:+.4}  m = {:+.4}",
            t, obs.energy, obs.magnetization
        );
    }
    let elapsed = t0.elapsed().as_secs_f64();
    let per_trial = elapsed / (N_TEMPS * steps) as f64 * 1e9;
    println!("Final-state: {:.3} s  |  {:.2} ns/trial", elapsed, per_trial);

    // Trajectory mode: full rescan vs incremental update.
    let traj_steps = 200 * TRAJ_L * TRAJ_L;
    for tracking in [ObservableTracking::Recompute, ObservableTracking::Incremental] {
        let cfg = SimConfig::new(traj_steps, TRAJ_L, 2.269).with_tracking(tracking);
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let t0 = Instant::now();
        let traj = run_trajectory(&cfg, &mut rng).unwrap();
        println!(
            "Trajectory ({tracking}, {}x{}): {:.3} s for {} entries",
            TRAJ_L,
            TRAJ_L,
            t0.elapsed().as_secs_f64(),
            traj.len()
        );
    }
}
