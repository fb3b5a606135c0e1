// Property checks for the lattice and the Metropolis engine.
//
// Run with: cargo test -p ising-sim --test properties

use ising_sim::mcmc::metropolis_trial;
use ising_sim::{
    average, record_trajectory, run_final, run_trajectory, InitialState, Lattice,
    ObservableTracking, SimConfig,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

fn spin_grid(min_size: usize, max_size: usize) -> impl Strategy<Value = (usize, Vec<i8>)> {
    (min_size..=max_size).prop_flat_map(|size| {
        (
            Just(size),
            prop::collection::vec(prop_oneof![Just(1i8), Just(-1i8)], size * size),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_incremental_tracking_equals_recompute(
        seed in any::<u64>(),
        size in 1usize..10,
        steps in 0usize..600,
        temperature in 0.0f64..5.0,
    ) {
        let base = SimConfig::new(steps, size, temperature);
        let full = run_trajectory(&base, &mut Xoshiro256StarStar::seed_from_u64(seed)).unwrap();
        let inc = run_trajectory(
            &base.clone().with_tracking(ObservableTracking::Incremental),
            &mut Xoshiro256StarStar::seed_from_u64(seed),
        )
        .unwrap();
        prop_assert_eq!(full, inc);
    }

    #[test]
    fn prop_trajectory_has_steps_plus_one_entries(
        seed in any::<u64>(),
        size in 1usize..8,
        steps in 0usize..300,
        temperature in 0.0f64..5.0,
    ) {
        let cfg = SimConfig::new(steps, size, temperature);
        let traj = run_trajectory(&cfg, &mut Xoshiro256StarStar::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(traj.len(), steps + 1);
        prop_assert_eq!(traj.energies.len(), traj.magnetizations.len());
    }

    #[test]
    fn prop_spins_stay_binary(
        seed in any::<u64>(),
        size in 1usize..12,
        steps in 0usize..2_000,
        temperature in 0.0f64..10.0,
    ) {
        let cfg = SimConfig::new(steps, size, temperature);
        let lat = run_final(&cfg, &mut Xoshiro256StarStar::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(lat.spins().len(), size * size);
        prop_assert!(lat.spins().iter().all(|&s| s == 1 || s == -1));
    }

    // On a 1x1 torus the site is its own neighbor, so its sum is always 4.
    #[test]
    fn prop_flip_negates_neighbor_sum((size, spins) in spin_grid(2, 8), i in 0usize..8, j in 0usize..8) {
        let mut lat = Lattice::from_spins(size, spins).unwrap();
        let (i, j) = (i % size, j % size);
        let before = lat.neighbor_sum(i, j);
        lat.flip(i, j);
        prop_assert_eq!(lat.neighbor_sum(i, j), -before);
    }

    #[test]
    fn prop_observables_depend_only_on_grid((size, spins) in spin_grid(1, 8), seed in any::<u64>()) {
        let reference = Lattice::from_spins(size, spins.clone()).unwrap();

        // Walk away from the grid and back: the same grid must give the same observables.
        let mut lat = Lattice::from_spins(size, spins).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let mut flipped = Vec::new();
        for _ in 0..20 {
            let out = metropolis_trial(&mut lat, 3.0, &mut rng);
            if out.accepted {
                flipped.push((out.row, out.col));
            }
        }
        for &(i, j) in flipped.iter().rev() {
            lat.flip(i, j);
        }
        prop_assert_eq!(lat.spins(), reference.spins());
        prop_assert_eq!(lat.observables(), reference.observables());
    }

    #[test]
    fn prop_rejected_trial_is_identity((size, spins) in spin_grid(1, 8), seed in any::<u64>(), temperature in 0.0f64..4.0) {
        let mut lat = Lattice::from_spins(size, spins).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        for _ in 0..50 {
            let before = lat.clone();
            let out = metropolis_trial(&mut lat, temperature, &mut rng);
            if !out.accepted {
                prop_assert_eq!(&lat, &before);
            }
        }
    }

    #[test]
    fn prop_zero_temperature_is_a_quench(seed in any::<u64>(), size in 2usize..10, steps in 1usize..1_500) {
        let cfg = SimConfig::new(steps, size, 0.0);
        let traj = run_trajectory(&cfg, &mut Xoshiro256StarStar::seed_from_u64(seed)).unwrap();
        for w in traj.energies.windows(2) {
            prop_assert!(w[1] <= w[0]);
        }
    }
}

#[test]
fn two_by_two_all_up_initial_observables() {
    let cfg = SimConfig::new(0, 2, 1.0).with_initial(InitialState::Uniform(1));
    let traj = run_trajectory(&cfg, &mut Xoshiro256StarStar::seed_from_u64(0)).unwrap();
    // Totals are E = -8, M = 4 over 4 sites.
    assert_eq!(traj.energies, vec![-2.0]);
    assert_eq!(traj.magnetizations, vec![1.0]);

    let lat = run_final(&cfg, &mut Xoshiro256StarStar::seed_from_u64(0)).unwrap();
    let obs = lat.observables();
    assert_eq!((obs.energy, obs.magnetization), (-8.0, 4.0));
}

#[test]
fn single_flip_lowers_magnetization_by_two() {
    let mut lat = Lattice::uniform(4, 1).unwrap();
    assert_eq!(lat.observables().magnetization, 16.0);
    lat.flip(0, 0);
    assert_eq!(lat.spin(0, 0), -1);
    assert_eq!(lat.observables().magnetization, 14.0);
}

#[test]
fn average_of_ordered_lattice_reports_ground_state() {
    let cfg = SimConfig::new(0, 4, 1.0).with_initial(InitialState::Uniform(1));
    let res = average(1, &cfg, 7).unwrap();
    assert_eq!(res.energy, -32.0);
    assert_eq!(res.magnetization_pos, Some(16.0));
    assert_eq!(res.magnetization_neg, None);
}

#[test]
fn low_temperature_orders_and_high_temperature_disorders() {
    // 16x16 well below and well above T_c ≈ 2.269.
    let steps = 400 * 256;
    let cold = average(
        4,
        &SimConfig::new(steps, 16, 1.0).with_initial(InitialState::Uniform(1)),
        1,
    )
    .unwrap();
    let hot = average(4, &SimConfig::new(steps, 16, 10.0), 1).unwrap();

    let n2 = 256.0;
    assert!(cold.energy / n2 < -1.9, "cold energy per site {}", cold.energy / n2);
    assert!(cold.magnetization_pos.unwrap() / n2 > 0.9);
    assert!(hot.energy / n2 > -0.6, "hot energy per site {}", hot.energy / n2);
}

#[test]
fn record_trajectory_on_caller_lattice_mutates_it() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(8);
    let mut lat = Lattice::random(6, &mut rng).unwrap();
    let start = lat.clone();
    let traj = record_trajectory(
        &mut lat,
        2_000,
        3.0,
        ObservableTracking::Incremental,
        &mut rng,
    )
    .unwrap();
    assert_eq!(traj.get(0).unwrap(), start.observables().per_site(36));
    assert_ne!(lat, start);
}
