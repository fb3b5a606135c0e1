use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::geometry::Lattice;
use crate::spins::{J, K_B};

/// Result of one proposed single-spin flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    pub row: usize,
    pub col: usize,
    /// Energy change the flip would cause (`E_after - E_before`).
    pub delta_e: f64,
    pub accepted: bool,
}

/// Metropolis acceptance rule.
///
/// `delta_e <= 0` is always accepted without touching the RNG. Otherwise one
/// uniform draw `u` in `[0, 1)` is taken and the move is accepted iff
/// `u < exp(-delta_e / (k * T))`. At `T = 0` every energy-raising move is
/// rejected and no draw is consumed.
#[inline]
pub fn accept(delta_e: f64, temperature: f64, rng: &mut Xoshiro256StarStar) -> bool {
    if delta_e <= 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    rng.gen::<f64>() < (-delta_e / (K_B * temperature)).exp()
}

/// One Metropolis trial on a uniformly chosen site.
///
/// The spin is flipped tentatively and flipped back when the move is
/// rejected, so a rejected trial leaves the lattice unchanged.
#[inline]
pub fn metropolis_trial(
    lattice: &mut Lattice,
    temperature: f64,
    rng: &mut Xoshiro256StarStar,
) -> TrialOutcome {
    let size = lattice.size();
    let row = rng.gen_range(0..size);
    let col = rng.gen_range(0..size);

    let old = lattice.neighbor_sum(row, col);
    lattice.flip(row, col);
    let new = lattice.neighbor_sum(row, col);
    let delta_e = -J * (new - old) as f64;

    let accepted = accept(delta_e, temperature, rng);
    if !accepted {
        lattice.flip(row, col);
    }

    TrialOutcome {
        row,
        col,
        delta_e,
        accepted,
    }
}

/// Run `steps` trials in place. Returns the number of accepted flips.
#[cfg_attr(feature = "profile", inline(never))]
pub fn evolve(
    lattice: &mut Lattice,
    steps: usize,
    temperature: f64,
    rng: &mut Xoshiro256StarStar,
) -> usize {
    let mut accepted = 0;
    for _ in 0..steps {
        if metropolis_trial(lattice, temperature, rng).accepted {
            accepted += 1;
        }
    }
    accepted
}
