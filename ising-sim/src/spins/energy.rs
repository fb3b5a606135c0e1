use super::J;
use crate::geometry::Lattice;

/// Total energy and magnetization of one spin configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observables {
    pub energy: f64,
    pub magnetization: f64,
}

impl Observables {
    /// Observables after an accepted flip that changed the energy by
    /// `delta_e` and the magnetization by `delta_m`.
    #[inline]
    pub fn shifted(self, delta_e: f64, delta_m: f64) -> Self {
        Self {
            energy: self.energy + delta_e,
            magnetization: self.magnetization + delta_m,
        }
    }

    /// Per-site values for a lattice of `n_spins` sites.
    #[inline]
    pub fn per_site(self, n_spins: usize) -> Self {
        let n = n_spins as f64;
        Self {
            energy: self.energy / n,
            magnetization: self.magnetization / n,
        }
    }
}

/// Full O(N²) scan of the lattice.
///
/// Energy is `-J * Σ (s·s_right + s·s_down)`: every bond is counted once via its
/// forward neighbors, wrapping on the last row and column. Magnetization is
/// `Σ s`.
pub fn compute_observables(lattice: &Lattice) -> Observables {
    let spins = lattice.spins();
    let mut bonds = 0i64;
    let mut mag = 0i64;

    for (i, &s) in spins.iter().enumerate() {
        let si = s as i64;
        let down = spins[lattice.neighbor(i, 0, true)] as i64;
        let right = spins[lattice.neighbor(i, 1, true)] as i64;
        bonds += si * right + si * down;
        mag += si;
    }

    Observables {
        energy: -J * bonds as f64,
        magnetization: mag as f64,
    }
}
