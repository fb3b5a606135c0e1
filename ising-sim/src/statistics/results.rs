use crate::spins::Observables;

/// Per-site energy and magnetization after every trial of a run.
///
/// Entry 0 is the initial state; entry `k` is the state after trial `k`, so a
/// run of `steps` trials yields `steps + 1` entries. A rejected trial repeats
/// the previous entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub energies: Vec<f64>,
    pub magnetizations: Vec<f64>,
}

impl Trajectory {
    /// Normalize whole-lattice totals by the number of sites.
    pub(crate) fn from_totals(totals: &[Observables], n_spins: usize) -> Self {
        let (energies, magnetizations) = totals
            .iter()
            .map(|obs| {
                let p = obs.per_site(n_spins);
                (p.energy, p.magnetization)
            })
            .unzip();
        Self {
            energies,
            magnetizations,
        }
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<Observables> {
        Some(Observables {
            energy: *self.energies.get(step)?,
            magnetization: *self.magnetizations.get(step)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Observables> + '_ {
        self.energies
            .iter()
            .zip(self.magnetizations.iter())
            .map(|(&energy, &magnetization)| Observables {
                energy,
                magnetization,
            })
    }

    pub fn last(&self) -> Option<Observables> {
        self.len().checked_sub(1).and_then(|k| self.get(k))
    }
}

/// Final-state observables averaged over independent runs at one temperature.
///
/// Magnetizations are split by sign: runs that ordered into the +M branch and
/// the -M branch are averaged separately, since a plain mean over both would
/// cancel towards zero below the critical temperature. Runs ending at exactly
/// `M = 0` belong to neither branch.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageResult {
    pub temperature: f64,
    pub n_runs: usize,
    /// ⟨E⟩, mean total energy.
    pub energy: f64,
    /// ⟨E²⟩.
    pub energy2: f64,
    /// Mean of the strictly positive final magnetizations, `None` if there were none.
    pub magnetization_pos: Option<f64>,
    /// Mean of the strictly negative final magnetizations, `None` if there were none.
    pub magnetization_neg: Option<f64>,
    pub n_pos: usize,
    pub n_neg: usize,
    pub n_zero: usize,
}

impl AverageResult {
    /// ⟨E²⟩ − ⟨E⟩², clamped at zero.
    pub fn energy_variance(&self) -> f64 {
        (self.energy2 - self.energy * self.energy).max(0.0)
    }
}

/// Flattened final spins of one run, tagged with where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeSnapshot {
    pub temperature: f64,
    pub replica: usize,
    /// Row-major spins, length `size * size`.
    pub spins: Vec<i8>,
}

impl LatticeSnapshot {
    /// Row key `"<temperature to one decimal>:<replica>"`.
    pub fn label(&self) -> String {
        format!("{:.1}:{}", self.temperature, self.replica)
    }
}
