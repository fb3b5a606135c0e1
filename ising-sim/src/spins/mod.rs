pub mod energy;

pub use energy::{compute_observables, Observables};

/// Ferromagnetic coupling constant.
pub const J: f64 = 1.0;

/// Boltzmann constant in the reduced units the simulation works in.
pub const K_B: f64 = 1.0;
