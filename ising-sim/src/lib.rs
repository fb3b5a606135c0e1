pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use config::{InitialState, ObservableTracking, SimConfig};
pub use error::SimError;
pub use geometry::Lattice;
pub use simulation::{average, record_trajectory, run_final, run_trajectory};
pub use spins::{Observables, J, K_B};
pub use statistics::{AverageResult, LatticeSnapshot, Trajectory};
