pub mod metropolis;

pub use metropolis::{accept, evolve, metropolis_trial, TrialOutcome};
