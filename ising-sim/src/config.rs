use std::fmt;

use rand_xoshiro::Xoshiro256StarStar;
use validator::{Validate, ValidationError};

use crate::error::SimError;
use crate::geometry::Lattice;

/// How the lattice is populated before the first trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialState {
    /// i.i.d. uniform ±1 spins.
    #[default]
    Random,
    /// Every spin equal to the given value (+1 or -1).
    Uniform(i8),
}

impl InitialState {
    pub fn build(&self, size: usize, rng: &mut Xoshiro256StarStar) -> Result<Lattice, SimError> {
        match *self {
            Self::Random => Lattice::random(size, rng),
            Self::Uniform(spin) => Lattice::uniform(size, spin),
        }
    }
}

impl TryFrom<&str> for InitialState {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "random" => Ok(Self::Random),
            "up" => Ok(Self::Uniform(1)),
            "down" => Ok(Self::Uniform(-1)),
            _ => Err(format!(
                "unknown initial_state '{s}', expected 'random', 'up' or 'down'"
            )),
        }
    }
}

impl fmt::Display for InitialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Uniform(1) => f.write_str("up"),
            Self::Uniform(-1) => f.write_str("down"),
            Self::Uniform(s) => write!(f, "uniform({s})"),
        }
    }
}

/// How trajectory mode refreshes the observables after an accepted flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObservableTracking {
    /// Full lattice rescan after every accepted flip.
    #[default]
    Recompute,
    /// Add the local energy and magnetization change of the flipped site.
    Incremental,
}

impl TryFrom<&str> for ObservableTracking {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "recompute" => Ok(Self::Recompute),
            "incremental" => Ok(Self::Incremental),
            _ => Err(format!(
                "unknown tracking '{s}', expected 'recompute' or 'incremental'"
            )),
        }
    }
}

impl fmt::Display for ObservableTracking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Recompute => "recompute",
            Self::Incremental => "incremental",
        })
    }
}

/// Reject temperatures the Boltzmann factor cannot be evaluated at.
///
/// `T = 0` is allowed and means every energy-raising flip is rejected.
pub fn check_temperature(temperature: f64) -> Result<(), SimError> {
    if !temperature.is_finite() || temperature < 0.0 {
        return Err(SimError::InvalidTemperature { temperature });
    }
    Ok(())
}

fn validate_sim_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    if check_temperature(cfg.temperature).is_err() {
        return Err(ValidationError::new("temperature must be finite and >= 0"));
    }
    if let InitialState::Uniform(spin) = cfg.initial {
        if spin != 1 && spin != -1 {
            return Err(ValidationError::new("uniform initial spin must be +1 or -1"));
        }
    }
    Ok(())
}

/// Parameters of one Metropolis run. Fixed for the duration of the run.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_sim_config"))]
pub struct SimConfig {
    /// Number of single-spin-flip trials.
    pub steps: usize,
    /// Lattice side length N, at most `geometry::MAX_SIZE`.
    #[validate(range(min = 1, max = 65536))]
    pub size: usize,
    pub temperature: f64,
    pub initial: InitialState,
    pub tracking: ObservableTracking,
}

impl SimConfig {
    /// Random initial spins, full-recompute tracking.
    pub fn new(steps: usize, size: usize, temperature: f64) -> Self {
        Self {
            steps,
            size,
            temperature,
            initial: InitialState::Random,
            tracking: ObservableTracking::Recompute,
        }
    }

    pub fn with_initial(mut self, initial: InitialState) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_tracking(mut self, tracking: ObservableTracking) -> Self {
        self.tracking = tracking;
        self
    }

    /// Validate and map the failure onto a [`SimError`] kind.
    pub fn check(&self) -> Result<(), SimError> {
        check_temperature(self.temperature)?;
        self.validate().map_err(|errors| {
            if errors.field_errors().contains_key("size") {
                SimError::InvalidSize {
                    size: self.size,
                    max: crate::geometry::MAX_SIZE,
                }
            } else {
                SimError::InvalidConfig(format!("{errors}"))
            }
        })
    }
}
