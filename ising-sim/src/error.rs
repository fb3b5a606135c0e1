use thiserror::Error;

/// Errors raised at the call boundary, before any Monte Carlo trial runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Lattice side length is zero or too large for the neighbor table.
    #[error("invalid lattice size {size}, expected 1..={max}")]
    InvalidSize { size: usize, max: usize },

    /// A caller-provided spin grid has the wrong length or a value outside {+1, -1}.
    #[error("invalid spin configuration: {0}")]
    InvalidSpins(String),

    /// Temperature is negative, NaN or infinite.
    #[error("temperature must be finite and >= 0, got {temperature}")]
    InvalidTemperature { temperature: f64 },

    /// `average` was asked to average over zero runs.
    #[error("cannot average over zero runs")]
    EmptyAverage,

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),
}
