pub mod results;
mod stats;

pub use results::{AverageResult, LatticeSnapshot, Trajectory};
pub use stats::Statistics;
