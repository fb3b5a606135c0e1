pub mod lattice;

pub use lattice::{Lattice, MAX_SIZE, N_DIMS};
