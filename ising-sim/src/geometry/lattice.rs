use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::error::SimError;
use crate::spins::{self, Observables};
use crate::statistics::LatticeSnapshot;

/// Number of lattice directions. Direction 0 walks along rows (`i`), direction
/// 1 along columns (`j`).
pub const N_DIMS: usize = 2;

/// Largest side length whose flat site indices still fit the `u32` neighbor table.
///
/// `SimConfig::size` repeats this bound as a literal in its `validator`
/// attribute; change both together.
pub const MAX_SIZE: usize = 1 << 16;

/// Periodic `size x size` square lattice of ±1 spins.
///
/// Sites are stored in row-major order: site `(i, j)` lives at flat index
/// `i * size + j`. The neighbor relation wraps modulo `size` in both
/// directions (a 2-torus) and is precomputed once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    size: usize,
    n_spins: usize,
    spins: Vec<i8>,
    /// Layout: `neighbors[(site * N_DIMS + d) * 2 + dir]`, where `dir = 0` is
    /// the forward (+1) neighbor and `dir = 1` the backward (-1) neighbor.
    neighbors: Vec<u32>,
}

impl Lattice {
    /// Lattice with every spin drawn independently from {+1, -1} with probability ½.
    pub fn random(size: usize, rng: &mut Xoshiro256StarStar) -> Result<Self, SimError> {
        let mut lattice = Self::uniform(size, 1)?;
        for s in lattice.spins.iter_mut() {
            *s = if rng.gen::<f32>() < 0.5 { -1 } else { 1 };
        }
        Ok(lattice)
    }

    /// Lattice with every spin set to `spin`.
    pub fn uniform(size: usize, spin: i8) -> Result<Self, SimError> {
        check_size(size)?;
        Self::from_spins(size, vec![spin; size * size])
    }

    /// Lattice from a flat row-major spin vector of length `size * size`.
    pub fn from_spins(size: usize, spins: Vec<i8>) -> Result<Self, SimError> {
        check_size(size)?;
        let n_spins = size * size;
        if spins.len() != n_spins {
            return Err(SimError::InvalidSpins(format!(
                "expected {n_spins} spins for a {size}x{size} lattice, got {}",
                spins.len()
            )));
        }
        if let Some(pos) = spins.iter().position(|&s| s != 1 && s != -1) {
            return Err(SimError::InvalidSpins(format!(
                "spin {} at site {pos} is not +1 or -1",
                spins[pos]
            )));
        }

        Ok(Self {
            size,
            n_spins,
            spins,
            neighbors: build_neighbors(size),
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn n_spins(&self) -> usize {
        self.n_spins
    }

    /// Flat row-major view of the spins.
    #[inline]
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    /// Flat index of `(i, j)`. Coordinates wrap modulo `size`.
    #[inline]
    pub fn site(&self, i: usize, j: usize) -> usize {
        (i % self.size) * self.size + (j % self.size)
    }

    #[inline]
    pub fn spin(&self, i: usize, j: usize) -> i8 {
        self.spins[self.site(i, j)]
    }

    /// Return the neighbor of site `flat_idx` in direction `dim`.
    /// `forward = true` means +1, `forward = false` means -1.
    #[inline]
    pub fn neighbor(&self, flat_idx: usize, dim: usize, forward: bool) -> usize {
        self.neighbors[(flat_idx * N_DIMS + dim) * 2 + (!forward as usize)] as usize
    }

    /// Bond sum of `(i, j)` with its four periodic neighbors:
    /// `s(i,j) * [s(i-1,j) + s(i+1,j) + s(i,j-1) + s(i,j+1)]`.
    ///
    /// Higher values mean the site is more aligned with its neighborhood.
    #[inline]
    pub fn neighbor_sum(&self, i: usize, j: usize) -> i32 {
        let site = self.site(i, j);
        let mut h = 0i32;
        for d in 0..N_DIMS {
            h += self.spins[self.neighbor(site, d, true)] as i32;
            h += self.spins[self.neighbor(site, d, false)] as i32;
        }
        self.spins[site] as i32 * h
    }

    /// Negate the spin at `(i, j)` in place.
    #[inline]
    pub fn flip(&mut self, i: usize, j: usize) {
        let site = self.site(i, j);
        self.spins[site] = -self.spins[site];
    }

    /// Total energy and magnetization from a full scan of the lattice.
    pub fn observables(&self) -> Observables {
        spins::energy::compute_observables(self)
    }

    /// Copy of the current spins tagged with the run they came from.
    pub fn snapshot(&self, temperature: f64, replica: usize) -> LatticeSnapshot {
        LatticeSnapshot {
            temperature,
            replica,
            spins: self.spins.clone(),
        }
    }
}

fn check_size(size: usize) -> Result<(), SimError> {
    if size == 0 || size > MAX_SIZE {
        return Err(SimError::InvalidSize {
            size,
            max: MAX_SIZE,
        });
    }
    Ok(())
}

fn build_neighbors(size: usize) -> Vec<u32> {
    let n_spins = size * size;
    let strides = [size, 1];
    let mut neighbors = vec![0u32; n_spins * N_DIMS * 2];

    for site in 0..n_spins {
        let coords = [site / size, site % size];
        for d in 0..N_DIMS {
            for (dir, sign) in [(0, 1isize), (1, -1isize)] {
                let c = (coords[d] as isize + sign).rem_euclid(size as isize) as usize;
                let flat = site - coords[d] * strides[d] + c * strides[d];
                neighbors[(site * N_DIMS + d) * 2 + dir] = flat as u32;
            }
        }
    }

    neighbors
}
