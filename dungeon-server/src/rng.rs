//! Per-request random sources.
//!
//! Handlers never share an RNG. Each request forks its own
//! `Xoshiro256PlusPlus`: derived from the configured base seed and a request
//! counter when a seed is set, otherwise drawn from OS entropy.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::sync::atomic::{AtomicU64, Ordering};

/// Golden-ratio increment, spreads consecutive fork seeds apart
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
pub struct RngSource {
    seed: Option<u64>,
    forks: AtomicU64,
}

impl RngSource {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            forks: AtomicU64::new(0),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(None)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of generators handed out so far
    pub fn forks(&self) -> u64 {
        self.forks.load(Ordering::Relaxed)
    }

    pub fn fork(&self) -> Xoshiro256PlusPlus {
        let n = self.forks.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => {
                Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(n.wrapping_mul(SEED_STRIDE)))
            }
            None => Xoshiro256PlusPlus::from_entropy(),
        }
    }
}
