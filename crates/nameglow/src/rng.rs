//! Injectable random source.
//!
//! Every random pick (nickname prefix/suffix, reflection prompt, fallback
//! virtue) draws from one [`SharedRng`]. Seed it to make a whole run
//! reproducible; clones share the same stream.

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

/// A cloneable handle to a single PCG random stream.
#[derive(Clone, Debug)]
pub struct SharedRng(Arc<Mutex<Pcg32>>);

impl SharedRng {
    /// A reproducible stream.
    pub fn seeded(seed: u64) -> Self {
        Self::wrap(Pcg32::seed_from_u64(seed))
    }

    /// A stream seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::wrap(Pcg32::from_rng(&mut rand::rng()))
    }

    /// Seeded when `seed` is given, entropy-backed otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    fn wrap(rng: Pcg32) -> Self {
        Self(Arc::new(Mutex::new(rng)))
    }

    /// Pick one element uniformly at random. `None` for an empty slice.
    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        let mut rng = self.0.lock().unwrap_or_else(|e| e.into_inner());
        items.choose(&mut *rng)
    }
}
