use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{RngCore, SeedableRng};

/// Source of randomness used by the selection routines.
///
/// Only `rng` has to be provided; `choose_usize` has a default implementation on top of it.
/// Tests override `choose_usize` to make tie breaking deterministic.
pub trait RandomGenerator {
    fn rng(&mut self) -> &mut dyn RngCore;

    /// Picks one element uniformly at random. Returns `None` for an empty slice.
    fn choose_usize<'a>(&mut self, vector: &'a [usize]) -> Option<&'a usize> {
        vector.choose(self.rng())
    }
}

/// Default generator backed by `StdRng`.
pub struct MOORandomGenerator {
    rng: StdRng,
}

impl MOORandomGenerator {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn new_from_seed(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(|| StdRng::from_rng(&mut rand::rng()), StdRng::seed_from_u64);
        Self { rng }
    }
}

impl RandomGenerator for MOORandomGenerator {
    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}

/// `RngCore` that must never be reached. Fake generators in tests hand it out from `rng()`
/// while overriding the methods they actually need.
pub struct TestDummyRng;

impl RngCore for TestDummyRng {
    fn next_u32(&mut self) -> u32 {
        unimplemented!("Not used in this test")
    }
    fn next_u64(&mut self) -> u64 {
        unimplemented!("Not used in this test")
    }
    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        unimplemented!("Not used in this test")
    }
}
