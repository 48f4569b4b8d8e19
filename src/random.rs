//! Thread-local random number streams.
//!
//! Every stochastic draw in the renderer goes through the per-thread ChaCha
//! generator held here, so a render is embarrassingly parallel with no shared
//! state and a test can seed its own thread for reproducible draws.

use std::cell::RefCell;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

thread_local! {
    static RNG: RefCell<ChaCha8Rng> = RefCell::new(ChaCha8Rng::from_entropy());
}

/// Reseed the current thread's generator.
///
/// Intended for tests that need reproducible sampling.
pub fn seed(seed: u64) {
    RNG.with(|rng| *rng.borrow_mut() = ChaCha8Rng::seed_from_u64(seed));
}

/// Uniform f64 in [0, 1)
pub fn random_f64() -> f64 {
    RNG.with(|rng| rng.borrow_mut().gen())
}

/// Uniform f64 in [min, max)
pub fn random_range(min: f64, max: f64) -> f64 {
    RNG.with(|rng| rng.borrow_mut().gen_range(min..max))
}

/// Uniform index in [0, n)
pub fn random_index(n: usize) -> usize {
    RNG.with(|rng| rng.borrow_mut().gen_range(0..n))
}
