//! Random key generation.
//!
//! Keys are drawn uniformly from the 62 alphanumeric symbols (digits, lowercase and uppercase
//! letters). The generator is not cryptographically secure. Uniqueness comes from retrying
//! until the candidate is not already taken, not from the size of the key space.
//!
//! The generator is owned by the [`DataStore`](crate::DataStore). It is seeded from the OS
//! unless a seed is given through [`StoreConfig`](crate::StoreConfig) or
//! [`DataStore::init_random`](crate::DataStore::init_random), in which case the sequence of
//! generated keys is reproducible.

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The length of keys produced by `random_key`.
pub const KEY_LENGTH: usize = 32;

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Draws `length` symbols from the alphanumeric alphabet.
pub(crate) fn random_alphanumeric<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Draws keys until one is found for which `is_taken` is false.
pub(crate) fn unique_key<R: Rng>(rng: &mut R, is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = random_alphanumeric(rng, KEY_LENGTH);
        if !is_taken(&candidate) {
            return candidate;
        }
    }
}
