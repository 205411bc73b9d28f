//! Seed derivation for reproducible sampling streams.
//!
//! Percentile estimation does not require determinism, but callers that want
//! reproducible projections (replays, regression fixtures) can derive one
//! stream per stat from a single user-visible seed. Domain separation keeps
//! the streams independent: re-sampling one stat never perturbs the draw
//! sequence of another.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;

use crate::stats::StatKey;

/// Derive the stream seed for one stat from a user-visible seed.
#[must_use]
pub fn derive_stat_seed(user_seed: u64, stat: StatKey) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes())
        .expect("64-bit seed is valid key");
    mac.update(stat.as_str().as_bytes());
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Sampling stream for one stat, seeded via [`derive_stat_seed`].
#[must_use]
pub fn stat_rng(user_seed: u64, stat: StatKey) -> SmallRng {
    SmallRng::seed_from_u64(derive_stat_seed(user_seed, stat))
}
