use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator for one counting run: seeded from `seed` if given, otherwise from OS entropy.
pub fn run_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_os_rng(),
    }
}
