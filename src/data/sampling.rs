// ============================================================
// Layer 4 — Shuffling and Sampling
// ============================================================
// Two random operations used by the pipeline:
//
//   permute  — caption order for one image (CorpusAssembler)
//   sample   — pick diagnostic examples (PairingValidator)
//
// Both take the rng as an argument instead of reaching for a
// global one, so a seeded StdRng gives repeatable output.
//
// permute uses Fisher-Yates via rand::seq::SliceRandom: every
// permutation is equally likely and elements are only moved,
// never added or dropped.
//
// Reference: rand crate documentation (SliceRandom)

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Randomly reorder `items` in place.
pub fn permute<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Pick up to `count` distinct elements without replacement.
///
/// Asking for more than exist returns all of them (in random
/// order); asking from an empty slice returns an empty Vec.
pub fn sample<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
    items.choose_multiple(rng, count).cloned().collect()
}

/// Build the run's randomness source: seeded when a seed is
/// given, otherwise from OS entropy.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            tracing::debug!("Using fixed rng seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}
