//! Pattern generators for training sets.
//!
//! Two families: independent uniform patterns (the classical capacity
//! setting) and patterns at a fixed Hamming radius around an origin,
//! which probe how the stored memory behaves as training patterns
//! crowd together.

use rand::Rng;

use crate::error::{HebbianError, Result};
use crate::pattern::bipolar::{Pattern, PatternBatch};

/// `count` independent uniform patterns over `n` units.
pub fn random_patterns<R: Rng + ?Sized>(n: usize, count: usize, rng: &mut R) -> Result<Vec<Pattern>> {
    (0..count).map(|_| Pattern::random(n, rng)).collect()
}

/// Same as [`random_patterns`], stacked into a batch. `count` must be > 0.
pub fn random_batch<R: Rng + ?Sized>(n: usize, count: usize, rng: &mut R) -> Result<PatternBatch> {
    if count == 0 {
        return Err(HebbianError::EmptyBatch);
    }
    PatternBatch::from_patterns(&random_patterns(n, count, rng)?)
}

/// `count` patterns, each exactly `distance` flips away from `origin`.
///
/// Flips are drawn independently per pattern, so two generated patterns
/// may be anywhere between 0 and `2 * distance` apart from each other.
pub fn hammed_patterns<R: Rng + ?Sized>(
    origin: &Pattern,
    count: usize,
    distance: usize,
    rng: &mut R,
) -> Result<Vec<Pattern>> {
    (0..count).map(|_| origin.with_flips(distance, rng)).collect()
}
