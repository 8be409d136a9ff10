//! Hebbian weight-matrix builder.
//!
//! W[i][j] = (1/P) Σ_k ξ_k[i]·ξ_k[j] for i ≠ j, W[i][i] = 0.
//!
//! Three strategies, all producing the same matrix up to floating-point
//! summation order:
//! 1. `Pairwise` — explicit double loop over unit pairs, writing both
//!    triangle entries
//! 2. `OuterProduct` — ξ ⊗ ξ for a single pattern, Xᵀ·X for a batch
//! 3. `Parallel` — the batch is chunked across the rayon pool, partial sums
//!    are merged, then normalised once

use ndarray::{ArrayView, ArrayView2, Axis, Dimension, Ix1, Ix2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PARALLEL_CHUNK;
use crate::error::{HebbianError, Result};
use crate::pattern::bipolar::check_bipolar;
use crate::pattern::{Pattern, PatternBatch};
use crate::weights::accumulate::Accumulation;
use crate::weights::capacity::{exceeds_capacity, hebbian_capacity};
use crate::weights::matrix::WeightMatrix;

/// How the outer products are accumulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Explicit pairwise double loop.
    Pairwise,
    /// Outer product / batch contraction through ndarray.
    #[default]
    OuterProduct,
    /// Chunked contraction on the rayon thread pool.
    Parallel,
}

/// Builder configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Accumulation strategy.
    pub strategy: Strategy,

    /// Reject elements outside {-1, +1} with `MalformedPattern`.
    /// When disabled, non-bipolar input is folded in as-is.
    pub validate: bool,

    /// Patterns per rayon task for `Strategy::Parallel`.
    pub parallel_chunk: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            validate: true,
            parallel_chunk: DEFAULT_PARALLEL_CHUNK,
        }
    }
}

/// Builds [`WeightMatrix`] values from bipolar training patterns.
#[derive(Clone, Debug, Default)]
pub struct WeightMatrixBuilder {
    config: BuilderConfig,
}

impl WeightMatrixBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Default configuration with the given strategy.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self::new(BuilderConfig {
            strategy,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build from a single pattern (rank 1, shape `[N]`) or a batch
    /// (rank 2, shape `[P, N]`). Any other rank is `InvalidShape`.
    pub fn build<D: Dimension>(&self, patterns: ArrayView<'_, f64, D>) -> Result<WeightMatrix> {
        let patterns = patterns.into_dyn();
        let shape = patterns.shape().to_vec();
        let batch = match patterns.ndim() {
            1 => patterns
                .into_dimensionality::<Ix1>()
                .map(|p| p.insert_axis(Axis(0))),
            2 => patterns.into_dimensionality::<Ix2>(),
            _ => return Err(HebbianError::InvalidShape { shape }),
        }
        .map_err(|_| HebbianError::InvalidShape {
            shape: shape.clone(),
        })?;
        self.build_rows(batch)
    }

    /// Build from one validated pattern.
    pub fn build_pattern(&self, pattern: &Pattern) -> Result<WeightMatrix> {
        self.build(pattern.to_f64().view())
    }

    /// Build from a validated batch.
    pub fn build_batch(&self, batch: &PatternBatch) -> Result<WeightMatrix> {
        self.build(batch.to_f64().view())
    }

    /// Stack `patterns` into a batch and build from it.
    pub fn build_patterns(&self, patterns: &[Pattern]) -> Result<WeightMatrix> {
        self.build_batch(&PatternBatch::from_patterns(patterns)?)
    }

    fn build_rows(&self, batch: ArrayView2<'_, f64>) -> Result<WeightMatrix> {
        let (p, n) = batch.dim();
        if p == 0 {
            return Err(HebbianError::EmptyBatch);
        }
        if n == 0 {
            return Err(HebbianError::InvalidShape {
                shape: vec![p, n],
            });
        }
        if self.config.validate {
            check_bipolar(batch)?;
        }
        if exceeds_capacity(n, p) {
            tracing::debug!(
                "{} patterns over {} units exceeds Hebbian capacity ({:.1}); recall will degrade",
                p,
                n,
                hebbian_capacity(n),
            );
        }
        tracing::debug!(
            "Building {}x{} weight matrix from {} patterns ({:?})",
            n,
            n,
            p,
            self.config.strategy,
        );

        let acc = match self.config.strategy {
            Strategy::Pairwise => accumulate_pairwise(batch)?,
            Strategy::OuterProduct => accumulate_outer(batch)?,
            Strategy::Parallel => accumulate_parallel(batch, self.config.parallel_chunk)?,
        };
        acc.finish()
    }
}

/// Build with the default configuration.
pub fn build_weights<D: Dimension>(patterns: ArrayView<'_, f64, D>) -> Result<WeightMatrix> {
    WeightMatrixBuilder::default().build(patterns)
}

// ──────────────────────────────────────────────────────────────
// Strategies
// ──────────────────────────────────────────────────────────────

fn accumulate_pairwise(batch: ArrayView2<'_, f64>) -> Result<Accumulation> {
    let mut acc = Accumulation::new(batch.ncols());
    for xi in batch.rows() {
        acc.add_pattern(xi)?;
    }
    Ok(acc)
}

fn accumulate_outer(batch: ArrayView2<'_, f64>) -> Result<Accumulation> {
    let mut acc = Accumulation::new(batch.ncols());
    if batch.nrows() == 1 {
        acc.add_outer(batch.row(0))?;
    } else {
        acc.add_batch(batch)?;
    }
    Ok(acc)
}

fn accumulate_parallel(batch: ArrayView2<'_, f64>, chunk: usize) -> Result<Accumulation> {
    let n = batch.ncols();
    let chunks: Vec<ArrayView2<'_, f64>> = batch.axis_chunks_iter(Axis(0), chunk.max(1)).collect();
    chunks
        .into_par_iter()
        .map(|part| -> Result<Accumulation> {
            let mut acc = Accumulation::new(n);
            acc.add_batch(part)?;
            Ok(acc)
        })
        .try_reduce(|| Accumulation::new(n), |a, b| a.merge(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Array3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::{DEFAULT_SEED, EQUIVALENCE_TOLERANCE};
    use crate::pattern::generate::random_batch;

    const ALL: [Strategy; 3] = [Strategy::Pairwise, Strategy::OuterProduct, Strategy::Parallel];

    fn two_patterns() -> Array2<f64> {
        array![[-1.0, 1.0, 1.0, 1.0, -1.0], [-1.0, -1.0, -1.0, -1.0, -1.0]]
    }

    fn assert_invariants(w: &WeightMatrix) {
        assert!(w.has_zero_diagonal(), "diagonal not zero:\n{}", w);
        assert!(w.is_symmetric(0.0), "not symmetric:\n{}", w);
    }

    #[test]
    fn test_two_pattern_scenario() {
        let x = two_patterns();
        for strategy in ALL {
            let w = WeightMatrixBuilder::with_strategy(strategy).build(x.view()).unwrap();
            assert_eq!(w.dim(), 5);
            assert_eq!(w.pattern_count(), 2);
            assert_invariants(&w);
            assert!((w.get(0, 1) - 0.0).abs() < 1e-12, "{:?}", strategy);
            assert!((w.get(1, 2) - 1.0).abs() < 1e-12, "{:?}", strategy);
            assert!(w.max_abs() <= 1.0);
        }
        // Past capacity on purpose; building must still succeed.
        assert!(exceeds_capacity(5, 2));
    }

    #[test]
    fn test_single_pattern_is_outer_product() {
        let xi = array![1.0, -1.0, -1.0, 1.0];
        for strategy in ALL {
            let w = WeightMatrixBuilder::with_strategy(strategy).build(xi.view()).unwrap();
            assert_eq!(w.pattern_count(), 1);
            assert_invariants(&w);
            for i in 0..4 {
                for j in 0..4 {
                    if i != j {
                        assert_eq!(w.get(i, j), xi[i] * xi[j]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_single_unit_is_zero() {
        for strategy in ALL {
            let builder = WeightMatrixBuilder::with_strategy(strategy);
            let up = builder.build(array![1.0].view()).unwrap();
            let down = builder.build(array![[-1.0], [1.0], [-1.0]].view()).unwrap();
            assert_eq!(up.as_array(), &array![[0.0]]);
            assert_eq!(down.as_array(), &array![[0.0]]);
        }
    }

    #[test]
    fn test_strategies_agree_on_random_batches() {
        let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);
        for (n, p) in [(7, 3), (40, 5), (100, 130)] {
            let batch = random_batch(n, p, &mut rng).unwrap();
            let x = batch.to_f64();
            let pairwise = WeightMatrixBuilder::with_strategy(Strategy::Pairwise)
                .build(x.view())
                .unwrap();
            let outer = WeightMatrixBuilder::with_strategy(Strategy::OuterProduct)
                .build(x.view())
                .unwrap();
            let parallel = WeightMatrixBuilder::new(BuilderConfig {
                strategy: Strategy::Parallel,
                parallel_chunk: 16,
                ..Default::default()
            })
            .build(x.view())
            .unwrap();

            assert!(pairwise.approx_eq(&outer, EQUIVALENCE_TOLERANCE), "n={} p={}", n, p);
            assert!(pairwise.approx_eq(&parallel, EQUIVALENCE_TOLERANCE), "n={} p={}", n, p);
            assert_invariants(&parallel);
        }
    }

    #[test]
    fn test_linearity_in_batch_size() {
        let x = two_patterns();
        let mut first = Accumulation::new(5);
        first.add_pattern(x.row(0)).unwrap();
        let mut second = Accumulation::new(5);
        second.add_pattern(x.row(1)).unwrap();
        let averaged = (first.sum() + second.sum()) / 2.0;

        let direct = build_weights(x.view()).unwrap();
        for i in 0..5 {
            for j in 0..5 {
                if i != j {
                    assert!((averaged[[i, j]] - direct.get(i, j)).abs() < 1e-12);
                }
            }
        }

        let merged = first.merge(second).unwrap().finish().unwrap();
        assert!(merged.approx_eq(&direct, EQUIVALENCE_TOLERANCE));
    }

    #[test]
    fn test_pattern_and_complement_store_identically() {
        let p = Pattern::new(vec![1, -1, 1, 1, -1, -1]).unwrap();
        let builder = WeightMatrixBuilder::default();
        let a = builder.build_pattern(&p).unwrap();
        let b = builder.build_pattern(&p.complement()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pattern_with_its_complement_equals_pattern_alone() {
        let patterns: Vec<Pattern> = ["-1,1,1,1,-1", "1,-1,-1,-1,1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let builder = WeightMatrixBuilder::with_strategy(Strategy::Pairwise);
        let both = builder.build_patterns(&patterns).unwrap();
        let alone = builder.build_pattern(&patterns[0]).unwrap();
        assert_eq!(both.pattern_count(), 2);
        assert!(both.approx_eq(&alone, EQUIVALENCE_TOLERANCE));
        assert_eq!(both.get(0, 4), 1.0);
        assert_eq!(both.get(0, 1), -1.0);
    }

    #[test]
    fn test_typed_entry_points_match_raw() {
        let raw = two_patterns();
        let patterns: Vec<Pattern> = raw
            .rows()
            .into_iter()
            .map(|r| Pattern::new(r.iter().map(|&v| v as i8).collect()).unwrap())
            .collect();
        let builder = WeightMatrixBuilder::default();
        let from_raw = builder.build(raw.view()).unwrap();
        let from_slice = builder.build_patterns(&patterns).unwrap();
        let from_batch = builder
            .build_batch(&PatternBatch::from_patterns(&patterns).unwrap())
            .unwrap();
        assert_eq!(from_raw, from_slice);
        assert_eq!(from_raw, from_batch);
    }

    #[test]
    fn test_empty_batch() {
        let empty = Array2::<f64>::zeros((0, 5));
        for strategy in ALL {
            let err = WeightMatrixBuilder::with_strategy(strategy)
                .build(empty.view())
                .unwrap_err();
            assert!(matches!(err, HebbianError::EmptyBatch));
        }
        assert!(matches!(
            WeightMatrixBuilder::default().build_patterns(&[]),
            Err(HebbianError::EmptyBatch)
        ));
    }

    #[test]
    fn test_three_dimensional_input_is_invalid_shape() {
        let cube = Array3::<f64>::ones((2, 3, 4));
        let err = build_weights(cube.view()).unwrap_err();
        match err {
            HebbianError::InvalidShape { shape } => assert_eq!(shape, vec![2, 3, 4]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scalar_and_zero_width_are_invalid_shape() {
        let scalar = ndarray::arr0(1.0);
        assert!(matches!(
            build_weights(scalar.view()),
            Err(HebbianError::InvalidShape { .. })
        ));
        let no_units = Array2::<f64>::zeros((3, 0));
        assert!(matches!(
            build_weights(no_units.view()),
            Err(HebbianError::InvalidShape { .. })
        ));
        let empty_pattern = ndarray::Array1::<f64>::zeros(0);
        assert!(matches!(
            build_weights(empty_pattern.view()),
            Err(HebbianError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_malformed_pattern_rejected_when_validating() {
        let x = array![[1.0, -1.0, 1.0], [1.0, 0.0, -1.0]];
        let err = build_weights(x.view()).unwrap_err();
        assert!(matches!(
            err,
            HebbianError::MalformedPattern { pattern: 1, index: 1, .. }
        ));
    }

    #[test]
    fn test_unvalidated_input_is_folded_as_is() {
        let x = array![[2.0, 0.5, 1.0]];
        let builder = WeightMatrixBuilder::new(BuilderConfig {
            validate: false,
            ..Default::default()
        });
        let w = builder.build(x.view()).unwrap();
        assert_invariants(&w);
        assert!((w.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((w.get(0, 2) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_config() {
        let cfg = BuilderConfig::default();
        assert_eq!(cfg.strategy, Strategy::OuterProduct);
        assert!(cfg.validate);
        assert_eq!(cfg.parallel_chunk, DEFAULT_PARALLEL_CHUNK);
    }

    #[test]
    fn test_parallel_chunk_of_zero_still_builds() {
        let builder = WeightMatrixBuilder::new(BuilderConfig {
            strategy: Strategy::Parallel,
            parallel_chunk: 0,
            ..Default::default()
        });
        let w = builder.build(two_patterns().view()).unwrap();
        assert!((w.get(1, 2) - 1.0).abs() < 1e-12);
    }
}
