//! Un-normalised Hebbian accumulation.
//!
//! Every build strategy funnels through this type: patterns are folded into
//! a running sum of outer products, partial sums merge by plain addition,
//! and [`Accumulation::finish`] is the single place where the sum is divided
//! by the pattern count and the diagonal is cleared.
//!
//! The diagonal of the running sum is unspecified (the pairwise fold leaves
//! it at zero, the outer-product folds put P there); only the finished
//! matrix is guaranteed zero on the diagonal.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{HebbianError, Result};
use crate::weights::matrix::WeightMatrix;

/// Running sum Σ_k ξ_k ⊗ ξ_k over `count` patterns of `n` units.
#[derive(Clone, Debug)]
pub struct Accumulation {
    sum: Array2<f64>,
    count: usize,
}

impl Accumulation {
    /// Empty accumulation over `n` units.
    pub fn new(n: usize) -> Self {
        Self {
            sum: Array2::zeros((n, n)),
            count: 0,
        }
    }

    /// Number of units (N).
    pub fn units(&self) -> usize {
        self.sum.nrows()
    }

    /// Patterns folded in so far (P).
    pub fn count(&self) -> usize {
        self.count
    }

    /// The raw, un-normalised sum.
    pub fn sum(&self) -> &Array2<f64> {
        &self.sum
    }

    /// Pairwise fold: for every i < j add ξ[i]·ξ[j] to both W[i][j] and
    /// W[j][i]. The diagonal is never touched.
    pub fn add_pattern(&mut self, xi: ArrayView1<'_, f64>) -> Result<()> {
        let n = self.check_units(xi.len())?;
        for i in 0..n {
            let xi_i = xi[i];
            for j in (i + 1)..n {
                let v = xi_i * xi[j];
                self.sum[[i, j]] += v;
                self.sum[[j, i]] += v;
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Outer-product fold of one pattern: sum += ξ ⊗ ξ.
    pub fn add_outer(&mut self, xi: ArrayView1<'_, f64>) -> Result<()> {
        self.check_units(xi.len())?;
        let col = xi.insert_axis(Axis(1));
        let row = xi.insert_axis(Axis(0));
        self.sum += &col.dot(&row);
        self.count += 1;
        Ok(())
    }

    /// Contraction fold of a P×N batch along the pattern axis:
    /// sum += Xᵀ·X.
    pub fn add_batch(&mut self, batch: ArrayView2<'_, f64>) -> Result<()> {
        self.check_units(batch.ncols())?;
        self.sum += &batch.t().dot(&batch);
        self.count += batch.nrows();
        Ok(())
    }

    /// Combine two partial accumulations over the same units.
    pub fn merge(mut self, other: Accumulation) -> Result<Self> {
        self.check_units(other.units())?;
        self.sum += &other.sum;
        self.count += other.count;
        Ok(self)
    }

    /// Normalise by the pattern count, mirror the upper triangle onto the
    /// lower one and zero the diagonal.
    ///
    /// Fails with `InvalidShape` over zero units and `EmptyBatch` when no
    /// pattern was folded in.
    pub fn finish(self) -> Result<WeightMatrix> {
        if self.units() == 0 {
            return Err(HebbianError::InvalidShape { shape: vec![0, 0] });
        }
        if self.count == 0 {
            return Err(HebbianError::EmptyBatch);
        }
        let n = self.units();
        let mut weights = self.sum / self.count as f64;
        for i in 0..n {
            for j in 0..i {
                weights[[i, j]] = weights[[j, i]];
            }
        }
        weights.diag_mut().fill(0.0);
        Ok(WeightMatrix::from_parts(weights, self.count))
    }

    fn check_units(&self, actual: usize) -> Result<usize> {
        let expected = self.units();
        if expected != actual {
            return Err(HebbianError::DimensionMismatch { expected, actual });
        }
        Ok(expected)
    }
}
