//! The finished Hebbian weight matrix.
//!
//! A `WeightMatrix` is only ever produced whole, by finishing an
//! [`Accumulation`](crate::weights::accumulate::Accumulation) or by loading
//! bytes that pass the same invariant checks. It is read-only afterwards.

use std::fmt;
use std::path::Path;

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{HebbianError, Result};

/// N×N symmetric, zero-diagonal connection strengths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeightMatrix")]
pub struct WeightMatrix {
    /// W[i][j]: strength of the connection between units i and j.
    weights: Array2<f64>,

    /// Number of patterns folded in (the normalisation divisor).
    patterns: usize,
}

/// Wire form of a [`WeightMatrix`] before its invariants are checked.
#[derive(Deserialize)]
struct RawWeightMatrix {
    weights: Array2<f64>,
    patterns: usize,
}

impl TryFrom<RawWeightMatrix> for WeightMatrix {
    type Error = HebbianError;

    fn try_from(raw: RawWeightMatrix) -> Result<Self> {
        let matrix = WeightMatrix::from_parts(raw.weights, raw.patterns);
        matrix.check_invariants()?;
        Ok(matrix)
    }
}

impl WeightMatrix {
    pub(crate) fn from_parts(weights: Array2<f64>, patterns: usize) -> Self {
        Self { weights, patterns }
    }

    /// Number of units (N).
    pub fn dim(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of patterns the matrix was built from (P).
    pub fn pattern_count(&self) -> usize {
        self.patterns
    }

    /// W[i][j].
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below [`WeightMatrix::dim`].
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.weights[[i, j]]
    }

    /// Incoming weights of unit `i`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.weights.row(i)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn into_array(self) -> Array2<f64> {
        self.weights
    }

    /// `|W[i][j] - W[j][i]| <= tol` for every pair.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.dim();
        (0..n).all(|i| (i + 1..n).all(|j| (self.weights[[i, j]] - self.weights[[j, i]]).abs() <= tol))
    }

    pub fn has_zero_diagonal(&self) -> bool {
        self.weights.diag().iter().all(|&w| w == 0.0)
    }

    /// Largest absolute entry. Bipolar training keeps this at most 1.
    pub fn max_abs(&self) -> f64 {
        self.weights.iter().fold(0.0, |m, &w| m.max(w.abs()))
    }

    /// Element-wise comparison with relative tolerance `rel_tol`.
    ///
    /// Entries are compared as `|a - b| <= rel_tol * max(|a|, |b|, 1)`, so
    /// zero entries fall back to an absolute check.
    pub fn approx_eq(&self, other: &WeightMatrix, rel_tol: f64) -> bool {
        if self.weights.dim() != other.weights.dim() {
            return false;
        }
        self.weights
            .iter()
            .zip(other.weights.iter())
            .all(|(&a, &b)| (a - b).abs() <= rel_tol * a.abs().max(b.abs()).max(1.0))
    }

    /// Serialise to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialise from bytes, rejecting anything that is not a valid
    /// weight matrix.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: RawWeightMatrix = bincode::deserialize(bytes)?;
        WeightMatrix::try_from(raw)
    }

    /// Write to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Read a matrix previously written with [`WeightMatrix::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }

    fn check_invariants(&self) -> Result<()> {
        let (rows, cols) = self.weights.dim();
        if rows != cols {
            return Err(HebbianError::CorruptMatrix(format!(
                "not square: {}x{}",
                rows, cols
            )));
        }
        if rows == 0 {
            return Err(HebbianError::CorruptMatrix("no units".into()));
        }
        if self.patterns == 0 {
            return Err(HebbianError::CorruptMatrix("built from zero patterns".into()));
        }
        if !self.has_zero_diagonal() {
            return Err(HebbianError::CorruptMatrix("non-zero diagonal".into()));
        }
        if !self.is_symmetric(0.0) {
            return Err(HebbianError::CorruptMatrix("not symmetric".into()));
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            return Err(HebbianError::CorruptMatrix("non-finite entry".into()));
        }
        Ok(())
    }
}

impl fmt::Display for WeightMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.weights.rows() {
            for (j, w) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>7.3}", w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
