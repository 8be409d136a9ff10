//! Bipolar pattern types.
//!
//! A pattern is a vector over N units with every component in {-1, +1}.
//! Both containers validate that on construction, so anything holding a
//! `Pattern` or `PatternBatch` can feed the weight builder without a
//! second check.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::seq::index;
use rand::Rng;
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};

use crate::error::{HebbianError, Result};

/// A single bipolar memory over N units.
///
/// Deserialisation goes through [`Pattern::from_array`], so a decoded
/// pattern is as valid as a constructed one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array1<i8>", into = "Array1<i8>")]
pub struct Pattern {
    data: Array1<i8>,
}

impl Pattern {
    /// Build from raw values. Every value must be -1 or +1.
    pub fn new(values: Vec<i8>) -> Result<Self> {
        Self::from_array(Array1::from_vec(values))
    }

    /// Build from an existing array. Every value must be -1 or +1.
    pub fn from_array(data: Array1<i8>) -> Result<Self> {
        if data.is_empty() {
            return Err(HebbianError::InvalidShape { shape: vec![0] });
        }
        if let Some((index, &value)) = data.iter().enumerate().find(|&(_, &v)| !is_bipolar_i8(v)) {
            return Err(HebbianError::MalformedPattern {
                pattern: 0,
                index,
                value: value as f64,
            });
        }
        Ok(Self { data })
    }

    /// Uniformly random pattern: each unit is +1 with probability 1/2.
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self> {
        Self::random_biased(n, 0.5, rng)
    }

    /// Random pattern where each unit is +1 with probability `p`.
    pub fn random_biased<R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> Result<Self> {
        if n == 0 {
            return Err(HebbianError::InvalidShape { shape: vec![0] });
        }
        let coin = Bernoulli::new(p).map_err(|_| HebbianError::InvalidProbability(p))?;
        let data: Array1<i8> = (0..n)
            .map(|_| if coin.sample(rng) { 1 } else { -1 })
            .collect();
        Ok(Self { data })
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: patterns have at least one unit.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value of unit `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn get(&self, i: usize) -> i8 {
        self.data[i]
    }

    pub fn as_array(&self) -> &Array1<i8> {
        &self.data
    }

    pub fn view(&self) -> ArrayView1<'_, i8> {
        self.data.view()
    }

    /// Widen to `f64` for arithmetic.
    pub fn to_f64(&self) -> Array1<f64> {
        self.data.mapv(f64::from)
    }

    /// Flip unit `i` in place.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn flip(&mut self, i: usize) {
        self.data[i] = -self.data[i];
    }

    /// Every unit flipped. A Hebbian matrix stores ξ and -ξ identically.
    pub fn complement(&self) -> Pattern {
        Pattern {
            data: self.data.mapv(|v| -v),
        }
    }

    /// Copy with exactly `distance` distinct units flipped.
    pub fn with_flips<R: Rng + ?Sized>(&self, distance: usize, rng: &mut R) -> Result<Pattern> {
        if distance > self.len() {
            return Err(HebbianError::InvalidDistance {
                distance,
                len: self.len(),
            });
        }
        let mut out = self.clone();
        for i in index::sample(rng, self.len(), distance).iter() {
            out.flip(i);
        }
        Ok(out)
    }

    /// Number of units at which the two patterns differ.
    pub fn hamming_distance(&self, other: &Pattern) -> Result<usize> {
        self.check_len(other)?;
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .filter(|(a, b)| a != b)
            .count())
    }

    /// Normalised overlap `(1/N) Σ ξ[i]·ζ[i]`.
    /// Range: [-1, 1]. 1 = identical, -1 = complement.
    pub fn overlap(&self, other: &Pattern) -> Result<f64> {
        self.check_len(other)?;
        let dot: i64 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| i64::from(a) * i64::from(b))
            .sum();
        Ok(dot as f64 / self.len() as f64)
    }

    fn check_len(&self, other: &Pattern) -> Result<()> {
        if self.len() != other.len() {
            return Err(HebbianError::DimensionMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern(len={}, [{}])", self.len(), self)
    }
}

/// Comma separated, e.g. `-1,1,1,1,-1`. Parses back with `FromStr`.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

/// Accepts values separated by commas and/or whitespace.
impl FromStr for Pattern {
    type Err = HebbianError;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.parse::<i8>()
                    .map_err(|e| HebbianError::Parse(format!("'{}': {}", tok, e)))
            })
            .collect::<Result<Vec<i8>>>()?;
        Pattern::new(values)
    }
}

impl TryFrom<Array1<i8>> for Pattern {
    type Error = HebbianError;

    fn try_from(data: Array1<i8>) -> Result<Self> {
        Self::from_array(data)
    }
}

impl From<Pattern> for Array1<i8> {
    fn from(pattern: Pattern) -> Self {
        pattern.data
    }
}

/// P bipolar patterns over the same N units, stored row-major as P×N.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array2<i8>", into = "Array2<i8>")]
pub struct PatternBatch {
    data: Array2<i8>,
}

impl PatternBatch {
    /// Stack patterns into a batch. All must share the same length.
    pub fn from_patterns(patterns: &[Pattern]) -> Result<Self> {
        let first = patterns.first().ok_or(HebbianError::EmptyBatch)?;
        let n = first.len();
        if let Some(bad) = patterns.iter().find(|p| p.len() != n) {
            return Err(HebbianError::DimensionMismatch {
                expected: n,
                actual: bad.len(),
            });
        }
        let data = Array2::from_shape_fn((patterns.len(), n), |(k, i)| patterns[k].get(i));
        Ok(Self { data })
    }

    /// Wrap a P×N array. Every value must be -1 or +1.
    pub fn from_array(data: Array2<i8>) -> Result<Self> {
        if data.nrows() == 0 {
            return Err(HebbianError::EmptyBatch);
        }
        if data.ncols() == 0 {
            return Err(HebbianError::InvalidShape {
                shape: data.shape().to_vec(),
            });
        }
        for (k, row) in data.axis_iter(Axis(0)).enumerate() {
            if let Some((index, &value)) = row.iter().enumerate().find(|&(_, &v)| !is_bipolar_i8(v)) {
                return Err(HebbianError::MalformedPattern {
                    pattern: k,
                    index,
                    value: value as f64,
                });
            }
        }
        Ok(Self { data })
    }

    /// Number of patterns (P).
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Always false: batches hold at least one pattern.
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Units per pattern (N).
    pub fn units(&self) -> usize {
        self.data.ncols()
    }

    /// Copy of pattern `k`.
    pub fn pattern(&self, k: usize) -> Pattern {
        Pattern {
            data: self.data.row(k).to_owned(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ArrayView1<'_, i8>> {
        self.data.axis_iter(Axis(0))
    }

    pub fn as_array(&self) -> &Array2<i8> {
        &self.data
    }

    /// Widen to `f64` for arithmetic.
    pub fn to_f64(&self) -> Array2<f64> {
        self.data.mapv(f64::from)
    }
}

impl TryFrom<Array2<i8>> for PatternBatch {
    type Error = HebbianError;

    fn try_from(data: Array2<i8>) -> Result<Self> {
        Self::from_array(data)
    }
}

impl From<PatternBatch> for Array2<i8> {
    fn from(batch: PatternBatch) -> Self {
        batch.data
    }
}

fn is_bipolar_i8(v: i8) -> bool {
    v == 1 || v == -1
}

/// Locate the first element of a P×N batch that is not exactly ±1.
pub(crate) fn check_bipolar(batch: ArrayView2<'_, f64>) -> Result<()> {
    for (k, row) in batch.axis_iter(Axis(0)).enumerate() {
        if let Some((index, &value)) = row.iter().enumerate().find(|&(_, &v)| v != 1.0 && v != -1.0) {
            return Err(HebbianError::MalformedPattern {
                pattern: k,
                index,
                value,
            });
        }
    }
    Ok(())
}
