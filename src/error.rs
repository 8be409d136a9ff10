//! Error types for hebbian

use thiserror::Error;

/// Hebbian error type
#[derive(Debug, Error)]
pub enum HebbianError {
    /// Pattern argument is neither a single pattern (rank 1) nor a batch
    /// (rank 2), or has zero units.
    #[error("Invalid pattern shape {shape:?}: expected [N] or [P, N] with N >= 1")]
    InvalidShape { shape: Vec<usize> },

    /// Zero patterns supplied.
    #[error("Empty pattern batch")]
    EmptyBatch,

    /// An element outside {-1, +1}.
    #[error("Malformed pattern {pattern}: element {index} is {value}, expected -1 or +1")]
    MalformedPattern {
        pattern: usize,
        index: usize,
        value: f64,
    },

    /// Patterns or accumulations over different unit counts.
    #[error("Dimension mismatch: expected {expected} units, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Flip distance larger than the pattern.
    #[error("Hamming distance {distance} exceeds pattern length {len}")]
    InvalidDistance { distance: usize, len: usize },

    /// Bernoulli bias outside [0, 1].
    #[error("Invalid probability: {0}")]
    InvalidProbability(f64),

    /// Textual pattern that does not parse.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Stored matrix violating the weight-matrix invariants.
    #[error("Corrupt weight matrix: {0}")]
    CorruptMatrix(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary format error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, HebbianError>;
