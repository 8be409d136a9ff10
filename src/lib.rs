//! # hebbian
//!
//! Hebbian weight-matrix construction for Hopfield-style associative
//! memories over bipolar (±1) patterns.
//!
//! ## Components
//!
//! 1. **Patterns** — validated bipolar vectors, batches and generators
//! 2. **Builder** — patterns in, N×N symmetric zero-diagonal matrix out
//! 3. **Accumulation** — mergeable outer-product sums behind every strategy
//! 4. **WeightMatrix** — the finished, read-only result with persistence
//!
//! ## Example
//!
//! ```
//! use hebbian::pattern::Pattern;
//! use hebbian::weights::WeightMatrixBuilder;
//!
//! let patterns = vec![
//!     "-1,1,1,1,-1".parse::<Pattern>().unwrap(),
//!     "-1,-1,-1,-1,-1".parse::<Pattern>().unwrap(),
//! ];
//! let w = WeightMatrixBuilder::default().build_patterns(&patterns).unwrap();
//! assert_eq!(w.get(1, 2), 1.0);
//! assert_eq!(w.get(3, 3), 0.0);
//! ```

pub mod error;
pub mod pattern;
pub mod weights;

pub use error::{HebbianError, Result};

/// Crate-wide constants.
pub mod config {
    /// Seed used by the CLI and tests when none is given.
    pub const DEFAULT_SEED: u64 = 42;

    /// Relative tolerance when comparing matrices built by different
    /// strategies.
    pub const EQUIVALENCE_TOLERANCE: f64 = 1e-9;

    /// Patterns per rayon task for the parallel strategy.
    pub const DEFAULT_PARALLEL_CHUNK: usize = 64;

    /// Units per random pattern when the CLI is given no explicit patterns.
    pub const DEFAULT_NEURONS: usize = 25;

    /// Random patterns generated when the CLI is given no explicit patterns.
    pub const DEFAULT_PATTERNS: usize = 3;
}
