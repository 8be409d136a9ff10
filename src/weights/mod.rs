//! Hebbian weight matrices.
//!
//! - **Builder**: patterns in, symmetric zero-diagonal matrix out
//! - **Accumulation**: mergeable un-normalised outer-product sums
//! - **WeightMatrix**: the finished, read-only result with persistence
//! - **Capacity**: classical storage-capacity estimates

pub mod accumulate;
pub mod builder;
pub mod capacity;
pub mod matrix;

pub use accumulate::Accumulation;
pub use builder::{build_weights, BuilderConfig, Strategy, WeightMatrixBuilder};
pub use matrix::WeightMatrix;
