//! Bipolar training patterns.
//!
//! - **Pattern** / **PatternBatch**: validated ±1 vectors and P×N stacks
//! - **Generators**: uniform random patterns and fixed-radius perturbations

pub mod bipolar;
pub mod generate;

pub use bipolar::{Pattern, PatternBatch};
