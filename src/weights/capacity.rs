//! Storage-capacity estimates for Hebbian networks.
//!
//! - `N / (2 ln N)`: random patterns stored with recall of almost every
//!   pattern intact
//! - `N / sqrt(2 ln N)`: ceiling past which sweeps over the trained-pattern
//!   count stop being informative
//!
//! Both are undefined for N < 2 and reported as zero.

/// Patterns a network of `n` units stores reliably: `n / (2 ln n)`.
pub fn hebbian_capacity(n: usize) -> f64 {
    if n < 2 {
        return 0.0;
    }
    let n = n as f64;
    n / (2.0 * n.ln())
}

/// Upper bound on useful training-set sizes: `ceil(n / sqrt(2 ln n))`.
pub fn absolute_capacity(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let n = n as f64;
    (n / (2.0 * n.ln()).sqrt()).ceil() as usize
}

/// Whether `patterns` exceeds [`hebbian_capacity`] for `n` units.
pub fn exceeds_capacity(n: usize, patterns: usize) -> bool {
    n >= 2 && patterns as f64 > hebbian_capacity(n)
}
