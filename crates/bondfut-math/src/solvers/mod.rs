//! Root-finding algorithms.
//!
//! - [`bracket_root`]: expands a starting window until the function changes sign
//! - [`ridder`]: Ridder's method on a bracketing interval
//!
//! The two are used together to locate the points where the
//! cheapest-to-deliver bond switches:
//!
//! ```rust
//! use bondfut_math::solvers::{bracket_root, ridder, BracketConfig, SolverConfig};
//!
//! let f = |x: f64| x * x * x - x - 2.0;
//! let (lo, hi) = bracket_root(f, 1.5, 1.51, &BracketConfig::default()).unwrap();
//! let result = ridder(f, lo, hi, &SolverConfig::default()).unwrap();
//! assert!(f(result.root).abs() < 1e-8);
//! ```

mod bracket;
mod ridder;

pub use bracket::{bracket_root, BracketConfig};
pub use ridder::ridder;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Absolute tolerance on the root location.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}
