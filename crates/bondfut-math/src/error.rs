//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone)]
pub enum MathError {
    /// Root-finding algorithm failed to converge.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// Bracket expansion did not reach a sign change.
    #[error("Failed to bracket a root after {steps} expansions (last window [{lower}, {upper}])")]
    BracketingFailed {
        /// Lower end of the last window tried.
        lower: f64,
        /// Upper end of the last window tried.
        upper: f64,
        /// Number of expansion steps performed.
        steps: u32,
    },

    /// Adaptive integration exhausted its refinement or evaluation budget.
    #[error("Integration did not converge on [{lower}, {upper}] after {evaluations} evaluations: {reason}")]
    IntegrationFailed {
        /// Lower end of the sub-interval that failed.
        lower: f64,
        /// Upper end of the sub-interval that failed.
        upper: f64,
        /// Function evaluations spent.
        evaluations: u64,
        /// What ran out.
        reason: String,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Returns true for the failures caused by an exhausted numerical budget,
    /// as opposed to bad inputs.
    #[must_use]
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            Self::ConvergenceFailed { .. }
                | Self::InvalidBracket { .. }
                | Self::BracketingFailed { .. }
                | Self::IntegrationFailed { .. }
        )
    }
}
