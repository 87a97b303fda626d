//! Error types for bond futures pricing.
//!
//! Lower-level curve and math errors convert into [`PricingError`] so `?`
//! propagates them. Math errors that signal an exhausted budget become
//! [`PricingError::ConvergenceFailure`] tagged with the algorithm that ran out.

use std::fmt;

use bondfut_curves::CurveError;
use bondfut_math::MathError;
use thiserror::Error;

/// A specialized Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// The numerical stage that failed to converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStage {
    /// Widening a window around a CTD transition until it brackets a sign change.
    Bracketing,
    /// Refining a switch point with Ridder's method.
    RootRefinement,
    /// Adaptive Runge-Kutta quadrature.
    Integration,
}

impl fmt::Display for ConvergenceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConvergenceStage::Bracketing => "switch point bracketing",
            ConvergenceStage::RootRefinement => "switch point refinement",
            ConvergenceStage::Integration => "numerical integration",
        };
        f.write_str(name)
    }
}

/// Error types for pricing operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    /// Inputs are inconsistent or out of range.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the problem.
        reason: String,
    },

    /// An iterative algorithm exhausted its budget.
    #[error("{stage} failed to converge: {reason}")]
    ConvergenceFailure {
        /// The algorithm that failed.
        stage: ConvergenceStage,
        /// Details from the algorithm.
        reason: String,
    },

    /// A curve lookup failed.
    #[error("curve error: {0}")]
    Curve(#[from] CurveError),
}

impl PricingError {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Creates a convergence failure.
    #[must_use]
    pub fn convergence(stage: ConvergenceStage, reason: impl Into<String>) -> Self {
        Self::ConvergenceFailure {
            stage,
            reason: reason.into(),
        }
    }

    /// Returns true for convergence failures.
    #[must_use]
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, Self::ConvergenceFailure { .. })
    }
}

impl From<MathError> for PricingError {
    fn from(err: MathError) -> Self {
        let stage = match err {
            MathError::BracketingFailed { .. } => ConvergenceStage::Bracketing,
            MathError::ConvergenceFailed { .. } | MathError::InvalidBracket { .. } => {
                ConvergenceStage::RootRefinement
            }
            MathError::IntegrationFailed { .. } => ConvergenceStage::Integration,
            MathError::InsufficientData { .. } | MathError::InvalidInput { .. } => {
                return Self::invalid_argument(err.to_string());
            }
        };
        Self::convergence(stage, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_errors_map_to_stages() {
        let err: PricingError = MathError::BracketingFailed {
            lower: -0.01,
            upper: 0.01,
            steps: 0,
        }
        .into();
        assert!(matches!(
            err,
            PricingError::ConvergenceFailure {
                stage: ConvergenceStage::Bracketing,
                ..
            }
        ));

        let err: PricingError = MathError::convergence_failed(100, 1e-3).into();
        assert!(matches!(
            err,
            PricingError::ConvergenceFailure {
                stage: ConvergenceStage::RootRefinement,
                ..
            }
        ));

        let err: PricingError = MathError::invalid_input("grid too small").into();
        assert!(matches!(err, PricingError::InvalidArgument { .. }));
        assert!(!err.is_convergence_failure());
    }

    #[test]
    fn test_curve_error_converts() {
        let err: PricingError = CurveError::unknown_curve("USD-TSY").into();
        assert_eq!(err.to_string(), "curve error: Unknown curve: USD-TSY");
    }

    #[test]
    fn test_display() {
        let err = PricingError::convergence(ConvergenceStage::Integration, "budget exhausted");
        assert_eq!(
            err.to_string(),
            "numerical integration failed to converge: budget exhausted"
        );
    }
}
