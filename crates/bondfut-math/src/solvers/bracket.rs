//! Root bracketing by geometric window expansion.

use crate::error::{MathError, MathResult};

/// Controls how far [`bracket_root`] may widen its starting window.
#[derive(Debug, Clone, Copy)]
pub struct BracketConfig {
    /// Growth applied to the window each expansion step.
    pub ratio: f64,
    /// Maximum number of expansion steps. Zero means only the starting window is tried.
    pub max_steps: u32,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            ratio: 1.6,
            max_steps: 50,
        }
    }
}

impl BracketConfig {
    /// Creates a bracketing configuration.
    #[must_use]
    pub fn new(ratio: f64, max_steps: u32) -> Self {
        Self { ratio, max_steps }
    }

    /// A configuration that never widens the starting window.
    #[must_use]
    pub fn fixed_window() -> Self {
        Self {
            ratio: 1.6,
            max_steps: 0,
        }
    }
}

/// Finds an interval `(lo, hi)` on which `f` changes sign, starting from `[x1, x2]`.
///
/// Each step moves the end whose residual is smaller in magnitude outwards by
/// `ratio` times the current width.
///
/// # Errors
///
/// Returns `MathError::InvalidInput` if `x1 == x2`, and
/// `MathError::BracketingFailed` if no sign change is found within the budget.
pub fn bracket_root<F>(f: F, x1: f64, x2: f64, config: &BracketConfig) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if x1 == x2 {
        return Err(MathError::invalid_input(
            "bracketing window must have non-zero width",
        ));
    }

    let mut lo = x1.min(x2);
    let mut hi = x1.max(x2);
    let mut f_lo = f(lo);
    let mut f_hi = f(hi);

    for step in 0..=config.max_steps {
        if f_lo * f_hi <= 0.0 {
            log::trace!("bracket [{lo}, {hi}] found after {step} expansions");
            return Ok((lo, hi));
        }
        if step == config.max_steps {
            break;
        }
        if f_lo.abs() < f_hi.abs() {
            lo += config.ratio * (lo - hi);
            f_lo = f(lo);
        } else {
            hi += config.ratio * (hi - lo);
            f_hi = f(hi);
        }
    }

    Err(MathError::BracketingFailed {
        lower: lo,
        upper: hi,
        steps: config.max_steps,
    })
}
