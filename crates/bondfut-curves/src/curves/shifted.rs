//! Parallel shift of a curve.

use crate::error::CurveResult;
use crate::traits::Curve;

/// A curve wrapper that adds a constant spread to the continuous zero rate.
///
/// `DF_shifted(t) = DF_base(t) * exp(-spread * t)`
///
/// Works over owned curves, `Arc`s and references alike:
///
/// ```rust
/// use bondfut_curves::{Curve, FlatCurve, ShiftedCurve};
///
/// let base = FlatCurve::new(0.02);
/// let shifted = ShiftedCurve::new(&base, 0.0001);
/// assert!(shifted.discount_factor(5.0).unwrap() < base.discount_factor(5.0).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ShiftedCurve<C> {
    base: C,
    spread: f64,
}

impl<C: Curve> ShiftedCurve<C> {
    /// Creates a new shifted curve.
    pub fn new(base: C, spread: f64) -> Self {
        Self { base, spread }
    }

    /// Returns the spread applied to this curve.
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Returns a reference to the base curve.
    pub fn base(&self) -> &C {
        &self.base
    }
}

impl<C: Curve> Curve for ShiftedCurve<C> {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        let base_df = self.base.discount_factor(t)?;
        if t <= 0.0 {
            return Ok(base_df);
        }
        Ok(base_df * (-self.spread * t).exp())
    }

    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        Ok(self.base.zero_rate(t)? + self.spread)
    }
}
