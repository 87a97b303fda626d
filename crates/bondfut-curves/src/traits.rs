//! Core traits for discount curves.
//!
//! [`Curve`] is the single-curve abstraction: a discount factor function of
//! time in years. Zero and forward rates are derived from it.

use std::sync::Arc;

use crate::error::CurveResult;

/// A discount curve indexed by time in years from the valuation date.
///
/// # Example
///
/// ```rust
/// use bondfut_curves::{Curve, FlatCurve};
///
/// let curve = FlatCurve::new(0.02);
/// let df = curve.discount_factor(2.0).unwrap();
/// assert!((df - (-0.04f64).exp()).abs() < 1e-15);
/// ```
pub trait Curve: Send + Sync {
    /// Returns the discount factor to time `t`. Returns 1.0 for `t <= 0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` is not finite or the curve cannot produce a
    /// value at `t`.
    fn discount_factor(&self, t: f64) -> CurveResult<f64>;

    /// Returns the continuously compounded zero rate `-ln(DF(t)) / t`.
    ///
    /// For `t` close to zero the rate at a one-day horizon is returned.
    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        let t = t.max(1.0 / 365.0);
        let df = self.discount_factor(t)?;
        Ok(-df.ln() / t)
    }

    /// Returns the simply compounded forward rate between `t1` and `t2`.
    ///
    /// # Formula
    ///
    /// `F(t1, t2) = (DF(t1) / DF(t2) - 1) / (t2 - t1)`
    fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Ok(0.0);
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok((df1 / df2 - 1.0) / (t2 - t1))
    }
}

impl<C: Curve + ?Sized> Curve for Arc<C> {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        (**self).discount_factor(t)
    }
}

impl<C: Curve + ?Sized> Curve for &C {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        (**self).discount_factor(t)
    }
}
