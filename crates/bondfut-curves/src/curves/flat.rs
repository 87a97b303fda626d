use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// A curve with a constant continuously compounded zero rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve {
    rate: f64,
}

impl FlatCurve {
    /// Creates a flat curve at `rate`.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Returns the zero rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Curve for FlatCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        if !t.is_finite() {
            return Err(CurveError::invalid_input(format!("time must be finite, got {t}")));
        }
        if t <= 0.0 {
            return Ok(1.0);
        }
        Ok((-self.rate * t).exp())
    }

    fn zero_rate(&self, _t: f64) -> CurveResult<f64> {
        Ok(self.rate)
    }
}
