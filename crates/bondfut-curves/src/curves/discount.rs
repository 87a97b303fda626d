//! Discount curve on pillars with log-linear interpolation.
//!
//! The curve is anchored at `DF(0) = 1`. Between pillars `ln DF` is linear in
//! time, which gives piecewise constant instantaneous forwards. Beyond the last
//! pillar the last zero rate is held flat.

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Discount curve defined by pillar times and discount factors.
///
/// # Example
///
/// ```rust
/// use bondfut_curves::{Curve, DiscountCurveBuilder};
///
/// let curve = DiscountCurveBuilder::new()
///     .add_pillar(0.25, 0.995)
///     .add_pillar(2.0, 0.96)
///     .build()
///     .unwrap();
///
/// assert!((curve.discount_factor(2.0).unwrap() - 0.96).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountCurve {
    times: Vec<f64>,
    log_dfs: Vec<f64>,
}

impl DiscountCurve {
    /// Creates a curve from pillar times and discount factors.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs are empty or of different lengths, if a
    /// time is not strictly positive and increasing, or if a discount factor is
    /// not strictly positive and finite.
    pub fn new(times: Vec<f64>, discount_factors: Vec<f64>) -> CurveResult<Self> {
        if times.is_empty() {
            return Err(CurveError::insufficient_points(1, 0));
        }
        if times.len() != discount_factors.len() {
            return Err(CurveError::invalid_input(format!(
                "{} pillar times but {} discount factors",
                times.len(),
                discount_factors.len()
            )));
        }

        let mut prev = 0.0;
        for (index, &t) in times.iter().enumerate() {
            if !t.is_finite() || t <= prev {
                return Err(CurveError::non_monotonic_tenors(index, prev, t));
            }
            prev = t;
        }

        let log_dfs = times
            .iter()
            .zip(&discount_factors)
            .map(|(&t, &df)| {
                if df.is_finite() && df > 0.0 {
                    Ok(df.ln())
                } else {
                    Err(CurveError::InvalidDiscountFactor { t, value: df })
                }
            })
            .collect::<CurveResult<Vec<_>>>()?;

        Ok(Self { times, log_dfs })
    }

    /// Creates a curve from continuously compounded zero rates.
    pub fn from_zero_rates(times: Vec<f64>, rates: &[f64]) -> CurveResult<Self> {
        if times.len() != rates.len() {
            return Err(CurveError::invalid_input(format!(
                "{} pillar times but {} zero rates",
                times.len(),
                rates.len()
            )));
        }
        let dfs = times
            .iter()
            .zip(rates)
            .map(|(&t, &r)| (-r * t).exp())
            .collect();
        Self::new(times, dfs)
    }

    /// Pillar times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of pillars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; a curve has at least one pillar.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Discount factor at pillar `index`.
    #[must_use]
    pub fn pillar_discount_factor(&self, index: usize) -> Option<f64> {
        self.log_dfs.get(index).map(|l| l.exp())
    }

    /// Returns a copy with the zero rate of one pillar moved by `bump`.
    ///
    /// Only the two segments adjacent to the pillar change, so a cash flow on
    /// another pillar keeps its discount factor.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not a pillar.
    pub fn with_bumped_pillar(&self, index: usize, bump: f64) -> CurveResult<Self> {
        let Some(&t) = self.times.get(index) else {
            return Err(CurveError::invalid_input(format!(
                "pillar index {index} out of range for {} pillars",
                self.times.len()
            )));
        };
        let mut bumped = self.clone();
        bumped.log_dfs[index] -= bump * t;
        Ok(bumped)
    }

    fn log_discount_factor(&self, t: f64) -> f64 {
        let last = self.times.len() - 1;
        if t >= self.times[last] {
            return self.log_dfs[last] * t / self.times[last];
        }

        let upper = self.times.partition_point(|&pillar| pillar <= t);
        let (t0, l0) = if upper == 0 {
            (0.0, 0.0)
        } else {
            (self.times[upper - 1], self.log_dfs[upper - 1])
        };
        let (t1, l1) = (self.times[upper], self.log_dfs[upper]);
        l0 + (l1 - l0) * (t - t0) / (t1 - t0)
    }
}

impl Curve for DiscountCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        if !t.is_finite() {
            return Err(CurveError::invalid_input(format!("time must be finite, got {t}")));
        }
        if t <= 0.0 {
            return Ok(1.0);
        }
        Ok(self.log_discount_factor(t).exp())
    }
}

/// Builder for [`DiscountCurve`].
#[derive(Debug, Clone, Default)]
pub struct DiscountCurveBuilder {
    pillars: Vec<(f64, f64)>,
}

impl DiscountCurveBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pillar with a discount factor.
    #[must_use]
    pub fn add_pillar(mut self, t: f64, df: f64) -> Self {
        self.pillars.push((t, df));
        self
    }

    /// Adds a pillar with a continuously compounded zero rate.
    #[must_use]
    pub fn add_zero_rate(mut self, t: f64, rate: f64) -> Self {
        self.pillars.push((t, (-rate * t).exp()));
        self
    }

    /// Builds the curve. Pillars are sorted by time first.
    pub fn build(mut self) -> CurveResult<DiscountCurve> {
        self.pillars.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (times, dfs) = self.pillars.into_iter().unzip();
        DiscountCurve::new(times, dfs)
    }
}
