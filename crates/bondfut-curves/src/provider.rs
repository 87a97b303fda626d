//! Named curve providers.
//!
//! Pricers never hold curves directly. They ask a [`CurveProvider`] for the
//! discount factor of a named curve, so a bond can discount on its issuer
//! curve while the delivery discount factor comes from the same lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Source of discount factors and forward rates keyed by curve name.
pub trait CurveProvider: Send + Sync {
    /// Returns the curve registered under `name`.
    fn curve(&self, name: &str) -> CurveResult<&dyn Curve>;

    /// Discount factor of curve `name` at time `t`.
    fn discount_factor(&self, name: &str, t: f64) -> CurveResult<f64> {
        self.curve(name)?.discount_factor(t)
    }

    /// Simply compounded forward rate of `index` over `[t1, t2]` with the
    /// given accrual factor: `(DF(t1) / DF(t2) - 1) / accrual_factor`.
    fn forward_rate(
        &self,
        index: &str,
        t1: f64,
        t2: f64,
        accrual_factor: f64,
    ) -> CurveResult<f64> {
        if accrual_factor <= 0.0 || !accrual_factor.is_finite() {
            return Err(CurveError::invalid_input(format!(
                "accrual factor must be positive, got {accrual_factor}"
            )));
        }
        let curve = self.curve(index)?;
        let df1 = curve.discount_factor(t1)?;
        let df2 = curve.discount_factor(t2)?;
        Ok((df1 / df2 - 1.0) / accrual_factor)
    }
}

/// A set of curves keyed by name.
///
/// Curves are shared behind `Arc`, so cloning a set is cheap and a bumped
/// copy can replace a single curve without touching the others.
///
/// # Example
///
/// ```rust
/// use bondfut_curves::{CurveProvider, CurveSet, FlatCurve};
///
/// let curves = CurveSet::new()
///     .with_curve("USD-TSY", FlatCurve::new(0.04))
///     .with_curve("USD-SOFR", FlatCurve::new(0.045));
///
/// let df = curves.discount_factor("USD-TSY", 1.0).unwrap();
/// assert!((df - (-0.04f64).exp()).abs() < 1e-15);
/// assert!(curves.discount_factor("EUR-BUND", 1.0).is_err());
/// ```
#[derive(Clone, Default)]
pub struct CurveSet {
    curves: HashMap<String, Arc<dyn Curve>>,
}

impl fmt::Debug for CurveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.curves.keys().collect();
        names.sort();
        f.debug_struct("CurveSet").field("curves", &names).finish()
    }
}

impl CurveSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a curve, builder style.
    #[must_use]
    pub fn with_curve(mut self, name: impl Into<String>, curve: impl Curve + 'static) -> Self {
        self.insert(name, Arc::new(curve));
        self
    }

    /// Adds (or replaces) a shared curve, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        curve: Arc<dyn Curve>,
    ) -> Option<Arc<dyn Curve>> {
        self.curves.insert(name.into(), curve)
    }

    /// Returns the shared handle of curve `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Curve>> {
        self.curves.get(name)
    }

    /// Returns a copy of this set where curve `name` is replaced.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::UnknownCurve` if `name` is not in the set.
    pub fn replaced(&self, name: &str, curve: impl Curve + 'static) -> CurveResult<Self> {
        if !self.curves.contains_key(name) {
            return Err(CurveError::unknown_curve(name));
        }
        Ok(self.clone().with_curve(name, curve))
    }

    /// Curve names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.curves.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// True if the set holds no curves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

impl CurveProvider for CurveSet {
    fn curve(&self, name: &str) -> CurveResult<&dyn Curve> {
        self.curves
            .get(name)
            .map(|curve| curve.as_ref())
            .ok_or_else(|| CurveError::unknown_curve(name))
    }
}

impl<P: CurveProvider + ?Sized> CurveProvider for Arc<P> {
    fn curve(&self, name: &str) -> CurveResult<&dyn Curve> {
        (**self).curve(name)
    }
}
