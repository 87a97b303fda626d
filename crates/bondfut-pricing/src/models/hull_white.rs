//! Hull-White one-factor model with piecewise constant volatility.
//!
//! The short rate follows
//!
//! ```text
//! dr = (θ(t) - a·r) dt + σ(t) dW
//! ```
//!
//! with `σ(t) = σ_i` on `[T_i, T_{i+1})`, `T_0 = 0` and `T_last = ∞`. Zero
//! coupon bond volatilities are `ν(s, u) = σ(s) (1 - e^{-a(u - s)}) / a`, and
//! the two quantities needed for futures pricing are closed-form integrals of
//! products of `ν` over the volatility segments.
//!
//! All functions are stateless and safe to call from any thread.

use std::fmt;

use bondfut_curves::{Currency, Curve, CurveProvider, CurveResult};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

/// Mean reversion and piecewise constant volatility.
///
/// `volatility[i]` applies between `volatility_times[i - 1]` and
/// `volatility_times[i]`, with the first segment starting at 0 and the last
/// one open ended.
///
/// # Example
///
/// ```rust
/// use bondfut_pricing::models::HullWhiteParameters;
///
/// let flat = HullWhiteParameters::constant(0.03, 0.01).unwrap();
/// let stepped = HullWhiteParameters::new(0.03, vec![0.008, 0.01], vec![1.0]).unwrap();
/// assert_eq!(flat.volatility().len(), 1);
/// assert_eq!(stepped.volatility_times(), &[1.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HullWhiteParametersRaw")]
pub struct HullWhiteParameters {
    mean_reversion: f64,
    volatility: Vec<f64>,
    volatility_times: Vec<f64>,
}

#[derive(Deserialize)]
struct HullWhiteParametersRaw {
    mean_reversion: f64,
    volatility: Vec<f64>,
    #[serde(default)]
    volatility_times: Vec<f64>,
}

impl TryFrom<HullWhiteParametersRaw> for HullWhiteParameters {
    type Error = PricingError;

    fn try_from(raw: HullWhiteParametersRaw) -> PricingResult<Self> {
        Self::new(raw.mean_reversion, raw.volatility, raw.volatility_times)
    }
}

impl HullWhiteParameters {
    /// Creates parameters from mean reversion, volatilities and the interior
    /// times at which the volatility changes.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidArgument` unless `mean_reversion > 0`,
    /// `volatility.len() == volatility_times.len() + 1`, every volatility is
    /// non-negative and the times are positive and strictly increasing.
    pub fn new(
        mean_reversion: f64,
        volatility: Vec<f64>,
        volatility_times: Vec<f64>,
    ) -> PricingResult<Self> {
        if !(mean_reversion > 0.0 && mean_reversion.is_finite()) {
            return Err(PricingError::invalid_argument(format!(
                "mean reversion must be positive, got {mean_reversion}"
            )));
        }
        if volatility.len() != volatility_times.len() + 1 {
            return Err(PricingError::invalid_argument(format!(
                "{} volatilities need {} switch times, got {}",
                volatility.len(),
                volatility.len().saturating_sub(1),
                volatility_times.len()
            )));
        }
        if let Some(bad) = volatility.iter().find(|v| !(**v >= 0.0 && v.is_finite())) {
            return Err(PricingError::invalid_argument(format!(
                "volatility must be non-negative, got {bad}"
            )));
        }
        let mut prev = 0.0;
        for &t in &volatility_times {
            if !(t > prev && t.is_finite()) {
                return Err(PricingError::invalid_argument(format!(
                    "volatility times must be positive and increasing, got {t} after {prev}"
                )));
            }
            prev = t;
        }

        Ok(Self {
            mean_reversion,
            volatility,
            volatility_times,
        })
    }

    /// Creates parameters with a single volatility.
    pub fn constant(mean_reversion: f64, volatility: f64) -> PricingResult<Self> {
        Self::new(mean_reversion, vec![volatility], Vec::new())
    }

    /// Mean reversion `a`.
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    /// Piecewise volatilities.
    pub fn volatility(&self) -> &[f64] {
        &self.volatility
    }

    /// Interior volatility switch times.
    pub fn volatility_times(&self) -> &[f64] {
        &self.volatility_times
    }

    /// Segments of `[start, end]` as `(volatility index, lower, upper)`.
    fn segments(&self, start: f64, end: f64) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        (0..self.volatility.len()).filter_map(move |i| {
            let lo = if i == 0 { 0.0 } else { self.volatility_times[i - 1] };
            let hi = self.volatility_times.get(i).copied().unwrap_or(f64::INFINITY);
            let lo = lo.max(start);
            let hi = hi.min(end);
            (hi > lo).then_some((i, lo, hi))
        })
    }
}

/// Volatility of the ratio `P(·, maturity) / P(·, numeraire_time)` accumulated
/// over `[start, end]`.
///
/// ```text
/// α² = ∫_start^end (ν(s, maturity) - ν(s, numeraire_time))² ds
/// ```
///
/// For a bond paying after the numeraire date the result is positive.
pub fn alpha(
    parameters: &HullWhiteParameters,
    start: f64,
    end: f64,
    numeraire_time: f64,
    maturity: f64,
) -> f64 {
    let a = parameters.mean_reversion;
    let factor1 = (-a * numeraire_time).exp() - (-a * maturity).exp();
    let numerator = 2.0 * a * a * a;
    let factor2: f64 = parameters
        .segments(start, end)
        .map(|(i, lo, hi)| {
            let sigma = parameters.volatility[i];
            sigma * sigma * ((2.0 * a * hi).exp() - (2.0 * a * lo).exp())
        })
        .sum();
    factor1 * (factor2 / numerator).sqrt()
}

/// [`alpha`] together with its derivative with respect to each volatility.
///
/// When every volatility on `[start, end]` is zero the one-sided derivative
/// (from positive volatilities) is returned.
pub fn alpha_adjoint(
    parameters: &HullWhiteParameters,
    start: f64,
    end: f64,
    numeraire_time: f64,
    maturity: f64,
) -> (f64, Vec<f64>) {
    let a = parameters.mean_reversion;
    let factor1 = (-a * numeraire_time).exp() - (-a * maturity).exp();
    let numerator = 2.0 * a * a * a;
    let weights: Vec<(usize, f64)> = parameters
        .segments(start, end)
        .map(|(i, lo, hi)| (i, (2.0 * a * hi).exp() - (2.0 * a * lo).exp()))
        .collect();
    let factor2: f64 = weights
        .iter()
        .map(|&(i, w)| parameters.volatility[i].powi(2) * w)
        .sum();
    let root = (factor2 / numerator).sqrt();
    let value = factor1 * root;

    let mut derivatives = vec![0.0; parameters.volatility.len()];
    if root > 0.0 {
        let factor2_bar = factor1 / root / 2.0 / numerator;
        for &(i, w) in &weights {
            derivatives[i] = 2.0 * parameters.volatility[i] * w * factor2_bar;
        }
    } else {
        for &(i, w) in &weights {
            derivatives[i] = factor1 * (w / numerator).sqrt();
        }
    }
    (value, derivatives)
}

/// Ratio of the futures price to the forward price of a payment at `t1` for
/// a contract margined until `t0` and settling at `t2`.
///
/// ```text
/// γ = exp( ∫_0^t0 ν(s, t2) (ν(s, t2) - ν(s, t1)) ds )
/// ```
///
/// For a cash flow after delivery (`t1 > t2`) the exponent is negative, so
/// the futures price of a bond sits below its forward price.
pub fn futures_convexity_factor(parameters: &HullWhiteParameters, t0: f64, t1: f64, t2: f64) -> f64 {
    let a = parameters.mean_reversion;
    let factor1 = (-a * t1).exp() - (-a * t2).exp();
    let numerator = 2.0 * a * a * a;
    let factor2: f64 = parameters
        .segments(0.0, t0)
        .map(|(i, lo, hi)| {
            let sigma = parameters.volatility[i];
            sigma * sigma * convexity_weight(a, lo, hi, t2)
        })
        .sum();
    (factor1 / numerator * factor2).exp()
}

/// [`futures_convexity_factor`] together with its derivative with respect to
/// each volatility.
pub fn futures_convexity_factor_adjoint(
    parameters: &HullWhiteParameters,
    t0: f64,
    t1: f64,
    t2: f64,
) -> (f64, Vec<f64>) {
    let a = parameters.mean_reversion;
    let factor1 = (-a * t1).exp() - (-a * t2).exp();
    let numerator = 2.0 * a * a * a;
    let weights: Vec<(usize, f64)> = parameters
        .segments(0.0, t0)
        .map(|(i, lo, hi)| (i, convexity_weight(a, lo, hi, t2)))
        .collect();
    let factor2: f64 = weights
        .iter()
        .map(|&(i, w)| parameters.volatility[i].powi(2) * w)
        .sum();
    let factor = (factor1 / numerator * factor2).exp();

    let factor2_bar = factor1 / numerator * factor;
    let mut derivatives = vec![0.0; parameters.volatility.len()];
    for &(i, w) in &weights {
        derivatives[i] = 2.0 * parameters.volatility[i] * w * factor2_bar;
    }
    (factor, derivatives)
}

fn convexity_weight(a: f64, lo: f64, hi: f64, t2: f64) -> f64 {
    ((a * hi).exp() - (a * lo).exp()) * (2.0 - (-a * (t2 - hi)).exp() - (-a * (t2 - lo)).exp())
}

/// Hull-White parameters bound to a currency and the curves they apply to.
///
/// The provider is itself a [`CurveProvider`], delegating every lookup to the
/// wrapped curves.
#[derive(Clone)]
pub struct HullWhiteProvider<'a> {
    parameters: HullWhiteParameters,
    currency: Currency,
    curves: &'a dyn CurveProvider,
}

impl fmt::Debug for HullWhiteProvider<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HullWhiteProvider")
            .field("parameters", &self.parameters)
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

impl<'a> HullWhiteProvider<'a> {
    /// Creates a provider.
    pub fn new(
        parameters: HullWhiteParameters,
        currency: Currency,
        curves: &'a dyn CurveProvider,
    ) -> Self {
        Self {
            parameters,
            currency,
            curves,
        }
    }

    /// Model parameters.
    pub fn parameters(&self) -> &HullWhiteParameters {
        &self.parameters
    }

    /// Currency the parameters were calibrated in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// The wrapped curves.
    pub fn curves(&self) -> &'a dyn CurveProvider {
        self.curves
    }

    /// Returns a provider with the same parameters over other curves.
    #[must_use]
    pub fn with_curves<'b>(&self, curves: &'b dyn CurveProvider) -> HullWhiteProvider<'b> {
        HullWhiteProvider {
            parameters: self.parameters.clone(),
            currency: self.currency,
            curves,
        }
    }

    /// Fails unless the parameters apply to `currency`.
    pub fn check_currency(&self, currency: Currency) -> PricingResult<()> {
        if currency == self.currency {
            Ok(())
        } else {
            Err(PricingError::invalid_argument(format!(
                "Hull-White parameters are in {} but the instrument is in {currency}",
                self.currency
            )))
        }
    }
}

impl CurveProvider for HullWhiteProvider<'_> {
    fn curve(&self, name: &str) -> CurveResult<&dyn Curve> {
        self.curves.curve(name)
    }
}
