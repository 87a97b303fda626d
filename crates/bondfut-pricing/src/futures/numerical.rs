//! Hull-White futures price by direct numerical integration.
//!
//! Independent of the switch point machinery: the minimum over the basket is
//! taken pointwise inside the integrand,
//!
//! ```text
//! F = 1/√(2π) ∫_{-L}^{L} min_b Σ cfa_b · exp(-(x + α_b)² / 2) dx
//! ```
//!
//! with the accrued interest entered as a negative cash flow at delivery
//! (`α = 0`). The curve sensitivity integrates, for every cash flow, the
//! Gaussian weight over the states where its bond is the CTD.

use bondfut_curves::CurveSensitivity;
use bondfut_math::distributions::INV_SQRT_2PI;
use bondfut_math::integration::RungeKuttaIntegrator;
use tracing::debug;

use crate::config::HullWhiteFuturesConfig;
use crate::error::PricingResult;
use crate::futures::hull_white::{adjust_basket, chain_to_curves, cheapest_at, BondAdjustment};
use crate::instruments::BondFuturesSecurity;
use crate::models::HullWhiteProvider;

/// Numerical-integration cross-check of the Hull-White analytic method.
#[derive(Debug, Clone, Default)]
pub struct NumericalIntegrationFuturesMethod {
    config: HullWhiteFuturesConfig,
}

impl NumericalIntegrationFuturesMethod {
    /// Creates the method. Only the `integration` block of the configuration
    /// is used.
    #[must_use]
    pub fn new(config: HullWhiteFuturesConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HullWhiteFuturesConfig {
        &self.config
    }

    fn prepare(
        &self,
        futures: &BondFuturesSecurity,
        hull_white: &HullWhiteProvider<'_>,
    ) -> PricingResult<Vec<BondAdjustment>> {
        hull_white.check_currency(futures.currency())?;
        self.config.integration.validate()?;
        adjust_basket(futures, hull_white)
    }

    fn integrator(&self) -> RungeKuttaIntegrator {
        RungeKuttaIntegrator::new(self.config.integration.integrator_config())
    }

    /// Futures price.
    ///
    /// # Errors
    ///
    /// `ConvergenceFailure` when the integrator exhausts its budget, plus the
    /// input errors of [`HullWhiteFuturesMethod`](crate::futures::HullWhiteFuturesMethod).
    pub fn price(
        &self,
        futures: &BondFuturesSecurity,
        hull_white: &HullWhiteProvider<'_>,
    ) -> PricingResult<f64> {
        let bonds = self.prepare(futures, hull_white)?;
        let limit = self.config.integration.limit;
        let integrand = |x: f64| {
            bonds
                .iter()
                .map(|bond| gaussian_weighted_value(bond, x))
                .fold(f64::INFINITY, f64::min)
        };
        let result = self.integrator().integrate(integrand, -limit, limit)?;
        debug!(
            futures = futures.name(),
            price = result.value,
            evaluations = result.evaluations,
            "numerically integrated futures price"
        );
        Ok(result.value)
    }

    /// Curve sensitivity of the futures price.
    ///
    /// For each cash flow of each bond, the derivative of the price with
    /// respect to its adjusted amount is
    ///
    /// ```text
    /// 1/√(2π) ∫ 1{b is the CTD at x} · exp(-(x + α)² / 2) dx
    /// ```
    pub fn price_curve_sensitivity(
        &self,
        futures: &BondFuturesSecurity,
        hull_white: &HullWhiteProvider<'_>,
    ) -> PricingResult<CurveSensitivity> {
        let bonds = self.prepare(futures, hull_white)?;
        let limit = self.config.integration.limit;
        let integrator = self.integrator();

        let jobs: Vec<(usize, usize)> = bonds
            .iter()
            .enumerate()
            .flat_map(|(b, bond)| (0..bond.cash_flows.len()).map(move |c| (b, c)))
            .collect();

        let integrals = maybe_parallel_map(&jobs, |&(b, c)| {
            let alpha = bonds[b].cash_flows[c].alpha;
            let integrand = |x: f64| {
                if bonds.len() > 1 && cheapest_at(&bonds, x) != b {
                    0.0
                } else {
                    INV_SQRT_2PI * (-0.5 * (x + alpha) * (x + alpha)).exp()
                }
            };
            integrator.integrate(integrand, -limit, limit)
        });

        let mut weights: Vec<Vec<f64>> = bonds
            .iter()
            .map(|bond| vec![0.0; bond.cash_flows.len()])
            .collect();
        let mut evaluations = 0;
        for (&(b, c), integral) in jobs.iter().zip(integrals) {
            let integral = integral?;
            evaluations += integral.evaluations;
            weights[b][c] = integral.value;
        }
        debug!(
            futures = futures.name(),
            integrals = jobs.len(),
            evaluations,
            "numerically integrated futures sensitivity"
        );

        Ok(chain_to_curves(&bonds, &weights, futures.delivery_time()))
    }
}

/// `φ`-weighted bond value with the accrued as a cash flow at `α = 0`.
fn gaussian_weighted_value(bond: &BondAdjustment, x: f64) -> f64 {
    let cash_flows: f64 = bond
        .cash_flows
        .iter()
        .map(|cf| cf.adjusted_amount * (-0.5 * (x + cf.alpha) * (x + cf.alpha)).exp())
        .sum();
    INV_SQRT_2PI * (cash_flows - bond.adjusted_accrued * (-0.5 * x * x).exp())
}

/// Maps `f` over `items`, in parallel when the `parallel` feature is enabled.
fn maybe_parallel_map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(f).collect()
    }
}
