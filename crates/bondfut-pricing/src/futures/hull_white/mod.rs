//! Hull-White convexity adjusted futures price.
//!
//! In the Hull-White model the futures price is the expectation, under a
//! standard normal state `X`, of the futures-equivalent value of the CTD:
//!
//! ```text
//! F = E[ min_b V_b(X) ],   V_b(x) = Σ cfa_b · exp(-α²/2 - α·x) - accrued_b / CF_b
//! ```
//!
//! The method samples `V_b` on a quadrature grid to find where the CTD
//! changes, refines those switch points, and integrates each CTD segment in
//! closed form. The curve sensitivity is an adjoint sweep over the same
//! forward quantities, collected in a [`HullWhiteFuturesTrace`].

mod adjoint;
mod segment;
mod switch_points;
mod trace;

pub(crate) use adjoint::chain_to_curves;
pub(crate) use trace::{adjust_basket, cheapest_at};
pub use switch_points::SwitchPoints;
pub use trace::{BondAdjustment, CashFlowAdjustment, HullWhiteFuturesTrace};

use bondfut_curves::CurveSensitivity;
use bondfut_math::quadrature::QuadratureGrid;
use tracing::debug;

use crate::config::HullWhiteFuturesConfig;
use crate::error::{PricingError, PricingResult};
use crate::instruments::BondFuturesSecurity;
use crate::models::HullWhiteProvider;

/// Hull-White analytic method for bond futures.
///
/// # Example
///
/// ```rust
/// use bondfut_curves::{Currency, CurveSet, FlatCurve};
/// use bondfut_pricing::futures::HullWhiteFuturesMethod;
/// use bondfut_pricing::instruments::{BondFuturesSecurity, CashFlow, FixedCouponBond};
/// use bondfut_pricing::models::{HullWhiteParameters, HullWhiteProvider};
///
/// let bond = FixedCouponBond::new(
///     "DBR 2034",
///     Currency::EUR,
///     "EUR-BUND",
///     0.25,
///     vec![CashFlow::new(1.25, 0.025), CashFlow::new(2.25, 1.025)],
/// )
/// .unwrap();
/// let futures =
///     BondFuturesSecurity::new("FGBLZ6", Currency::EUR, 0.2, 0.25, vec![bond], vec![0.9])
///         .unwrap();
///
/// let curves = CurveSet::new().with_curve("EUR-BUND", FlatCurve::new(0.025));
/// let parameters = HullWhiteParameters::constant(0.03, 0.01).unwrap();
/// let hull_white = HullWhiteProvider::new(parameters, Currency::EUR, &curves);
///
/// let method = HullWhiteFuturesMethod::default();
/// let (price, sensitivity) = method.price_and_sensitivity(&futures, &hull_white).unwrap();
/// assert!(price > 1.0);
/// assert!(sensitivity.total("EUR-BUND") < 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HullWhiteFuturesMethod {
    config: HullWhiteFuturesConfig,
}

impl HullWhiteFuturesMethod {
    /// Creates the method.
    #[must_use]
    pub fn new(config: HullWhiteFuturesConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HullWhiteFuturesConfig {
        &self.config
    }

    /// Runs the forward computation: adjustments, grid, switch points, price.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a currency mismatch or an invalid configuration
    /// - `ConvergenceFailure` if a switch point cannot be bracketed or refined
    /// - `Curve` if a discount factor lookup fails
    pub fn trace(
        &self,
        futures: &BondFuturesSecurity,
        hull_white: &HullWhiteProvider<'_>,
    ) -> PricingResult<HullWhiteFuturesTrace> {
        hull_white.check_currency(futures.currency())?;
        self.config.validate()?;

        let bonds = adjust_basket(futures, hull_white)?;
        if bonds.is_empty() {
            return Err(PricingError::invalid_argument(format!(
                "futures {} has an empty basket",
                futures.name()
            )));
        }
        let (grid, switch_points) = if bonds.len() == 1 {
            (None, SwitchPoints::single(0))
        } else {
            let grid = QuadratureGrid::build(self.config.grid_points)?;
            let switch_points =
                switch_points::find_switch_points(&bonds, &grid, &self.config.switch_point)?;
            (Some(grid), switch_points)
        };
        let price = segment::integrate_segments(&bonds, &switch_points);

        debug!(
            futures = futures.name(),
            basket = bonds.len(),
            switches = switch_points.len(),
            ctd = ?switch_points.ctd(),
            price,
            "Hull-White futures price"
        );

        Ok(HullWhiteFuturesTrace {
            delivery_time: futures.delivery_time(),
            bonds,
            grid,
            switch_points,
            price,
        })
    }

    /// Futures price.
    pub fn price(
        &self,
        futures: &BondFuturesSecurity,
        hull_white: &HullWhiteProvider<'_>,
    ) -> PricingResult<f64> {
        Ok(self.trace(futures, hull_white)?.price)
    }

    /// Curve sensitivity of the futures price.
    pub fn price_curve_sensitivity(
        &self,
        futures: &BondFuturesSecurity,
        hull_white: &HullWhiteProvider<'_>,
    ) -> PricingResult<CurveSensitivity> {
        let trace = self.trace(futures, hull_white)?;
        Ok(Self::sensitivity_from_trace(&trace))
    }

    /// Price and curve sensitivity from a single forward computation.
    pub fn price_and_sensitivity(
        &self,
        futures: &BondFuturesSecurity,
        hull_white: &HullWhiteProvider<'_>,
    ) -> PricingResult<(f64, CurveSensitivity)> {
        let trace = self.trace(futures, hull_white)?;
        Ok((trace.price, Self::sensitivity_from_trace(&trace)))
    }

    /// Backward sweep over a trace returned by [`trace`](Self::trace).
    pub fn sensitivity_from_trace(trace: &HullWhiteFuturesTrace) -> CurveSensitivity {
        adjoint::price_curve_sensitivity(trace)
    }

    /// Switch points and the CTD on each segment.
    pub fn switch_points(
        &self,
        futures: &BondFuturesSecurity,
        hull_white: &HullWhiteProvider<'_>,
    ) -> PricingResult<SwitchPoints> {
        Ok(self.trace(futures, hull_white)?.switch_points)
    }
}
