//! Forward quantities shared by the Hull-White price and its sensitivity.

use bondfut_math::quadrature::QuadratureGrid;

use crate::error::PricingResult;
use crate::futures::hull_white::switch_points::SwitchPoints;
use crate::instruments::BondFuturesSecurity;
use crate::models::hull_white::{alpha, futures_convexity_factor};
use crate::models::HullWhiteProvider;

/// Model quantities of one cash flow of one deliverable bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlowAdjustment {
    /// Payment time.
    pub time: f64,
    /// Payment amount.
    pub amount: f64,
    /// Discount factor to the payment time.
    pub discount_factor: f64,
    /// Volatility of the payment's forward value to expiry.
    pub alpha: f64,
    /// Futures convexity factor.
    pub beta: f64,
    /// `DF(t) / DF(delivery) · beta · amount / CF`.
    pub adjusted_amount: f64,
}

/// Model quantities of one deliverable bond.
#[derive(Debug, Clone, PartialEq)]
pub struct BondAdjustment {
    /// Curve the bond discounts on.
    pub curve_name: String,
    /// Conversion factor.
    pub conversion_factor: f64,
    /// Discount factor to delivery on the bond's curve.
    pub delivery_discount_factor: f64,
    /// Per cash flow quantities.
    pub cash_flows: Vec<CashFlowAdjustment>,
    /// Accrued interest at delivery divided by the conversion factor.
    pub adjusted_accrued: f64,
}

impl BondAdjustment {
    /// Futures-equivalent value of the bond in state `x`:
    ///
    /// ```text
    /// V(x) = Σ cfa · exp(-α²/2 - α·x) - accrued / CF
    /// ```
    pub fn value_at(&self, x: f64) -> f64 {
        self.cash_flows
            .iter()
            .map(|cf| cf.adjusted_amount * (-0.5 * cf.alpha * cf.alpha - cf.alpha * x).exp())
            .sum::<f64>()
            - self.adjusted_accrued
    }

    /// Value without any volatility: `Σ cfa - accrued / CF`.
    pub fn expected_value(&self) -> f64 {
        self.cash_flows.iter().map(|cf| cf.adjusted_amount).sum::<f64>() - self.adjusted_accrued
    }
}

/// Everything the Hull-White analytic method computes before the backward
/// sweep.
///
/// Only [`HullWhiteFuturesMethod::trace`](super::HullWhiteFuturesMethod::trace)
/// builds one, so the switch points always index into `bonds`. A single bond
/// basket has no grid and no switch points.
#[derive(Debug, Clone, PartialEq)]
pub struct HullWhiteFuturesTrace {
    pub(crate) delivery_time: f64,
    pub(crate) bonds: Vec<BondAdjustment>,
    pub(crate) grid: Option<QuadratureGrid>,
    pub(crate) switch_points: SwitchPoints,
    pub(crate) price: f64,
}

impl HullWhiteFuturesTrace {
    /// Delivery time of the contract.
    pub fn delivery_time(&self) -> f64 {
        self.delivery_time
    }

    /// Per bond quantities, in basket order.
    pub fn bonds(&self) -> &[BondAdjustment] {
        &self.bonds
    }

    /// Grid used to detect CTD changes.
    pub fn grid(&self) -> Option<&QuadratureGrid> {
        self.grid.as_ref()
    }

    /// Switch points and the CTD on each segment.
    pub fn switch_points(&self) -> &SwitchPoints {
        &self.switch_points
    }

    /// Futures price.
    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Computes alpha, beta, discount factors and adjusted amounts for every
/// cash flow of the basket.
pub(crate) fn adjust_basket(
    futures: &BondFuturesSecurity,
    hull_white: &HullWhiteProvider<'_>,
) -> PricingResult<Vec<BondAdjustment>> {
    let parameters = hull_white.parameters();
    let curves = hull_white.curves();
    let expiry = futures.expiry_time();
    let delivery = futures.delivery_time();

    futures
        .deliverables()
        .map(|(bond, conversion_factor)| {
            let curve_name = bond.curve_name();
            let delivery_discount_factor = curves.discount_factor(curve_name, delivery)?;
            let cash_flows = bond
                .cash_flows()
                .iter()
                .map(|cf| {
                    let discount_factor = curves.discount_factor(curve_name, cf.time)?;
                    let alpha = alpha(parameters, 0.0, expiry, delivery, cf.time);
                    let beta = futures_convexity_factor(parameters, expiry, cf.time, delivery);
                    Ok(CashFlowAdjustment {
                        time: cf.time,
                        amount: cf.amount,
                        discount_factor,
                        alpha,
                        beta,
                        adjusted_amount: discount_factor / delivery_discount_factor * beta
                            * cf.amount
                            / conversion_factor,
                    })
                })
                .collect::<PricingResult<Vec<_>>>()?;

            Ok(BondAdjustment {
                curve_name: curve_name.to_string(),
                conversion_factor,
                delivery_discount_factor,
                cash_flows,
                adjusted_accrued: bond.accrued_interest() / conversion_factor,
            })
        })
        .collect()
}

/// Index of the bond with the lowest value at `x`. Ties go to the lowest index.
pub(crate) fn cheapest_at(bonds: &[BondAdjustment], x: f64) -> usize {
    let mut best = (0, f64::INFINITY);
    for (i, bond) in bonds.iter().enumerate() {
        let value = bond.value_at(x);
        if value < best.1 {
            best = (i, value);
        }
    }
    best.0
}
