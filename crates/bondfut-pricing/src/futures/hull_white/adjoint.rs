//! Backward sweep of the Hull-White analytic price.
//!
//! The switch points are stationary: at each `κ` the two adjacent bonds have
//! the same value, so moving `κ` does not change the price to first order and
//! only the adjusted amounts need differentiating. Their derivative is the
//! normal probability weight of the segments where the bond is the CTD. From
//! `cfa = DF(t) / DF(delivery) · β · amount / CF` the chain rule gives the
//! derivatives to `DF(t)` and `DF(delivery)`, which are turned into zero-rate
//! sensitivities with `∂DF(t)/∂r(t) = -t · DF(t)`.

use std::collections::BTreeMap;

use bondfut_curves::CurveSensitivity;

use crate::futures::hull_white::segment::probability;
use crate::futures::hull_white::trace::{BondAdjustment, HullWhiteFuturesTrace};

/// Derivative of the price with respect to every adjusted amount.
pub(crate) fn adjusted_amount_weights(trace: &HullWhiteFuturesTrace) -> Vec<Vec<f64>> {
    let mut weights: Vec<Vec<f64>> = trace
        .bonds
        .iter()
        .map(|bond| vec![0.0; bond.cash_flows.len()])
        .collect();

    if trace.switch_points.is_empty() {
        let ctd = trace.switch_points.ctd()[0];
        weights[ctd].fill(1.0);
        return weights;
    }

    for (lo, hi, ctd) in trace.switch_points.segments() {
        for (weight, cf) in weights[ctd].iter_mut().zip(&trace.bonds[ctd].cash_flows) {
            *weight += probability(lo + cf.alpha, hi + cf.alpha);
        }
    }
    weights
}

/// Curve sensitivity of the price in `trace`.
pub(crate) fn price_curve_sensitivity(trace: &HullWhiteFuturesTrace) -> CurveSensitivity {
    chain_to_curves(
        &trace.bonds,
        &adjusted_amount_weights(trace),
        trace.delivery_time,
    )
}

/// Converts derivatives with respect to adjusted amounts into zero-rate
/// sensitivities. Duplicate times are appended, not merged.
pub(crate) fn chain_to_curves(
    bonds: &[BondAdjustment],
    weights: &[Vec<f64>],
    delivery_time: f64,
) -> CurveSensitivity {
    let mut sensitivity = CurveSensitivity::new();
    let mut delivery: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for (bond, bond_weights) in bonds.iter().zip(weights) {
        if bond_weights.iter().all(|w| *w == 0.0) {
            continue;
        }
        let df_delivery = bond.delivery_discount_factor;
        let mut df_delivery_bar = 0.0;
        for (cf, &cfa_bar) in bond.cash_flows.iter().zip(bond_weights) {
            let df_bar = cf.beta * cf.amount / bond.conversion_factor / df_delivery * cfa_bar;
            df_delivery_bar -= cf.adjusted_amount / df_delivery * cfa_bar;
            sensitivity.add(
                &bond.curve_name,
                cf.time,
                -cf.time * cf.discount_factor * df_bar,
            );
        }
        let entry = delivery
            .entry(bond.curve_name.as_str())
            .or_insert((df_delivery, 0.0));
        entry.1 += df_delivery_bar;
    }

    for (curve, (df, bar)) in delivery {
        sensitivity.add(curve, delivery_time, -delivery_time * df * bar);
    }
    sensitivity
}
