//! Closed-form price over the CTD segments.
//!
//! On a segment `[κ_lo, κ_hi]` with CTD `b` the expected value of the bond
//! under the standard normal state has the closed form
//!
//! ```text
//! Σ cfa_b · (Φ(κ_hi + α_b) - Φ(κ_lo + α_b)) - accrued_b / CF_b · (Φ(κ_hi) - Φ(κ_lo))
//! ```

use bondfut_math::distributions::normal_cdf;

use crate::futures::hull_white::switch_points::SwitchPoints;
use crate::futures::hull_white::trace::BondAdjustment;

/// Sums the segment contributions into the futures price.
///
/// Without switch points the single CTD contributes its full expected value
/// and no normal probabilities are evaluated.
pub(crate) fn integrate_segments(bonds: &[BondAdjustment], switch_points: &SwitchPoints) -> f64 {
    if switch_points.is_empty() {
        return bonds[switch_points.ctd()[0]].expected_value();
    }
    switch_points
        .segments()
        .map(|(lo, hi, ctd)| segment_value(&bonds[ctd], lo, hi))
        .sum()
}

/// Contribution of `bond` on `[lo, hi]`.
pub(crate) fn segment_value(bond: &BondAdjustment, lo: f64, hi: f64) -> f64 {
    let cash_flows: f64 = bond
        .cash_flows
        .iter()
        .map(|cf| cf.adjusted_amount * probability(lo + cf.alpha, hi + cf.alpha))
        .sum();
    cash_flows - bond.adjusted_accrued * probability(lo, hi)
}

/// `Φ(hi) - Φ(lo)`.
pub(crate) fn probability(lo: f64, hi: f64) -> f64 {
    normal_cdf(hi) - normal_cdf(lo)
}
