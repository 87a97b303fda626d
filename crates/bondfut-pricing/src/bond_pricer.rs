//! Bond pricing from discount curves.

use bondfut_curves::{CurveProvider, CurveSensitivity};

use crate::error::PricingResult;
use crate::instruments::FixedCouponBond;

/// Prices a bond and its sensitivity to the discount curve.
pub trait BondPricer: Send + Sync {
    /// Dirty price at the bond's settlement time.
    fn dirty_price(&self, bond: &FixedCouponBond, curves: &dyn CurveProvider)
        -> PricingResult<f64>;

    /// Clean price: dirty price less accrued interest.
    fn clean_price(
        &self,
        bond: &FixedCouponBond,
        curves: &dyn CurveProvider,
    ) -> PricingResult<f64> {
        Ok(self.dirty_price(bond, curves)? - bond.accrued_interest())
    }

    /// Sensitivity of the dirty price to the zero rates of the bond's curve.
    ///
    /// The clean price has the same sensitivity.
    fn dirty_price_sensitivity(
        &self,
        bond: &FixedCouponBond,
        curves: &dyn CurveProvider,
    ) -> PricingResult<CurveSensitivity>;
}

/// Discounts every cash flow on the bond's curve, forward to settlement.
///
/// `dirty = Σ amount · DF(t) / DF(settlement)`
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountingBondPricer;

impl DiscountingBondPricer {
    /// Creates the pricer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BondPricer for DiscountingBondPricer {
    fn dirty_price(
        &self,
        bond: &FixedCouponBond,
        curves: &dyn CurveProvider,
    ) -> PricingResult<f64> {
        let curve = bond.curve_name();
        let df_settle = curves.discount_factor(curve, bond.settlement_time())?;
        let mut pv = 0.0;
        for cf in bond.cash_flows() {
            pv += cf.amount * curves.discount_factor(curve, cf.time)?;
        }
        Ok(pv / df_settle)
    }

    fn dirty_price_sensitivity(
        &self,
        bond: &FixedCouponBond,
        curves: &dyn CurveProvider,
    ) -> PricingResult<CurveSensitivity> {
        let curve = bond.curve_name();
        let t_settle = bond.settlement_time();
        let df_settle = curves.discount_factor(curve, t_settle)?;

        let mut sensitivity = CurveSensitivity::new();
        let mut dirty = 0.0;
        for cf in bond.cash_flows() {
            let pv = cf.amount * curves.discount_factor(curve, cf.time)? / df_settle;
            dirty += pv;
            sensitivity.add(curve, cf.time, -cf.time * pv);
        }
        if t_settle > 0.0 {
            sensitivity.add(curve, t_settle, t_settle * dirty);
        }
        Ok(sensitivity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::CashFlow;
    use approx::assert_relative_eq;
    use bondfut_curves::{Currency, CurveSet, DiscountCurve, FlatCurve};

    fn bond() -> FixedCouponBond {
        FixedCouponBond::new(
            "T 3% 2028",
            Currency::USD,
            "USD-TSY",
            0.25,
            vec![
                CashFlow::new(0.5, 0.015),
                CashFlow::new(1.0, 0.015),
                CashFlow::new(1.5, 1.015),
            ],
        )
        .unwrap()
        .with_accrued_interest(0.0075)
    }

    #[test]
    fn test_flat_curve_prices() {
        let curves = CurveSet::new().with_curve("USD-TSY", FlatCurve::new(0.03));
        let pricer = DiscountingBondPricer::new();
        let dirty = pricer.dirty_price(&bond(), &curves).unwrap();
        let expected: f64 = [(0.5_f64, 0.015_f64), (1.0, 0.015), (1.5, 1.015)]
            .iter()
            .map(|&(t, a)| a * (-0.03 * (t - 0.25)).exp())
            .sum();
        assert_relative_eq!(dirty, expected, epsilon = 1e-14);

        let clean = pricer.clean_price(&bond(), &curves).unwrap();
        assert_relative_eq!(clean, expected - 0.0075, epsilon = 1e-14);
    }

    #[test]
    fn test_parallel_sensitivity_matches_bump() {
        let curves = CurveSet::new().with_curve("USD-TSY", FlatCurve::new(0.03));
        let pricer = DiscountingBondPricer::new();
        let sens = pricer.dirty_price_sensitivity(&bond(), &curves).unwrap();

        let bump = 1e-6;
        let up = CurveSet::new().with_curve("USD-TSY", FlatCurve::new(0.03 + bump));
        let down = CurveSet::new().with_curve("USD-TSY", FlatCurve::new(0.03 - bump));
        let fd = (pricer.dirty_price(&bond(), &up).unwrap()
            - pricer.dirty_price(&bond(), &down).unwrap())
            / (2.0 * bump);
        assert_relative_eq!(sens.total("USD-TSY"), fd, max_relative = 1e-6);
    }

    #[test]
    fn test_pillar_sensitivity_matches_bump() {
        let times = vec![0.25, 0.5, 1.0, 1.5];
        let curve = DiscountCurve::from_zero_rates(times.clone(), &[0.02, 0.022, 0.025, 0.027])
            .unwrap();
        let curves = CurveSet::new().with_curve("USD-TSY", curve.clone());
        let pricer = DiscountingBondPricer::new();
        let sens = pricer
            .dirty_price_sensitivity(&bond(), &curves)
            .unwrap()
            .cleaned();

        let bump = 1e-6;
        for (index, &t) in times.iter().enumerate() {
            let price_with = |b: f64| {
                let bumped = curves
                    .replaced("USD-TSY", curve.with_bumped_pillar(index, b).unwrap())
                    .unwrap();
                pricer.dirty_price(&bond(), &bumped).unwrap()
            };
            let fd = (price_with(bump) - price_with(-bump)) / (2.0 * bump);
            assert_relative_eq!(sens.at("USD-TSY", t), fd, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_unknown_curve() {
        let curves = CurveSet::new().with_curve("EUR-BUND", FlatCurve::new(0.03));
        assert!(DiscountingBondPricer::new()
            .dirty_price(&bond(), &curves)
            .is_err());
    }
}
