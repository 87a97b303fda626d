//! Futures price without convexity adjustment.
//!
//! The futures price is the forward price of the cheapest to deliver bond
//! divided by its conversion factor:
//!
//! ```text
//! F = min_i (clean_i - net_basis) / CF_i
//! ```
//!
//! where `clean_i` is the clean price at delivery. Ties go to the first bond
//! of the basket.

use bondfut_curves::{CurveProvider, CurveSensitivity};
use tracing::debug;

use crate::bond_pricer::{BondPricer, DiscountingBondPricer};
use crate::config::{DiscountingFuturesConfig, SensitivityCtdSelection};
use crate::error::{PricingError, PricingResult};
use crate::instruments::BondFuturesSecurity;

/// Discounting (forward price) method for bond futures.
#[derive(Debug, Clone)]
pub struct DiscountingFuturesMethod<B = DiscountingBondPricer> {
    config: DiscountingFuturesConfig,
    bond_pricer: B,
}

impl DiscountingFuturesMethod {
    /// Creates the method with the discounting bond pricer.
    #[must_use]
    pub fn new(config: DiscountingFuturesConfig) -> Self {
        Self {
            config,
            bond_pricer: DiscountingBondPricer,
        }
    }
}

impl Default for DiscountingFuturesMethod {
    fn default() -> Self {
        Self::new(DiscountingFuturesConfig::default())
    }
}

impl<B: BondPricer> DiscountingFuturesMethod<B> {
    /// Creates the method with another bond pricer.
    pub fn with_bond_pricer(config: DiscountingFuturesConfig, bond_pricer: B) -> Self {
        Self {
            config,
            bond_pricer,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DiscountingFuturesConfig {
        &self.config
    }

    /// Clean price at delivery of every bond in the basket.
    pub fn clean_prices(
        &self,
        futures: &BondFuturesSecurity,
        curves: &dyn CurveProvider,
    ) -> PricingResult<Vec<f64>> {
        futures
            .basket()
            .iter()
            .map(|bond| self.bond_pricer.clean_price(bond, curves))
            .collect()
    }

    /// Index of the bond minimising `(clean - net_basis) / CF`.
    pub fn ctd_index(
        &self,
        futures: &BondFuturesSecurity,
        curves: &dyn CurveProvider,
        net_basis: f64,
    ) -> PricingResult<usize> {
        let clean = self.clean_prices(futures, curves)?;
        Ok(cheapest(&clean, futures.conversion_factors(), net_basis)?.0)
    }

    /// Futures price for a given net basis.
    pub fn price(
        &self,
        futures: &BondFuturesSecurity,
        curves: &dyn CurveProvider,
        net_basis: f64,
    ) -> PricingResult<f64> {
        let clean = self.clean_prices(futures, curves)?;
        let (ctd, price) = cheapest(&clean, futures.conversion_factors(), net_basis)?;
        debug!(
            futures = futures.name(),
            ctd,
            bond = futures.basket()[ctd].name(),
            net_basis,
            price,
            "discounting futures price"
        );
        Ok(price)
    }

    /// Futures price with zero net basis.
    pub fn price_from_curves(
        &self,
        futures: &BondFuturesSecurity,
        curves: &dyn CurveProvider,
    ) -> PricingResult<f64> {
        self.price(futures, curves, 0.0)
    }

    /// Net basis of every bond for a futures price: `clean_i - price · CF_i`.
    pub fn net_basis_all_bonds(
        &self,
        futures: &BondFuturesSecurity,
        curves: &dyn CurveProvider,
        futures_price: f64,
    ) -> PricingResult<Vec<f64>> {
        let clean = self.clean_prices(futures, curves)?;
        Ok(clean
            .iter()
            .zip(futures.conversion_factors())
            .map(|(c, cf)| c - futures_price * cf)
            .collect())
    }

    /// Curve sensitivity of the futures price with zero net basis.
    pub fn price_curve_sensitivity(
        &self,
        futures: &BondFuturesSecurity,
        curves: &dyn CurveProvider,
    ) -> PricingResult<CurveSensitivity> {
        self.price_curve_sensitivity_with_net_basis(futures, curves, 0.0)
    }

    /// Curve sensitivity of the futures price: the CTD dirty price
    /// sensitivity divided by its conversion factor.
    ///
    /// With [`SensitivityCtdSelection::CleanPrice`] the CTD is re-selected on
    /// `clean / CF` and `net_basis` is ignored. With
    /// [`SensitivityCtdSelection::NetOfBasis`] it is the CTD of
    /// [`price`](Self::price).
    pub fn price_curve_sensitivity_with_net_basis(
        &self,
        futures: &BondFuturesSecurity,
        curves: &dyn CurveProvider,
        net_basis: f64,
    ) -> PricingResult<CurveSensitivity> {
        let selection_basis = match self.config.sensitivity_ctd {
            SensitivityCtdSelection::CleanPrice => 0.0,
            SensitivityCtdSelection::NetOfBasis => net_basis,
        };
        let ctd = self.ctd_index(futures, curves, selection_basis)?;
        let bond = &futures.basket()[ctd];
        let cf = futures.conversion_factors()[ctd];
        debug!(
            futures = futures.name(),
            ctd,
            bond = bond.name(),
            selection = ?self.config.sensitivity_ctd,
            "discounting futures sensitivity"
        );
        Ok(self
            .bond_pricer
            .dirty_price_sensitivity(bond, curves)?
            .multiplied_by(1.0 / cf))
    }
}

/// First index of the minimum of `(clean - net_basis) / CF`, and the minimum.
fn cheapest(
    clean: &[f64],
    conversion_factors: &[f64],
    net_basis: f64,
) -> PricingResult<(usize, f64)> {
    if clean.is_empty() || clean.len() != conversion_factors.len() {
        return Err(PricingError::invalid_argument(format!(
            "cannot select a CTD from {} prices and {} conversion factors",
            clean.len(),
            conversion_factors.len()
        )));
    }
    let mut best = (0, f64::INFINITY);
    for (i, (c, cf)) in clean.iter().zip(conversion_factors).enumerate() {
        let forward = (c - net_basis) / cf;
        if forward < best.1 {
            best = (i, forward);
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{CashFlow, FixedCouponBond};
    use approx::assert_relative_eq;
    use bondfut_curves::{Currency, CurveSet, DiscountCurve};

    fn zero_bond(name: &str, amount: f64) -> FixedCouponBond {
        FixedCouponBond::new(name, Currency::USD, "USD-TSY", 0.25, vec![CashFlow::new(2.0, amount)])
            .unwrap()
    }

    fn curves() -> CurveSet {
        let curve = DiscountCurve::new(vec![0.25, 2.0], vec![0.995, 0.96]).unwrap();
        CurveSet::new().with_curve("USD-TSY", curve)
    }

    fn futures(cfs: Vec<f64>) -> BondFuturesSecurity {
        BondFuturesSecurity::new(
            "TUZ6",
            Currency::USD,
            0.25,
            0.25,
            vec![zero_bond("A", 1.03), zero_bond("B", 1.02)],
            cfs,
        )
        .unwrap()
    }

    #[test]
    fn test_price_is_min_forward() {
        let method = DiscountingFuturesMethod::new(DiscountingFuturesConfig::default());
        let price = method.price_from_curves(&futures(vec![0.95, 0.94]), &curves()).unwrap();
        let a: f64 = 1.03 * 0.96 / 0.995 / 0.95;
        let b = 1.02 * 0.96 / 0.995 / 0.94;
        assert_relative_eq!(price, a.min(b), epsilon = 1e-14);
        assert_eq!(
            method.ctd_index(&futures(vec![0.95, 0.94]), &curves(), 0.0).unwrap(),
            if a <= b { 0 } else { 1 }
        );
    }

    #[test]
    fn test_ties_go_to_first_bond() {
        let method = DiscountingFuturesMethod::new(DiscountingFuturesConfig::default());
        let tied = BondFuturesSecurity::new(
            "TUZ6",
            Currency::USD,
            0.25,
            0.25,
            vec![zero_bond("A", 1.03), zero_bond("A-reopening", 1.03)],
            vec![0.95, 0.95],
        )
        .unwrap();
        assert_eq!(method.ctd_index(&tied, &curves(), 0.0).unwrap(), 0);
    }

    #[test]
    fn test_cheapest_needs_a_basket() {
        assert!(matches!(
            cheapest(&[], &[], 0.0),
            Err(PricingError::InvalidArgument { .. })
        ));
        assert!(matches!(
            cheapest(&[1.0, 0.99], &[0.9], 0.0),
            Err(PricingError::InvalidArgument { .. })
        ));
        let (ctd, price) = cheapest(&[1.0, 0.99], &[0.9, 1.0], 0.0).unwrap();
        assert_eq!(ctd, 1);
        assert_relative_eq!(price, 0.99);
    }

    #[test]
    fn test_net_basis_of_ctd_is_zero() {
        let method = DiscountingFuturesMethod::new(DiscountingFuturesConfig::default());
        let fut = futures(vec![0.95, 0.94]);
        let price = method.price_from_curves(&fut, &curves()).unwrap();
        let basis = method.net_basis_all_bonds(&fut, &curves(), price).unwrap();
        let ctd = method.ctd_index(&fut, &curves(), 0.0).unwrap();
        assert_relative_eq!(basis[ctd], 0.0, epsilon = 1e-14);
        assert!(basis[1 - ctd] > 0.0);
    }

    #[test]
    fn test_sensitivity_ctd_selection_flag() {
        // A wins on clean / CF, but B wins once a large net basis is removed.
        let fut = futures(vec![1.0, 0.9]);
        let curves = curves();
        let net_basis = 0.95;

        let clean_rule = DiscountingFuturesMethod::new(DiscountingFuturesConfig::default());
        let basis_rule = DiscountingFuturesMethod::new(DiscountingFuturesConfig {
            sensitivity_ctd: SensitivityCtdSelection::NetOfBasis,
        });
        assert_eq!(clean_rule.ctd_index(&fut, &curves, 0.0).unwrap(), 0);
        assert_eq!(clean_rule.ctd_index(&fut, &curves, net_basis).unwrap(), 1);

        let from_clean = clean_rule
            .price_curve_sensitivity_with_net_basis(&fut, &curves, net_basis)
            .unwrap();
        let from_basis = basis_rule
            .price_curve_sensitivity_with_net_basis(&fut, &curves, net_basis)
            .unwrap();

        let pricer = DiscountingBondPricer;
        let sens_a = pricer.dirty_price_sensitivity(&fut.basket()[0], &curves).unwrap();
        let sens_b = pricer.dirty_price_sensitivity(&fut.basket()[1], &curves).unwrap();
        assert_relative_eq!(from_clean.total("USD-TSY"), sens_a.total("USD-TSY") / 1.0);
        assert_relative_eq!(
            from_basis.total("USD-TSY"),
            sens_b.total("USD-TSY") / 0.9,
            max_relative = 1e-14
        );
    }
}
