//! Shared market data for the integration tests.

#![allow(dead_code)]

use bondfut_curves::{Currency, CurveSet, DiscountCurve};
use bondfut_pricing::instruments::{BondFuturesSecurity, CashFlow, FixedCouponBond};
use tracing_subscriber::EnvFilter;

pub const CURVE: &str = "USD-TSY";
pub const EXPIRY: f64 = 0.45;
pub const DELIVERY: f64 = 0.5;

/// Installs a test subscriber; `RUST_LOG=bondfut_pricing=debug` shows the engine logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Semi-annual pillars from delivery to ten years on an upward sloping curve.
pub fn pillar_times() -> Vec<f64> {
    (1..=20).map(|i| 0.5 * f64::from(i)).collect()
}

pub fn zero_rates() -> Vec<f64> {
    pillar_times().iter().map(|t| 0.02 + 0.002 * t).collect()
}

pub fn treasury_curve() -> DiscountCurve {
    DiscountCurve::from_zero_rates(pillar_times(), &zero_rates()).unwrap()
}

pub fn curves_with(curve: DiscountCurve) -> CurveSet {
    CurveSet::new().with_curve(CURVE, curve)
}

/// A bond settling at delivery with semi-annual coupons on the pillars.
pub fn coupon_bond(name: &str, coupon: f64, maturity_years: u32, accrued: f64) -> FixedCouponBond {
    let periods = 2 * maturity_years;
    let cash_flows = (2..=periods)
        .map(|i| {
            let amount = if i == periods { 1.0 + coupon / 2.0 } else { coupon / 2.0 };
            CashFlow::new(0.5 * f64::from(i), amount)
        })
        .collect();
    FixedCouponBond::new(name, Currency::USD, CURVE, DELIVERY, cash_flows)
        .unwrap()
        .with_accrued_interest(accrued)
}

pub fn futures(basket: Vec<FixedCouponBond>, conversion_factors: Vec<f64>) -> BondFuturesSecurity {
    BondFuturesSecurity::new(
        "TYU6",
        Currency::USD,
        EXPIRY,
        DELIVERY,
        basket,
        conversion_factors,
    )
    .unwrap()
}
