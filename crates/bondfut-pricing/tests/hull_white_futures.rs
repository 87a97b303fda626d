//! Integration tests of the three futures pricing methods.

mod common;

use approx::assert_relative_eq;
use bondfut_curves::{Currency, CurveSet, DiscountCurve};
use bondfut_pricing::config::{DiscountingFuturesConfig, HullWhiteFuturesConfig};
use bondfut_pricing::error::PricingError;
use bondfut_pricing::futures::{
    DiscountingFuturesMethod, HullWhiteFuturesMethod, NumericalIntegrationFuturesMethod,
};
use bondfut_pricing::instruments::{BondFuturesSecurity, CashFlow, FixedCouponBond};
use bondfut_pricing::method::{FuturesMarketData, FuturesPricer, FuturesPricingMethod};
use bondfut_pricing::models::{HullWhiteParameters, HullWhiteProvider};

use common::*;

/// A 2y and a 10y bond whose conversion factors make them nearly equally cheap.
fn two_bond_basket(curves: &CurveSet) -> BondFuturesSecurity {
    let basket = vec![
        coupon_bond("T 4 2028", 0.04, 2, 0.006),
        coupon_bond("T 4 2036", 0.04, 10, 0.006),
    ];
    let clean = DiscountingFuturesMethod::default()
        .clean_prices(&futures(basket.clone(), vec![1.0, 1.0]), curves)
        .unwrap();
    futures(basket, vec![clean[0], clean[1] * 1.002])
}

// =============================================================================
// CONCRETE SCENARIO
// =============================================================================

#[test]
fn test_two_bond_scenario_without_volatility() {
    init_tracing();
    let curve = DiscountCurve::new(vec![0.25, 2.0], vec![0.995, 0.96]).unwrap();
    let curves = CurveSet::new().with_curve("USD-TSY", curve);
    let bond = |name: &str, amount: f64| {
        FixedCouponBond::new(name, Currency::USD, "USD-TSY", 0.25, vec![CashFlow::new(2.0, amount)])
            .unwrap()
    };
    let futures = BondFuturesSecurity::new(
        "TYZ6",
        Currency::USD,
        0.25,
        0.25,
        vec![bond("A", 1.03), bond("B", 1.02)],
        vec![0.95, 0.94],
    )
    .unwrap();

    let expected = (1.03 * 0.96 / 0.995 / 0.95_f64).min(1.02 * 0.96 / 0.995 / 0.94);
    assert_relative_eq!(expected, 1.046_072, epsilon = 1e-6);

    let discounting = DiscountingFuturesMethod::default()
        .price_from_curves(&futures, &curves)
        .unwrap();
    assert_relative_eq!(discounting, expected, epsilon = 1e-12);

    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.03, 0.0).unwrap(),
        Currency::USD,
        &curves,
    );
    let analytic = HullWhiteFuturesMethod::default().price(&futures, &hw).unwrap();
    assert_relative_eq!(analytic, discounting, epsilon = 1e-12);
}

// =============================================================================
// LIMITS AND CROSS-CHECKS
// =============================================================================

#[test]
fn test_zero_volatility_converges_to_discounting() {
    init_tracing();
    let curves = curves_with(treasury_curve());
    let futures = futures(
        vec![
            coupon_bond("T 3 2029", 0.03, 3, 0.004),
            coupon_bond("T 4.5 2033", 0.045, 7, 0.011),
        ],
        vec![0.93, 0.97],
    );
    let discounting = DiscountingFuturesMethod::default()
        .price_from_curves(&futures, &curves)
        .unwrap();

    for vol in [0.0, 1e-10, 1e-8] {
        let hw = HullWhiteProvider::new(
            HullWhiteParameters::constant(0.05, vol).unwrap(),
            Currency::USD,
            &curves,
        );
        let trace = HullWhiteFuturesMethod::default().trace(&futures, &hw).unwrap();
        for cf in trace.bonds().iter().flat_map(|b| &b.cash_flows) {
            assert!(cf.alpha.abs() < 1e-7);
            assert_relative_eq!(cf.beta, 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(trace.price(), discounting, epsilon = 1e-8);
    }
}

#[test]
fn test_convexity_lowers_the_price() {
    let curves = curves_with(treasury_curve());
    let futures = futures(vec![coupon_bond("T 4 2036", 0.04, 10, 0.0)], vec![0.9]);
    let forward = DiscountingFuturesMethod::default()
        .price_from_curves(&futures, &curves)
        .unwrap();
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    let price = HullWhiteFuturesMethod::default().price(&futures, &hw).unwrap();
    assert!(price < forward);
}

#[test]
fn test_analytic_matches_numerical_integration() {
    init_tracing();
    let curves = curves_with(treasury_curve());
    let futures = two_bond_basket(&curves);

    for a in [0.001, 0.01, 0.05, 0.1, 0.25, 0.5] {
        let hw = HullWhiteProvider::new(
            HullWhiteParameters::constant(a, 0.01).unwrap(),
            Currency::USD,
            &curves,
        );
        let analytic = HullWhiteFuturesMethod::default();
        let (price, sens) = analytic.price_and_sensitivity(&futures, &hw).unwrap();
        assert_eq!(analytic.switch_points(&futures, &hw).unwrap().len(), 1);

        let numerical = NumericalIntegrationFuturesMethod::default();
        let numerical_price = numerical.price(&futures, &hw).unwrap();
        assert_relative_eq!(price, numerical_price, max_relative = 1e-6);

        let numerical_sens = numerical
            .price_curve_sensitivity(&futures, &hw)
            .unwrap()
            .cleaned();
        let sens = sens.cleaned();
        for &(t, v) in sens.get(CURVE).unwrap() {
            assert_relative_eq!(v, numerical_sens.at(CURVE, t), epsilon = 5e-5);
        }
    }
}

#[test]
fn test_piecewise_volatility_matches_numerical_integration() {
    let curves = curves_with(treasury_curve());
    let futures = two_bond_basket(&curves);
    let params =
        HullWhiteParameters::new(0.03, vec![0.008, 0.012, 0.01], vec![0.2, 3.0]).unwrap();
    let hw = HullWhiteProvider::new(params, Currency::USD, &curves);

    let analytic = HullWhiteFuturesMethod::default().price(&futures, &hw).unwrap();
    let numerical = NumericalIntegrationFuturesMethod::default()
        .price(&futures, &hw)
        .unwrap();
    assert_relative_eq!(analytic, numerical, max_relative = 1e-6);
}

#[test]
fn test_single_bond_takes_the_closed_form() {
    let curves = curves_with(treasury_curve());
    let futures = futures(vec![coupon_bond("T 4 2031", 0.04, 5, 0.008)], vec![0.95]);
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    let trace = HullWhiteFuturesMethod::default().trace(&futures, &hw).unwrap();
    assert!(trace.grid().is_none());
    assert!(trace.switch_points().is_empty());
    assert_eq!(trace.switch_points().ctd(), &[0]);

    let bond = &trace.bonds()[0];
    let sum: f64 = bond.cash_flows.iter().map(|cf| cf.adjusted_amount).sum();
    assert_relative_eq!(trace.price(), sum - bond.adjusted_accrued, epsilon = 1e-14);
}

// =============================================================================
// SWITCH POINTS
// =============================================================================

#[test]
fn test_switch_point_location() {
    let curves = curves_with(treasury_curve());
    let zero = |name: &str, maturity: f64| {
        FixedCouponBond::new(name, Currency::USD, CURVE, DELIVERY, vec![CashFlow::new(maturity, 1.0)])
            .unwrap()
    };
    let basket = vec![zero("2y", 2.0), zero("8y", 8.0)];
    let clean = DiscountingFuturesMethod::default()
        .clean_prices(&futures(basket.clone(), vec![1.0, 1.0]), &curves)
        .unwrap();
    let futures = futures(basket, vec![clean[0], clean[1] * 0.999]);
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    let trace = HullWhiteFuturesMethod::default().trace(&futures, &hw).unwrap();

    let short = &trace.bonds()[0].cash_flows[0];
    let long = &trace.bonds()[1].cash_flows[0];
    let expected = ((short.adjusted_amount / long.adjusted_amount).ln()
        - 0.5 * (short.alpha * short.alpha - long.alpha * long.alpha))
        / (short.alpha - long.alpha);

    assert_eq!(trace.switch_points().len(), 1);
    assert_relative_eq!(trace.switch_points().kappa()[0], expected, epsilon = 1e-7);
    // The longer bond loses more value as the state rises.
    assert_eq!(trace.switch_points().ctd(), &[0, 1]);
}

#[test]
fn test_trace_feeds_the_backward_sweep() {
    let curves = curves_with(treasury_curve());
    let futures = two_bond_basket(&curves);
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    let method = HullWhiteFuturesMethod::default();
    let trace = method.trace(&futures, &hw).unwrap();

    let switch_points = trace.switch_points();
    assert_eq!(switch_points.ctd().len(), switch_points.len() + 1);
    assert!(switch_points.ctd().iter().all(|&ctd| ctd < trace.bonds().len()));
    assert!(trace.grid().is_some());
    assert_eq!(trace.delivery_time(), DELIVERY);

    let from_trace = HullWhiteFuturesMethod::sensitivity_from_trace(&trace);
    let direct = method.price_curve_sensitivity(&futures, &hw).unwrap();
    assert_relative_eq!(from_trace.total(CURVE), direct.total(CURVE), max_relative = 1e-14);
    assert_eq!(trace.price(), method.price(&futures, &hw).unwrap());
}

#[test]
fn test_switch_point_window_is_configurable() {
    let curves = curves_with(treasury_curve());
    let futures = two_bond_basket(&curves);
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    let reference = HullWhiteFuturesMethod::default().price(&futures, &hw).unwrap();

    let mut config = HullWhiteFuturesConfig::default().with_grid_points(201);
    config.switch_point.bracket_half_width = 0.05;
    let price = HullWhiteFuturesMethod::new(config).price(&futures, &hw).unwrap();
    assert_relative_eq!(price, reference, epsilon = 1e-10);
}

// =============================================================================
// ADJOINT SENSITIVITY
// =============================================================================

/// Central difference of the price against a zero-rate bump of each pillar.
fn assert_matches_bumped_prices(method: &HullWhiteFuturesMethod, futures: &BondFuturesSecurity) {
    let curve = treasury_curve();
    let curves = curves_with(curve.clone());
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    let sens = method.price_curve_sensitivity(futures, &hw).unwrap().cleaned();

    let bump = 1e-6;
    let bumped_price = |index: usize, shift: f64| {
        let bumped = curves
            .replaced(CURVE, curve.with_bumped_pillar(index, shift).unwrap())
            .unwrap();
        method.price(futures, &hw.with_curves(&bumped)).unwrap()
    };

    let mut checked = 0;
    for (index, &t) in curve.times().iter().enumerate() {
        let adjoint = sens.at(CURVE, t);
        if adjoint == 0.0 {
            continue;
        }
        let fd = (bumped_price(index, bump) - bumped_price(index, -bump)) / (2.0 * bump);
        assert_relative_eq!(adjoint, fd, max_relative = 1e-4);
        checked += 1;
    }
    assert!(checked >= 3);
}

#[test]
fn test_adjoint_matches_finite_difference_single_bond() {
    let method = HullWhiteFuturesMethod::default();
    for maturity in [2, 5, 10] {
        let futures = futures(
            vec![coupon_bond("T 3.5", 0.035, maturity, 0.007)],
            vec![0.92],
        );
        assert_matches_bumped_prices(&method, &futures);
    }
}

#[test]
fn test_adjoint_matches_finite_difference_with_switch() {
    let curves = curves_with(treasury_curve());
    let futures = two_bond_basket(&curves);
    assert_matches_bumped_prices(&HullWhiteFuturesMethod::default(), &futures);
}

#[test]
fn test_adjoint_contains_delivery_term() {
    let curves = curves_with(treasury_curve());
    let futures = futures(vec![coupon_bond("T 3.5", 0.035, 5, 0.0)], vec![0.92]);
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    let sens = HullWhiteFuturesMethod::default()
        .price_curve_sensitivity(&futures, &hw)
        .unwrap();
    let price = HullWhiteFuturesMethod::default().price(&futures, &hw).unwrap();
    // Every adjusted amount is proportional to 1 / df(delivery).
    assert_relative_eq!(sens.at(CURVE, DELIVERY), DELIVERY * price, max_relative = 1e-12);
}

// =============================================================================
// METHOD SELECTION AND ERRORS
// =============================================================================

#[test]
fn test_tagged_union_dispatch() {
    let curves = curves_with(treasury_curve());
    let futures = two_bond_basket(&curves);
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    let market = FuturesMarketData::from(&hw);

    let direct = HullWhiteFuturesMethod::default().price(&futures, &hw).unwrap();
    let method = FuturesPricingMethod::HullWhiteAnalytic(HullWhiteFuturesMethod::default());
    assert_eq!(method.price(&futures, &market).unwrap(), direct);

    let discounting =
        FuturesPricingMethod::Discounting(DiscountingFuturesMethod::new(DiscountingFuturesConfig::default()));
    let forward = discounting.price(&futures, &market).unwrap();
    assert!(direct < forward);
}

#[test]
fn test_deserialized_inputs_are_validated() {
    init_tracing();
    let empty = toml::from_str::<BondFuturesSecurity>(
        r#"
        name = "TYU6"
        currency = "USD"
        expiry_time = 0.45
        delivery_time = 0.5
        basket = []
        conversion_factors = []
        "#,
    );
    assert!(empty.unwrap_err().to_string().contains("empty basket"));

    let stepped = toml::from_str::<HullWhiteParameters>(
        "mean_reversion = 0.03\nvolatility = [0.01, 0.01]\nvolatility_times = []",
    );
    assert!(stepped.is_err());

    let contract: BondFuturesSecurity = toml::from_str(
        r#"
        name = "TYU6"
        currency = "USD"
        expiry_time = 0.45
        delivery_time = 0.5
        conversion_factors = [0.95]

        [[basket]]
        name = "T 4 2031"
        currency = "USD"
        curve_name = "USD-TSY"
        settlement_time = 0.5
        accrued_interest = 0.008
        cash_flows = [{ time = 1.0, amount = 0.02 }, { time = 1.5, amount = 1.02 }]
        "#,
    )
    .unwrap();
    let parameters: HullWhiteParameters =
        toml::from_str("mean_reversion = 0.05\nvolatility = [0.01]").unwrap();
    let curves = curves_with(treasury_curve());
    let hw = HullWhiteProvider::new(parameters, Currency::USD, &curves);
    let price = HullWhiteFuturesMethod::default().price(&contract, &hw).unwrap();
    assert!(price.is_finite() && price > 1.0);
}

#[test]
fn test_currency_mismatch_is_rejected() {
    let curves = curves_with(treasury_curve());
    let futures = two_bond_basket(&curves);
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::EUR,
        &curves,
    );
    let err = HullWhiteFuturesMethod::default().price(&futures, &hw).unwrap_err();
    assert!(matches!(err, PricingError::InvalidArgument { .. }));
    let err = NumericalIntegrationFuturesMethod::default()
        .price(&futures, &hw)
        .unwrap_err();
    assert!(matches!(err, PricingError::InvalidArgument { .. }));
}

#[test]
fn test_small_grid_is_rejected() {
    let curves = curves_with(treasury_curve());
    let futures = two_bond_basket(&curves);
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    let method = HullWhiteFuturesMethod::new(HullWhiteFuturesConfig::default().with_grid_points(2));
    assert!(matches!(
        method.price(&futures, &hw),
        Err(PricingError::InvalidArgument { .. })
    ));
}

#[test]
fn test_unknown_curve_is_reported() {
    let curves = CurveSet::new().with_curve("EUR-BUND", treasury_curve());
    let futures = futures(vec![coupon_bond("T 4 2031", 0.04, 5, 0.0)], vec![0.95]);
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    assert!(matches!(
        HullWhiteFuturesMethod::default().price(&futures, &hw),
        Err(PricingError::Curve(_))
    ));
}

#[test]
fn test_integrator_budget_is_reported() {
    let curves = curves_with(treasury_curve());
    let futures = two_bond_basket(&curves);
    let hw = HullWhiteProvider::new(
        HullWhiteParameters::constant(0.05, 0.01).unwrap(),
        Currency::USD,
        &curves,
    );
    let mut config = HullWhiteFuturesConfig::default();
    config.integration.max_depth = 1;
    config.integration.relative_tolerance = 1e-14;
    let err = NumericalIntegrationFuturesMethod::new(config)
        .price(&futures, &hw)
        .unwrap_err();
    assert!(err.is_convergence_failure());
}
