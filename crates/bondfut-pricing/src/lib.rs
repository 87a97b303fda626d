//! # Bond Futures Pricing
//!
//! Fair value of bond futures on a basket of deliverable bonds.
//!
//! This crate provides:
//! - **Instruments**: fixed-coupon bonds as cash flow lists and the futures
//!   security with its basket and conversion factors
//! - **Discounting**: CTD selection on forward price over conversion factor
//! - **Hull-White**: convexity adjusted price by switch points and closed-form
//!   segment integration, with an adjoint curve sensitivity
//! - **Numerical integration**: an independent Hull-White price used as a
//!   cross-check
//!
//! ## Usage
//!
//! ```rust
//! use bondfut_curves::{Currency, CurveSet, DiscountCurve};
//! use bondfut_pricing::prelude::*;
//!
//! let bond = |name: &str, amount: f64| {
//!     FixedCouponBond::new(name, Currency::USD, "USD-TSY", 0.25, vec![CashFlow::new(2.0, amount)])
//! };
//! let futures = BondFuturesSecurity::new(
//!     "TYZ6",
//!     Currency::USD,
//!     0.25,
//!     0.25,
//!     vec![bond("A", 1.03)?, bond("B", 1.02)?],
//!     vec![0.95, 0.94],
//! )?;
//!
//! let curve = DiscountCurve::new(vec![0.25, 2.0], vec![0.995, 0.96])?;
//! let curves = CurveSet::new().with_curve("USD-TSY", curve);
//! let hull_white =
//!     HullWhiteProvider::new(HullWhiteParameters::constant(0.03, 0.01)?, Currency::USD, &curves);
//!
//! let method = FuturesPricingMethod::HullWhiteAnalytic(HullWhiteFuturesMethod::default());
//! let price = method.price(&futures, &FuturesMarketData::from(&hull_white))?;
//! assert!(price < 1.1);
//! # Ok::<(), PricingError>(())
//! ```
//!
//! ## Lifetimes
//!
//! Pricing methods hold only configuration. Curves and model parameters are
//! borrowed for the duration of one call, so a method can be shared across
//! threads and reused for any number of contracts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]

pub mod bond_pricer;
pub mod config;
pub mod error;
pub mod futures;
pub mod instruments;
pub mod method;
pub mod models;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bond_pricer::{BondPricer, DiscountingBondPricer};
    pub use crate::config::{
        DiscountingFuturesConfig, HullWhiteFuturesConfig, IntegrationConfig,
        SensitivityCtdSelection, SwitchPointConfig,
    };
    pub use crate::error::{ConvergenceStage, PricingError, PricingResult};
    pub use crate::futures::{
        DiscountingFuturesMethod, HullWhiteFuturesMethod, HullWhiteFuturesTrace,
        NumericalIntegrationFuturesMethod, SwitchPoints,
    };
    pub use crate::instruments::{BondFuturesSecurity, CashFlow, FixedCouponBond};
    pub use crate::method::{
        FuturesMarketData, FuturesMethodKind, FuturesPricer, FuturesPricingMethod,
    };
    pub use crate::models::{HullWhiteParameters, HullWhiteProvider};
}

pub use error::{PricingError, PricingResult};
