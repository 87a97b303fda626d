//! Futures pricing methods.
//!
//! - [`DiscountingFuturesMethod`]: forward price of the CTD, no convexity
//! - [`HullWhiteFuturesMethod`]: Hull-White analytic method with switch points
//! - [`NumericalIntegrationFuturesMethod`]: Hull-White by direct integration

pub mod discounting;
pub mod hull_white;
pub mod numerical;

pub use discounting::DiscountingFuturesMethod;
pub use hull_white::{
    BondAdjustment, CashFlowAdjustment, HullWhiteFuturesMethod, HullWhiteFuturesTrace,
    SwitchPoints,
};
pub use numerical::NumericalIntegrationFuturesMethod;
