//! Instruments priced by the engine.
//!
//! - [`FixedCouponBond`]: a deliverable bond as a list of cash flows
//! - [`BondFuturesSecurity`]: a futures contract on a basket of bonds

mod bond;
mod futures;

pub use bond::{CashFlow, FixedCouponBond};
pub use futures::BondFuturesSecurity;
