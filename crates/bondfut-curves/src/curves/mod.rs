//! Curve implementations.
//!
//! - [`DiscountCurve`]: log-linear discount factors on pillars
//! - [`FlatCurve`]: a single continuously compounded rate
//! - [`ShiftedCurve`]: parallel zero-rate shift over any curve

mod discount;
mod flat;
mod shifted;

pub use discount::{DiscountCurve, DiscountCurveBuilder};
pub use flat::FlatCurve;
pub use shifted::ShiftedCurve;
