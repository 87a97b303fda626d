//! Short rate models used for futures convexity adjustments.

pub mod hull_white;

pub use hull_white::{HullWhiteParameters, HullWhiteProvider};
