//! # Bond Futures Curves
//!
//! Discount curves and curve sensitivities for the bond futures engine.
//!
//! This crate provides:
//!
//! - **Curve trait**: discount factors, zero rates and forward rates by time
//! - **Curves**: log-linear pillar curve, flat curve, parallel shift wrapper
//! - **Providers**: named curve lookup consumed by the pricers
//! - **Sensitivities**: additive zero-rate point sensitivities per curve
//!
//! ## Example
//!
//! ```rust
//! use bondfut_curves::prelude::*;
//!
//! let curve = DiscountCurveBuilder::new()
//!     .add_zero_rate(1.0, 0.03)
//!     .add_zero_rate(10.0, 0.035)
//!     .build()
//!     .unwrap();
//! let curves = CurveSet::new().with_curve("USD-TSY", curve);
//!
//! let df = curves.discount_factor("USD-TSY", 5.0).unwrap();
//! assert!(df > 0.8 && df < 0.9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]

pub mod currency;
pub mod curves;
pub mod error;
pub mod provider;
pub mod sensitivity;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::currency::Currency;
    pub use crate::curves::{DiscountCurve, DiscountCurveBuilder, FlatCurve, ShiftedCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::provider::{CurveProvider, CurveSet};
    pub use crate::sensitivity::CurveSensitivity;
    pub use crate::traits::Curve;
}

pub use currency::Currency;
pub use curves::{DiscountCurve, DiscountCurveBuilder, FlatCurve, ShiftedCurve};
pub use error::{CurveError, CurveResult};
pub use provider::{CurveProvider, CurveSet};
pub use sensitivity::CurveSensitivity;
pub use traits::Curve;
