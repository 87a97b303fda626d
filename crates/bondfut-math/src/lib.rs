//! # Bond Futures Math
//!
//! Numerical building blocks for the bond futures pricing engine.
//!
//! This crate provides:
//!
//! - **Distributions**: Standard normal CDF, PDF and inverse CDF
//! - **Quadrature grid**: Non-uniform antisymmetric grid of normal abscissas
//! - **Solvers**: Root bracketing and Ridder's method
//! - **Integration**: Adaptive Runge-Kutta (Simpson) quadrature
//!
//! ## Design Philosophy
//!
//! - **Bounded work**: every iterative routine has an explicit budget and
//!   reports exhaustion as an error
//! - **Stateless**: all functions are pure and safe to call concurrently

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
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]

pub mod distributions;
pub mod error;
pub mod integration;
pub mod quadrature;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::distributions::{normal_cdf, normal_inv_cdf, normal_pdf, INV_SQRT_2PI};
    pub use crate::error::{MathError, MathResult};
    pub use crate::integration::{IntegrationResult, IntegratorConfig, RungeKuttaIntegrator};
    pub use crate::quadrature::{QuadratureGrid, DEFAULT_GRID_POINTS};
    pub use crate::solvers::{
        bracket_root, ridder, BracketConfig, SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};
