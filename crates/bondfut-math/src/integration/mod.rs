//! Numerical integration.
//!
//! - [`RungeKuttaIntegrator`]: adaptive fourth-order (Simpson) quadrature with
//!   step halving and a bounded refinement budget

mod runge_kutta;

pub use runge_kutta::{IntegrationResult, IntegratorConfig, RungeKuttaIntegrator};
