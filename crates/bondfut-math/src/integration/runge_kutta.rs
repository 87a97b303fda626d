//! Adaptive fourth-order Runge-Kutta quadrature.
//!
//! Integrating `f` is solving `y' = f(x)`; a classical Runge-Kutta step on
//! that equation reduces to Simpson's rule on `[x, x + h]`. The integrator
//! splits the range into `min_steps` equal steps, compares each step against
//! its two half steps, and halves again wherever the difference is too large.
//!
//! A sub-interval is accepted when
//!
//! ```text
//! |S(two halves) - S(one step)| <= relative_tolerance * max(|S(two halves)|, absolute_tolerance)
//! ```
//!
//! so small contributions are held to `relative_tolerance * absolute_tolerance`
//! rather than to a vanishing relative bound. Accepted values get the
//! Richardson correction `(two - one) / 15`.

use crate::error::{MathError, MathResult};

/// Configuration for [`RungeKuttaIntegrator`].
#[derive(Debug, Clone, Copy)]
pub struct IntegratorConfig {
    /// Magnitude floor used by the acceptance test.
    pub absolute_tolerance: f64,
    /// Relative acceptance tolerance.
    pub relative_tolerance: f64,
    /// Number of initial equal steps.
    pub min_steps: u32,
    /// Maximum number of halvings of an initial step.
    pub max_depth: u32,
    /// Maximum number of function evaluations.
    pub max_evaluations: u64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            absolute_tolerance: 1e-2,
            relative_tolerance: 1e-6,
            min_steps: 15,
            max_depth: 40,
            max_evaluations: 2_000_000,
        }
    }
}

/// Value of an integral and the work spent on it.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationResult {
    /// Integral estimate.
    pub value: f64,
    /// Number of integrand evaluations.
    pub evaluations: u64,
}

/// Adaptive Runge-Kutta (Simpson) integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaIntegrator {
    config: IntegratorConfig,
}

struct Panel {
    x: f64,
    h: f64,
    f_lo: f64,
    f_mid: f64,
    f_hi: f64,
    whole: f64,
}

impl RungeKuttaIntegrator {
    /// Creates an integrator with the given configuration.
    #[must_use]
    pub fn new(config: IntegratorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Integrates `f` over `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// `MathError::InvalidInput` for non-finite bounds or a zero step count, and
    /// `MathError::IntegrationFailed` when a sub-interval cannot meet the
    /// tolerance within `max_depth` halvings or the evaluation budget runs out.
    pub fn integrate<F>(&self, f: F, lower: f64, upper: f64) -> MathResult<IntegrationResult>
    where
        F: Fn(f64) -> f64,
    {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(MathError::invalid_input(format!(
                "integration bounds must be finite, got [{lower}, {upper}]"
            )));
        }
        if self.config.min_steps == 0 {
            return Err(MathError::invalid_input("min_steps must be positive"));
        }
        if lower == upper {
            return Ok(IntegrationResult {
                value: 0.0,
                evaluations: 0,
            });
        }
        if lower > upper {
            let result = self.integrate(f, upper, lower)?;
            return Ok(IntegrationResult {
                value: -result.value,
                evaluations: result.evaluations,
            });
        }

        let h = (upper - lower) / f64::from(self.config.min_steps);
        let mut evaluations = 1;
        let mut f_lo = f(lower);
        let mut total = 0.0;

        for step in 0..self.config.min_steps {
            let x = lower + f64::from(step) * h;
            let f_mid = f(x + 0.5 * h);
            let f_hi = f(x + h);
            evaluations += 2;
            let panel = Panel {
                x,
                h,
                f_lo,
                f_mid,
                f_hi,
                whole: h * (f_lo + 4.0 * f_mid + f_hi) / 6.0,
            };
            total += self.refine(&f, panel, 0, &mut evaluations)?;
            f_lo = f_hi;
        }

        log::trace!(
            "integrated [{lower}, {upper}] = {total:.12e} with {evaluations} evaluations"
        );

        Ok(IntegrationResult {
            value: total,
            evaluations,
        })
    }

    fn refine<F>(&self, f: &F, panel: Panel, depth: u32, evaluations: &mut u64) -> MathResult<f64>
    where
        F: Fn(f64) -> f64,
    {
        let Panel {
            x,
            h,
            f_lo,
            f_mid,
            f_hi,
            whole,
        } = panel;
        let half = 0.5 * h;
        let f_left_mid = f(x + 0.25 * h);
        let f_right_mid = f(x + 0.75 * h);
        *evaluations += 2;

        let left = half * (f_lo + 4.0 * f_left_mid + f_mid) / 6.0;
        let right = half * (f_mid + 4.0 * f_right_mid + f_hi) / 6.0;
        let two = left + right;
        let error = (two - whole).abs();

        let scale = two.abs().max(self.config.absolute_tolerance);
        if error <= self.config.relative_tolerance * scale {
            return Ok(two + (two - whole) / 15.0);
        }

        if depth >= self.config.max_depth {
            return Err(MathError::IntegrationFailed {
                lower: x,
                upper: x + h,
                evaluations: *evaluations,
                reason: format!("tolerance not met after {depth} halvings"),
            });
        }
        if *evaluations >= self.config.max_evaluations {
            return Err(MathError::IntegrationFailed {
                lower: x,
                upper: x + h,
                evaluations: *evaluations,
                reason: "evaluation budget exhausted".to_string(),
            });
        }

        let left_value = self.refine(
            f,
            Panel {
                x,
                h: half,
                f_lo,
                f_mid: f_left_mid,
                f_hi: f_mid,
                whole: left,
            },
            depth + 1,
            evaluations,
        )?;
        let right_value = self.refine(
            f,
            Panel {
                x: x + half,
                h: half,
                f_lo: f_mid,
                f_mid: f_right_mid,
                f_hi,
                whole: right,
            },
            depth + 1,
            evaluations,
        )?;
        Ok(left_value + right_value)
    }
}
