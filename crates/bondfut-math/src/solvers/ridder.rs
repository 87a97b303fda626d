//! Ridder's root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Ridder's method.
///
/// Each iteration evaluates the midpoint of the bracket and fits an
/// exponential through the three points, which gives quadratic convergence
/// while the root stays bracketed.
///
/// Requires: `f(a) * f(b) <= 0`. Converges when successive estimates, or the
/// bracket width, fall below `config.tolerance`.
///
/// # Errors
///
/// `MathError::InvalidBracket` when the endpoints share a sign and
/// `MathError::ConvergenceFailed` when the iteration budget runs out.
///
/// # Example
///
/// ```rust
/// use bondfut_math::solvers::{ridder, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let result = ridder(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-8);
/// ```
pub fn ridder<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut xl = a;
    let mut xh = b;
    let mut fl = f(xl);
    let mut fh = f(xh);

    if fl == 0.0 {
        return Ok(SolverResult {
            root: xl,
            iterations: 0,
            residual: 0.0,
        });
    }
    if fh == 0.0 {
        return Ok(SolverResult {
            root: xh,
            iterations: 0,
            residual: 0.0,
        });
    }
    if fl * fh > 0.0 {
        return Err(MathError::InvalidBracket {
            a,
            b,
            fa: fl,
            fb: fh,
        });
    }

    let mut answer = f64::NAN;
    let mut f_answer = f64::NAN;

    for iteration in 1..=config.max_iterations {
        let xm = 0.5 * (xl + xh);
        let fm = f(xm);
        let s = (fm * fm - fl * fh).sqrt();
        if s == 0.0 {
            return Ok(SolverResult {
                root: xm,
                iterations: iteration,
                residual: fm,
            });
        }

        let direction = if fl >= fh { 1.0 } else { -1.0 };
        let x_new = xm + (xm - xl) * direction * fm / s;
        if (x_new - answer).abs() <= config.tolerance {
            return Ok(SolverResult {
                root: answer,
                iterations: iteration,
                residual: f_answer,
            });
        }

        answer = x_new;
        f_answer = f(answer);
        if f_answer == 0.0 {
            return Ok(SolverResult {
                root: answer,
                iterations: iteration,
                residual: 0.0,
            });
        }

        if fm.signum() != f_answer.signum() {
            xl = xm;
            fl = fm;
            xh = answer;
            fh = f_answer;
        } else if fl.signum() != f_answer.signum() {
            xh = answer;
            fh = f_answer;
        } else {
            xl = answer;
            fl = f_answer;
        }

        if (xh - xl).abs() <= config.tolerance {
            return Ok(SolverResult {
                root: answer,
                iterations: iteration,
                residual: f_answer,
            });
        }
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        f_answer.abs(),
    ))
}
