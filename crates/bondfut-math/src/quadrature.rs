//! Non-uniform grid of standard normal abscissas.
//!
//! The grid concentrates points in the centre of the distribution and
//! stretches a few points geometrically into each tail:
//!
//! ```text
//! nb_wing   = floor(n / 20)
//! nb_center = n - 2 * nb_wing
//! x_start   = Φ⁻¹(1 / (2 * nb_center))
//! centre    : nb_center points equally spaced on [x_start, -x_start]
//! wing w    : x_start * (1 + (nb_wing - w) / 2), mirrored on the right
//! ```
//!
//! The right half is the exact negation of the left half, so the grid is
//! antisymmetric bit for bit.

use crate::distributions::normal_inv_cdf;
use crate::error::{MathError, MathResult};

/// Default number of grid points.
pub const DEFAULT_GRID_POINTS: usize = 81;

/// Strictly increasing, antisymmetric set of standard normal abscissas.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureGrid {
    points: Vec<f64>,
    nb_wing: usize,
}

impl QuadratureGrid {
    /// Builds the grid with `n` points.
    ///
    /// # Errors
    ///
    /// Returns an error if `n < 3` or if fewer than two centre points remain.
    pub fn build(n: usize) -> MathResult<Self> {
        if n < 3 {
            return Err(MathError::insufficient_data(3, n));
        }
        let nb_wing = n / 20;
        let nb_center = n - 2 * nb_wing;
        if nb_center < 2 {
            return Err(MathError::invalid_input(format!(
                "grid of {n} points leaves {nb_center} centre points, need at least 2"
            )));
        }

        let prob = 1.0 / (2.0 * nb_center as f64);
        let x_start = normal_inv_cdf(prob)?;
        let step = -2.0 * x_start / (nb_center - 1) as f64;

        let mut points = vec![0.0; n];
        for w in 0..nb_wing {
            points[w] = x_start * (1.0 + (nb_wing - w) as f64 / 2.0);
        }
        for c in 0..nb_center {
            points[nb_wing + c] = x_start + c as f64 * step;
        }
        for i in 0..n / 2 {
            points[n - 1 - i] = -points[i];
        }
        if n % 2 == 1 {
            points[n / 2] = 0.0;
        }

        log::trace!(
            "quadrature grid: {} points, {} per wing, x_start = {:.6}",
            n,
            nb_wing,
            x_start
        );

        Ok(Self { points, nb_wing })
    }

    /// Returns the abscissas in increasing order.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a built grid has at least three points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of geometrically spaced points on each tail.
    #[must_use]
    pub fn wing_points(&self) -> usize {
        self.nb_wing
    }

    /// Number of linearly spaced centre points.
    #[must_use]
    pub fn center_points(&self) -> usize {
        self.points.len() - 2 * self.nb_wing
    }
}
