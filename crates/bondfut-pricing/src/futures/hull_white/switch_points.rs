//! Location of the states where the cheapest to deliver bond changes.
//!
//! Bond values are sampled on the quadrature grid. Wherever the CTD index
//! differs from the one at the previous grid point, the difference of the two
//! bond values is bracketed around that grid point and its root refined with
//! Ridder's method. The roots split the real line into segments with a single
//! CTD each.

use bondfut_math::quadrature::QuadratureGrid;
use bondfut_math::solvers::{bracket_root, ridder};
use tracing::{debug, trace};

use crate::config::SwitchPointConfig;
use crate::error::PricingResult;
use crate::futures::hull_white::trace::{cheapest_at, BondAdjustment};

/// Increasing switch points `κ_0 < … < κ_{m-1}` and the CTD on each of the
/// `m + 1` segments they delimit.
///
/// Built only by the switch point search or [`SwitchPoints::single`], so
/// there is always one more CTD than switch points.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchPoints {
    kappa: Vec<f64>,
    ctd: Vec<usize>,
}

impl SwitchPoints {
    /// A single segment covering the real line.
    #[must_use]
    pub fn single(ctd: usize) -> Self {
        Self {
            kappa: Vec::new(),
            ctd: vec![ctd],
        }
    }

    /// The switch points.
    pub fn kappa(&self) -> &[f64] {
        &self.kappa
    }

    /// CTD basket index on each segment, from `-∞` to `+∞`.
    pub fn ctd(&self) -> &[usize] {
        &self.ctd
    }

    /// Number of switch points.
    pub fn len(&self) -> usize {
        self.kappa.len()
    }

    /// True when one bond is the CTD everywhere.
    pub fn is_empty(&self) -> bool {
        self.kappa.is_empty()
    }

    /// Iterates over segments as `(lower, upper, ctd)` with infinite outer bounds.
    pub fn segments(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.ctd.iter().enumerate().map(move |(s, &ctd)| {
            let lower = if s == 0 {
                f64::NEG_INFINITY
            } else {
                self.kappa[s - 1]
            };
            let upper = self.kappa.get(s).copied().unwrap_or(f64::INFINITY);
            (lower, upper, ctd)
        })
    }
}

/// Finds the switch points of `bonds` on `grid`.
///
/// # Errors
///
/// `PricingError::ConvergenceFailure` if a transition cannot be bracketed
/// within the configured expansions or Ridder's method runs out of iterations.
pub(crate) fn find_switch_points(
    bonds: &[BondAdjustment],
    grid: &QuadratureGrid,
    config: &SwitchPointConfig,
) -> PricingResult<SwitchPoints> {
    let points = grid.points();
    let bracket = config.bracket_config();
    let solver = config.solver_config();

    let mut current = cheapest_at(bonds, points[0]);
    let mut kappa = Vec::new();
    let mut ctd = vec![current];

    for &x in &points[1..] {
        let next = cheapest_at(bonds, x);
        if next == current {
            continue;
        }

        let (prev_bond, next_bond) = (&bonds[current], &bonds[next]);
        let difference = |k: f64| prev_bond.value_at(k) - next_bond.value_at(k);
        let (lo, hi) = bracket_root(
            difference,
            x - config.bracket_half_width,
            x + config.bracket_half_width,
            &bracket,
        )?;
        let root = ridder(difference, lo, hi, &solver)?;
        trace!(
            from = current,
            to = next,
            grid_point = x,
            kappa = root.root,
            iterations = root.iterations,
            "refined switch point"
        );

        kappa.push(root.root);
        ctd.push(next);
        current = next;
    }

    debug!(
        grid_points = points.len(),
        switches = kappa.len(),
        ctd = ?ctd,
        "switch points located"
    );
    Ok(SwitchPoints { kappa, ctd })
}
