//! Configuration of the futures pricing methods.
//!
//! Every field has a serde default, so a TOML document only needs the values
//! it overrides:
//!
//! ```rust
//! use bondfut_pricing::config::HullWhiteFuturesConfig;
//!
//! let config = HullWhiteFuturesConfig::from_toml_str(
//!     r#"
//!     grid_points = 161
//!
//!     [switch_point]
//!     max_bracket_steps = 0
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.grid_points, 161);
//! assert_eq!(config.switch_point.max_bracket_steps, 0);
//! assert_eq!(config.switch_point.bracket_half_width, 0.01);
//! ```

use bondfut_math::integration::IntegratorConfig;
use bondfut_math::quadrature::DEFAULT_GRID_POINTS;
use bondfut_math::solvers::{BracketConfig, SolverConfig};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

/// Geometric growth of the bracketing window per expansion step.
const BRACKET_EXPANSION_RATIO: f64 = 1.6;

// =============================================================================
// HULL-WHITE METHODS
// =============================================================================

/// Configuration of the Hull-White analytic and numerical-integration methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullWhiteFuturesConfig {
    /// Number of quadrature grid points used to detect CTD switches.
    #[serde(default = "default_grid_points")]
    pub grid_points: usize,

    /// Switch point search.
    #[serde(default)]
    pub switch_point: SwitchPointConfig,

    /// Numerical integration, used by the cross-check method.
    #[serde(default)]
    pub integration: IntegrationConfig,
}

/// Bracketing and refinement of CTD switch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchPointConfig {
    /// Half width of the starting window around the first grid point where a
    /// new CTD is observed.
    #[serde(default = "default_bracket_half_width")]
    pub bracket_half_width: f64,

    /// Maximum geometric expansions of the window. Zero keeps the window fixed.
    #[serde(default = "default_max_bracket_steps")]
    pub max_bracket_steps: u32,

    /// Absolute accuracy of Ridder's method.
    #[serde(default = "default_root_accuracy")]
    pub root_accuracy: f64,

    /// Iteration budget of Ridder's method.
    #[serde(default = "default_max_root_iterations")]
    pub max_root_iterations: u32,
}

/// Adaptive Runge-Kutta integration over `[-limit, limit]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Magnitude floor of the acceptance test.
    #[serde(default = "default_absolute_tolerance")]
    pub absolute_tolerance: f64,

    /// Relative acceptance tolerance.
    #[serde(default = "default_relative_tolerance")]
    pub relative_tolerance: f64,

    /// Number of initial equal steps.
    #[serde(default = "default_min_steps")]
    pub min_steps: u32,

    /// Integration range in standard deviations.
    #[serde(default = "default_limit")]
    pub limit: f64,

    /// Maximum number of step halvings.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of integrand evaluations per integral.
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: u64,
}

fn default_grid_points() -> usize {
    DEFAULT_GRID_POINTS
}

fn default_bracket_half_width() -> f64 {
    0.01
}

fn default_max_bracket_steps() -> u32 {
    50
}

fn default_root_accuracy() -> f64 {
    1e-8
}

fn default_max_root_iterations() -> u32 {
    100
}

fn default_absolute_tolerance() -> f64 {
    1e-2
}

fn default_relative_tolerance() -> f64 {
    1e-6
}

fn default_min_steps() -> u32 {
    15
}

fn default_limit() -> f64 {
    10.0
}

fn default_max_depth() -> u32 {
    40
}

fn default_max_evaluations() -> u64 {
    2_000_000
}

impl Default for HullWhiteFuturesConfig {
    fn default() -> Self {
        Self {
            grid_points: default_grid_points(),
            switch_point: SwitchPointConfig::default(),
            integration: IntegrationConfig::default(),
        }
    }
}

impl Default for SwitchPointConfig {
    fn default() -> Self {
        Self {
            bracket_half_width: default_bracket_half_width(),
            max_bracket_steps: default_max_bracket_steps(),
            root_accuracy: default_root_accuracy(),
            max_root_iterations: default_max_root_iterations(),
        }
    }
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            absolute_tolerance: default_absolute_tolerance(),
            relative_tolerance: default_relative_tolerance(),
            min_steps: default_min_steps(),
            limit: default_limit(),
            max_depth: default_max_depth(),
            max_evaluations: default_max_evaluations(),
        }
    }
}

impl HullWhiteFuturesConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> PricingResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            PricingError::invalid_argument(format!("invalid Hull-White futures config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the grid size.
    #[must_use]
    pub fn with_grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points;
        self
    }

    /// Checks every block.
    pub fn validate(&self) -> PricingResult<()> {
        if self.grid_points < 3 {
            return Err(PricingError::invalid_argument(format!(
                "grid_points must be at least 3, got {}",
                self.grid_points
            )));
        }
        self.switch_point.validate()?;
        self.integration.validate()
    }
}

impl SwitchPointConfig {
    /// Checks that the window and tolerances are positive.
    pub fn validate(&self) -> PricingResult<()> {
        positive("switch_point.bracket_half_width", self.bracket_half_width)?;
        positive("switch_point.root_accuracy", self.root_accuracy)?;
        if self.max_root_iterations == 0 {
            return Err(PricingError::invalid_argument(
                "switch_point.max_root_iterations must be positive",
            ));
        }
        Ok(())
    }

    /// Bracketing settings for the math layer.
    pub fn bracket_config(&self) -> BracketConfig {
        BracketConfig::new(BRACKET_EXPANSION_RATIO, self.max_bracket_steps)
    }

    /// Ridder settings for the math layer.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.root_accuracy, self.max_root_iterations)
    }
}

impl IntegrationConfig {
    /// Checks tolerances, range and budgets.
    pub fn validate(&self) -> PricingResult<()> {
        positive("integration.absolute_tolerance", self.absolute_tolerance)?;
        positive("integration.relative_tolerance", self.relative_tolerance)?;
        positive("integration.limit", self.limit)?;
        if self.min_steps == 0 || self.max_evaluations == 0 {
            return Err(PricingError::invalid_argument(
                "integration.min_steps and integration.max_evaluations must be positive",
            ));
        }
        Ok(())
    }

    /// Integrator settings for the math layer.
    pub fn integrator_config(&self) -> IntegratorConfig {
        IntegratorConfig {
            absolute_tolerance: self.absolute_tolerance,
            relative_tolerance: self.relative_tolerance,
            min_steps: self.min_steps,
            max_depth: self.max_depth,
            max_evaluations: self.max_evaluations,
        }
    }
}

fn positive(field: &str, value: f64) -> PricingResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::invalid_argument(format!(
            "{field} must be positive and finite, got {value}"
        )))
    }
}

// =============================================================================
// DISCOUNTING METHOD
// =============================================================================

/// How the discounting method picks the CTD for its curve sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityCtdSelection {
    /// Minimum of clean price over conversion factor, ignoring net basis.
    #[default]
    CleanPrice,
    /// Minimum of clean price less net basis over conversion factor, the
    /// same rule the price uses.
    NetOfBasis,
}

/// Configuration of the discounting method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscountingFuturesConfig {
    /// CTD selection used by the curve sensitivity.
    #[serde(default)]
    pub sensitivity_ctd: SensitivityCtdSelection,
}

impl DiscountingFuturesConfig {
    /// Parses a TOML document.
    ///
    /// The only field is an enum, so a document that parses is valid.
    pub fn from_toml_str(content: &str) -> PricingResult<Self> {
        toml::from_str(content).map_err(|e| {
            PricingError::invalid_argument(format!("invalid discounting futures config: {e}"))
        })
    }
}
