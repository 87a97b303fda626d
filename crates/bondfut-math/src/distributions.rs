//! Standard normal distribution helpers.
//!
//! Thin wrappers over the `statrs` error functions:
//!
//! ```text
//! Φ(x)    = erfc(-x / √2) / 2
//! Φ⁻¹(p)  = -√2 · erfc⁻¹(2p)
//! ```

use statrs::function::erf::{erfc, erfc_inv};

use crate::error::{MathError, MathResult};

/// 1 / √(2π).
pub const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal cumulative distribution function.
///
/// Infinite arguments map to the limits: `Φ(-∞) = 0`, `Φ(+∞) = 1`.
#[must_use]
pub fn normal_cdf(x: f64) -> f64 {
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Standard normal probability density function.
#[must_use]
pub fn normal_pdf(x: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Inverse of the standard normal cumulative distribution function.
///
/// # Errors
///
/// Returns `MathError::InvalidInput` unless `0 < p < 1`.
pub fn normal_inv_cdf(p: f64) -> MathResult<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(MathError::invalid_input(format!(
            "probability {p} must lie strictly between 0 and 1"
        )));
    }
    Ok(-std::f64::consts::SQRT_2 * erfc_inv(2.0 * p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cdf_known_values() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_relative_eq!(normal_cdf(1.0), 0.841_344_746_068_543, epsilon = 1e-12);
        assert_relative_eq!(normal_cdf(-1.96), 0.024_997_895_148_220_4, epsilon = 1e-12);
    }

    #[test]
    fn test_cdf_infinite_limits() {
        assert_eq!(normal_cdf(f64::INFINITY), 1.0);
        assert_eq!(normal_cdf(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_cdf_symmetry() {
        for &x in &[0.1, 0.7, 1.3, 2.5, 4.0] {
            assert_relative_eq!(normal_cdf(x) + normal_cdf(-x), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_inverse_round_trip() {
        for &p in &[0.001, 0.025, 0.3, 0.5, 0.8, 0.999] {
            let x = normal_inv_cdf(p).unwrap();
            assert_relative_eq!(normal_cdf(x), p, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inverse_rejects_bounds() {
        assert!(normal_inv_cdf(0.0).is_err());
        assert!(normal_inv_cdf(1.0).is_err());
        assert!(normal_inv_cdf(f64::NAN).is_err());
    }

    #[test]
    fn test_pdf_peak() {
        assert_relative_eq!(normal_pdf(0.0), INV_SQRT_2PI, epsilon = 1e-15);
        assert_relative_eq!(normal_pdf(1.0), normal_pdf(-1.0), epsilon = 1e-15);
    }
}
