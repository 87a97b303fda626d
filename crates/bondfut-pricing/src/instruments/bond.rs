//! Fixed coupon bonds described by their remaining cash flows.

use bondfut_curves::Currency;
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

/// A single payment of a bond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Payment time in years from the valuation date.
    pub time: f64,
    /// Payment amount per unit notional.
    pub amount: f64,
}

impl CashFlow {
    /// Creates a cash flow.
    #[must_use]
    pub fn new(time: f64, amount: f64) -> Self {
        Self { time, amount }
    }
}

/// A fixed coupon bond settling at `settlement_time`.
///
/// The cash flows are those received by a holder who settles at
/// `settlement_time`, in increasing time order. Schedule generation and day
/// counts happen upstream; this type only carries the result.
///
/// # Example
///
/// ```rust
/// use bondfut_curves::Currency;
/// use bondfut_pricing::instruments::{CashFlow, FixedCouponBond};
///
/// let bond = FixedCouponBond::new(
///     "UST 4% 2027",
///     Currency::USD,
///     "USD-TSY",
///     0.25,
///     vec![CashFlow::new(0.75, 0.02), CashFlow::new(1.25, 1.02)],
/// )
/// .unwrap()
/// .with_accrued_interest(0.005);
///
/// assert_eq!(bond.cash_flows().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FixedCouponBondRaw")]
pub struct FixedCouponBond {
    name: String,
    currency: Currency,
    curve_name: String,
    settlement_time: f64,
    cash_flows: Vec<CashFlow>,
    accrued_interest: f64,
}

/// Serialized form of [`FixedCouponBond`], checked by [`FixedCouponBond::new`].
#[derive(Deserialize)]
struct FixedCouponBondRaw {
    name: String,
    currency: Currency,
    curve_name: String,
    settlement_time: f64,
    cash_flows: Vec<CashFlow>,
    #[serde(default)]
    accrued_interest: f64,
}

impl TryFrom<FixedCouponBondRaw> for FixedCouponBond {
    type Error = PricingError;

    fn try_from(raw: FixedCouponBondRaw) -> PricingResult<Self> {
        if !raw.accrued_interest.is_finite() {
            return Err(PricingError::invalid_argument(format!(
                "bond {} has a non-finite accrued interest",
                raw.name
            )));
        }
        let bond = Self::new(
            raw.name,
            raw.currency,
            raw.curve_name,
            raw.settlement_time,
            raw.cash_flows,
        )?;
        Ok(bond.with_accrued_interest(raw.accrued_interest))
    }
}

impl FixedCouponBond {
    /// Creates a bond with zero accrued interest.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidArgument` if there are no cash flows, a
    /// time or amount is not finite, or the times are decreasing.
    pub fn new(
        name: impl Into<String>,
        currency: Currency,
        curve_name: impl Into<String>,
        settlement_time: f64,
        cash_flows: Vec<CashFlow>,
    ) -> PricingResult<Self> {
        let name = name.into();
        if cash_flows.is_empty() {
            return Err(PricingError::invalid_argument(format!(
                "bond {name} has no cash flows"
            )));
        }
        if !settlement_time.is_finite() {
            return Err(PricingError::invalid_argument(format!(
                "bond {name} has a non-finite settlement time"
            )));
        }
        let mut prev = f64::NEG_INFINITY;
        for cf in &cash_flows {
            if !cf.time.is_finite() || !cf.amount.is_finite() {
                return Err(PricingError::invalid_argument(format!(
                    "bond {name} has a non-finite cash flow at {}",
                    cf.time
                )));
            }
            if cf.time < prev {
                return Err(PricingError::invalid_argument(format!(
                    "bond {name} cash flows are not in time order ({prev} then {})",
                    cf.time
                )));
            }
            prev = cf.time;
        }

        Ok(Self {
            name,
            currency,
            curve_name: curve_name.into(),
            settlement_time,
            cash_flows,
            accrued_interest: 0.0,
        })
    }

    /// Sets the accrued interest paid at settlement.
    #[must_use]
    pub fn with_accrued_interest(mut self, accrued_interest: f64) -> Self {
        self.accrued_interest = accrued_interest;
        self
    }

    /// Bond name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Currency of the cash flows.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Name of the discounting curve.
    pub fn curve_name(&self) -> &str {
        &self.curve_name
    }

    /// Settlement time in years.
    pub fn settlement_time(&self) -> f64 {
        self.settlement_time
    }

    /// Cash flows after settlement.
    pub fn cash_flows(&self) -> &[CashFlow] {
        &self.cash_flows
    }

    /// Accrued interest at settlement.
    pub fn accrued_interest(&self) -> f64 {
        self.accrued_interest
    }
}
