//! Bond futures with a deliverable basket.

use bondfut_curves::Currency;
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};
use crate::instruments::FixedCouponBond;

/// Settlement times closer than this are treated as equal.
const TIME_TOLERANCE: f64 = 1e-10;

/// A bond futures contract.
///
/// Holds the deliverable basket with one conversion factor per bond. Every
/// bond settles on the delivery date, and none of its cash flows precede it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BondFuturesSecurityRaw")]
pub struct BondFuturesSecurity {
    name: String,
    currency: Currency,
    expiry_time: f64,
    delivery_time: f64,
    basket: Vec<FixedCouponBond>,
    conversion_factors: Vec<f64>,
}

/// Serialized form of [`BondFuturesSecurity`], checked by [`BondFuturesSecurity::new`].
#[derive(Deserialize)]
struct BondFuturesSecurityRaw {
    name: String,
    currency: Currency,
    expiry_time: f64,
    delivery_time: f64,
    basket: Vec<FixedCouponBond>,
    conversion_factors: Vec<f64>,
}

impl TryFrom<BondFuturesSecurityRaw> for BondFuturesSecurity {
    type Error = PricingError;

    fn try_from(raw: BondFuturesSecurityRaw) -> PricingResult<Self> {
        Self::new(
            raw.name,
            raw.currency,
            raw.expiry_time,
            raw.delivery_time,
            raw.basket,
            raw.conversion_factors,
        )
    }
}

impl BondFuturesSecurity {
    /// Creates a futures contract.
    ///
    /// `expiry_time` is the last margining time (last notice date) and
    /// `delivery_time` the delivery settlement time.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidArgument` when:
    /// - the basket is empty or its size differs from the conversion factors
    /// - a conversion factor is not strictly positive
    /// - expiry is negative or after delivery
    /// - a bond has another currency, does not settle at delivery, or pays
    ///   before delivery
    pub fn new(
        name: impl Into<String>,
        currency: Currency,
        expiry_time: f64,
        delivery_time: f64,
        basket: Vec<FixedCouponBond>,
        conversion_factors: Vec<f64>,
    ) -> PricingResult<Self> {
        let name = name.into();
        if basket.is_empty() {
            return Err(PricingError::invalid_argument(format!(
                "futures {name} has an empty basket"
            )));
        }
        if basket.len() != conversion_factors.len() {
            return Err(PricingError::invalid_argument(format!(
                "futures {name} has {} bonds but {} conversion factors",
                basket.len(),
                conversion_factors.len()
            )));
        }
        if !(expiry_time >= 0.0 && expiry_time <= delivery_time && delivery_time.is_finite()) {
            return Err(PricingError::invalid_argument(format!(
                "futures {name} needs 0 <= expiry ({expiry_time}) <= delivery ({delivery_time})"
            )));
        }

        for (bond, &cf) in basket.iter().zip(&conversion_factors) {
            if !(cf > 0.0 && cf.is_finite()) {
                return Err(PricingError::invalid_argument(format!(
                    "conversion factor {cf} of {} must be positive",
                    bond.name()
                )));
            }
            if bond.currency() != currency {
                return Err(PricingError::invalid_argument(format!(
                    "bond {} is in {} but futures {name} is in {currency}",
                    bond.name(),
                    bond.currency()
                )));
            }
            if (bond.settlement_time() - delivery_time).abs() > TIME_TOLERANCE {
                return Err(PricingError::invalid_argument(format!(
                    "bond {} settles at {} instead of delivery {delivery_time}",
                    bond.name(),
                    bond.settlement_time()
                )));
            }
            if let Some(early) = bond.cash_flows().iter().find(|c| c.time < delivery_time) {
                return Err(PricingError::invalid_argument(format!(
                    "bond {} pays at {} before delivery {delivery_time}",
                    bond.name(),
                    early.time
                )));
            }
        }

        Ok(Self {
            name,
            currency,
            expiry_time,
            delivery_time,
            basket,
            conversion_factors,
        })
    }

    /// Contract name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contract currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Last margining time.
    pub fn expiry_time(&self) -> f64 {
        self.expiry_time
    }

    /// Delivery settlement time.
    pub fn delivery_time(&self) -> f64 {
        self.delivery_time
    }

    /// Deliverable bonds.
    pub fn basket(&self) -> &[FixedCouponBond] {
        &self.basket
    }

    /// Conversion factors, one per bond.
    pub fn conversion_factors(&self) -> &[f64] {
        &self.conversion_factors
    }

    /// Iterates over `(bond, conversion factor)`.
    pub fn deliverables(&self) -> impl Iterator<Item = (&FixedCouponBond, f64)> {
        self.basket
            .iter()
            .zip(self.conversion_factors.iter().copied())
    }
}
