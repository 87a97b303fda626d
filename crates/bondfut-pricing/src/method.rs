//! Caller-selected futures pricing method.
//!
//! [`FuturesPricingMethod`] is the closed set of methods the engine supports.
//! Each variant implements [`FuturesPricer`]; the market data a method needs
//! is passed as a [`FuturesMarketData`].

use std::fmt;

use bondfut_curves::{CurveProvider, CurveSensitivity};
use serde::{Deserialize, Serialize};

use crate::bond_pricer::BondPricer;
use crate::config::{DiscountingFuturesConfig, HullWhiteFuturesConfig};
use crate::error::{PricingError, PricingResult};
use crate::futures::{
    DiscountingFuturesMethod, HullWhiteFuturesMethod, NumericalIntegrationFuturesMethod,
};
use crate::instruments::BondFuturesSecurity;
use crate::models::HullWhiteProvider;

/// Market data handed to a futures pricing method.
#[derive(Clone, Copy)]
pub enum FuturesMarketData<'a> {
    /// Discount curves only.
    Curves(&'a dyn CurveProvider),
    /// Hull-White parameters together with their curves.
    HullWhite(&'a HullWhiteProvider<'a>),
}

impl fmt::Debug for FuturesMarketData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curves(_) => f.write_str("FuturesMarketData::Curves"),
            Self::HullWhite(hull_white) => f
                .debug_tuple("FuturesMarketData::HullWhite")
                .field(hull_white)
                .finish(),
        }
    }
}

impl<'a> FuturesMarketData<'a> {
    /// The discount curves, whichever variant holds them.
    pub fn curves(&self) -> &'a dyn CurveProvider {
        match self {
            Self::Curves(curves) => *curves,
            Self::HullWhite(hull_white) => hull_white.curves(),
        }
    }

    /// The Hull-White provider.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when only curves were supplied.
    pub fn hull_white(&self) -> PricingResult<&'a HullWhiteProvider<'a>> {
        match self {
            Self::HullWhite(hull_white) => Ok(*hull_white),
            Self::Curves(_) => Err(PricingError::invalid_argument(
                "missing Hull-White data for a Hull-White method",
            )),
        }
    }
}

impl<'a> From<&'a HullWhiteProvider<'a>> for FuturesMarketData<'a> {
    fn from(hull_white: &'a HullWhiteProvider<'a>) -> Self {
        Self::HullWhite(hull_white)
    }
}

/// Price and curve sensitivity of a bond futures contract.
pub trait FuturesPricer {
    /// Futures price.
    fn price(
        &self,
        futures: &BondFuturesSecurity,
        market: &FuturesMarketData<'_>,
    ) -> PricingResult<f64>;

    /// Curve sensitivity of the futures price.
    fn price_curve_sensitivity(
        &self,
        futures: &BondFuturesSecurity,
        market: &FuturesMarketData<'_>,
    ) -> PricingResult<CurveSensitivity>;
}

impl<B: BondPricer> FuturesPricer for DiscountingFuturesMethod<B> {
    fn price(
        &self,
        futures: &BondFuturesSecurity,
        market: &FuturesMarketData<'_>,
    ) -> PricingResult<f64> {
        self.price_from_curves(futures, market.curves())
    }

    fn price_curve_sensitivity(
        &self,
        futures: &BondFuturesSecurity,
        market: &FuturesMarketData<'_>,
    ) -> PricingResult<CurveSensitivity> {
        DiscountingFuturesMethod::<B>::price_curve_sensitivity(self, futures, market.curves())
    }
}

impl FuturesPricer for HullWhiteFuturesMethod {
    fn price(
        &self,
        futures: &BondFuturesSecurity,
        market: &FuturesMarketData<'_>,
    ) -> PricingResult<f64> {
        HullWhiteFuturesMethod::price(self, futures, market.hull_white()?)
    }

    fn price_curve_sensitivity(
        &self,
        futures: &BondFuturesSecurity,
        market: &FuturesMarketData<'_>,
    ) -> PricingResult<CurveSensitivity> {
        HullWhiteFuturesMethod::price_curve_sensitivity(self, futures, market.hull_white()?)
    }
}

impl FuturesPricer for NumericalIntegrationFuturesMethod {
    fn price(
        &self,
        futures: &BondFuturesSecurity,
        market: &FuturesMarketData<'_>,
    ) -> PricingResult<f64> {
        NumericalIntegrationFuturesMethod::price(self, futures, market.hull_white()?)
    }

    fn price_curve_sensitivity(
        &self,
        futures: &BondFuturesSecurity,
        market: &FuturesMarketData<'_>,
    ) -> PricingResult<CurveSensitivity> {
        NumericalIntegrationFuturesMethod::price_curve_sensitivity(
            self,
            futures,
            market.hull_white()?,
        )
    }
}

/// Method selection by name, as it appears in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuturesMethodKind {
    /// Forward price of the CTD.
    #[default]
    Discounting,
    /// Hull-White with switch points.
    HullWhiteAnalytic,
    /// Hull-White by direct integration.
    HullWhiteNumericalIntegration,
}

/// A futures pricing method chosen by the caller.
///
/// The discounting variant uses the discounting bond pricer. A
/// [`DiscountingFuturesMethod`] with another [`BondPricer`] implements
/// [`FuturesPricer`] on its own.
#[derive(Debug, Clone)]
pub enum FuturesPricingMethod {
    /// No convexity adjustment.
    Discounting(DiscountingFuturesMethod),
    /// Hull-White analytic method.
    HullWhiteAnalytic(HullWhiteFuturesMethod),
    /// Hull-White numerical integration.
    HullWhiteNumericalIntegration(NumericalIntegrationFuturesMethod),
}

impl FuturesPricingMethod {
    /// Builds the method of the given kind from the engine configuration.
    pub fn from_kind(
        kind: FuturesMethodKind,
        discounting: DiscountingFuturesConfig,
        hull_white: HullWhiteFuturesConfig,
    ) -> Self {
        match kind {
            FuturesMethodKind::Discounting => {
                Self::Discounting(DiscountingFuturesMethod::new(discounting))
            }
            FuturesMethodKind::HullWhiteAnalytic => {
                Self::HullWhiteAnalytic(HullWhiteFuturesMethod::new(hull_white))
            }
            FuturesMethodKind::HullWhiteNumericalIntegration => Self::HullWhiteNumericalIntegration(
                NumericalIntegrationFuturesMethod::new(hull_white),
            ),
        }
    }

    /// Kind of this method.
    pub fn kind(&self) -> FuturesMethodKind {
        match self {
            Self::Discounting(_) => FuturesMethodKind::Discounting,
            Self::HullWhiteAnalytic(_) => FuturesMethodKind::HullWhiteAnalytic,
            Self::HullWhiteNumericalIntegration(_) => {
                FuturesMethodKind::HullWhiteNumericalIntegration
            }
        }
    }

    fn pricer(&self) -> &dyn FuturesPricer {
        match self {
            Self::Discounting(method) => method,
            Self::HullWhiteAnalytic(method) => method,
            Self::HullWhiteNumericalIntegration(method) => method,
        }
    }
}

impl FuturesPricer for FuturesPricingMethod {
    fn price(
        &self,
        futures: &BondFuturesSecurity,
        market: &FuturesMarketData<'_>,
    ) -> PricingResult<f64> {
        self.pricer().price(futures, market)
    }

    fn price_curve_sensitivity(
        &self,
        futures: &BondFuturesSecurity,
        market: &FuturesMarketData<'_>,
    ) -> PricingResult<CurveSensitivity> {
        self.pricer().price_curve_sensitivity(futures, market)
    }
}
