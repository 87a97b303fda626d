//! Currencies of the government bond futures markets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CurveError;

/// ISO 4217 currency of a bond, a future or a model parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum Currency {
    /// United States Dollar (Treasury futures)
    #[default]
    USD,
    /// Euro (Bund, Bobl, Schatz, OAT, BTP futures)
    EUR,
    /// British Pound Sterling (Long Gilt futures)
    GBP,
    /// Japanese Yen (JGB futures)
    JPY,
    /// Swiss Franc (CONF futures)
    CHF,
    /// Canadian Dollar (CGB futures)
    CAD,
    /// Australian Dollar (ACGB futures)
    AUD,
}

impl Currency {
    /// Returns the ISO 4217 3-letter code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "CHF" => Ok(Currency::CHF),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            other => Err(CurveError::invalid_input(format!(
                "unsupported currency code '{other}'"
            ))),
        }
    }
}
