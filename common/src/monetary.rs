//! Monetary types for the Prime Exchange converter.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommonError;

/// A monetary amount with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount value.
    pub value: Decimal,
    /// Currency the value is denominated in.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new Money instance.
    pub fn new(value: Decimal, currency: CurrencyCode) -> Self {
        Self { value, currency }
    }

    /// Check if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// Round half away from zero to a fixed number of fractional digits.
    pub fn round_dp(&self, dp: u32) -> Self {
        Self {
            value: round_half_up(self.value, dp),
            currency: self.currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

/// Rounds half away from zero, the way display figures are rounded.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a user or URL supplied amount.
///
/// Accepts plain decimals ("100", "-2.5") and scientific notation ("1e3").
pub fn parse_amount(raw: &str) -> Result<Decimal, CommonError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CommonError::InvalidAmount(raw.to_owned()));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CommonError::InvalidAmount(raw.to_owned()))
}

/// Currency codes supported by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Eur,
    Usd,
    Gbp,
    Jpy,
    Cad,
}

impl CurrencyCode {
    pub const ALL: [Self; 5] = [Self::Eur, Self::Usd, Self::Gbp, Self::Jpy, Self::Cad];

    /// ISO 4217 code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Cad => "CAD",
        }
    }

    /// Human readable plural name, shared by headings and corridor metadata.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Eur => "Euros",
            Self::Usd => "US Dollars",
            Self::Gbp => "British Pounds",
            Self::Jpy => "Japanese Yen",
            Self::Cad => "Canadian Dollars",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = CommonError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            "GBP" => Ok(Self::Gbp),
            "JPY" => Ok(Self::Jpy),
            "CAD" => Ok(Self::Cad),
            _ => Err(CommonError::UnknownCurrency(value.to_owned())),
        }
    }
}

/// A currency pair for FX operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Base currency (being sold).
    pub base: CurrencyCode,
    /// Quote currency (being received).
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
        }
    }

    /// True when base and quote are the same currency.
    pub fn is_identity(&self) -> bool {
        self.base == self.quote
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_currency_code() {
        assert_eq!("EUR".parse::<CurrencyCode>().unwrap(), CurrencyCode::Eur);
        assert_eq!("jpy".parse::<CurrencyCode>().unwrap(), CurrencyCode::Jpy);
        assert_eq!(" cad ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Cad);
        assert!(matches!(
            "XYZ".parse::<CurrencyCode>(),
            Err(CommonError::UnknownCurrency(code)) if code == "XYZ"
        ));
        assert!("".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(CurrencyCode::Usd.display_name(), "US Dollars");
        assert_eq!(CurrencyCode::Jpy.display_name(), "Japanese Yen");
        for code in CurrencyCode::ALL {
            assert_eq!(code.as_str().parse::<CurrencyCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_pair_inverse() {
        let pair = CurrencyPair::new(CurrencyCode::Eur, CurrencyCode::Usd);
        assert_eq!(pair.inverse(), CurrencyPair::new(CurrencyCode::Usd, CurrencyCode::Eur));
        assert_eq!(pair.inverse().inverse(), pair);
        assert_eq!(pair.to_string(), "EUR/USD");
        assert!(!pair.is_identity());
    }

    #[test]
    fn test_money_rounding() {
        let money = Money::new(dec!(106.145), CurrencyCode::Usd);
        assert_eq!(money.round_dp(2).value, dec!(106.15));

        let negative = Money::new(dec!(-2.005), CurrencyCode::Usd);
        assert!(negative.is_negative());
        assert_eq!(negative.round_dp(2).value, dec!(-2.01));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100").unwrap(), dec!(100));
        assert_eq!(parse_amount(" 250.75 ").unwrap(), dec!(250.75));
        assert_eq!(parse_amount("-5").unwrap(), dec!(-5));
        assert_eq!(parse_amount("1e3").unwrap(), dec!(1000));
        assert!(matches!(parse_amount("abc"), Err(CommonError::InvalidAmount(_))));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn test_currency_serde() {
        let json = serde_json::to_string(&CurrencyCode::Gbp).unwrap();
        assert_eq!(json, "\"GBP\"");
        let back: CurrencyCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CurrencyCode::Gbp);
    }
}
