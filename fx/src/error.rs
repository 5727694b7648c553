//! FX engine error types.

use primex_common::{CommonError, CurrencyPair};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the FX engine.
#[derive(Debug, Error)]
pub enum FxError {
    /// Rate not available for the requested currency pair.
    #[error("Pair not available: {0}")]
    RateNotAvailable(CurrencyPair),

    /// Rate table entry that is zero or negative.
    #[error("Invalid rate {rate} for {pair}: rates must be positive")]
    InvalidRate { pair: CurrencyPair, rate: Decimal },

    /// Rate table document lists the same corridor twice, e.g. as `EUR` and `eur`.
    #[error("Rate table lists {0} more than once")]
    DuplicatePair(CurrencyPair),

    /// Amount too large for the valuation arithmetic.
    #[error("Amount {amount} is too large to convert {pair}")]
    AmountOverflow { pair: CurrencyPair, amount: Decimal },

    /// Provider roster failed validation.
    #[error("Invalid provider roster: {0}")]
    InvalidRoster(String),

    /// Currency code outside the supported set.
    #[error(transparent)]
    Currency(#[from] CommonError),

    /// Rate table document could not be parsed.
    #[error("Malformed rate table: {0}")]
    MalformedTable(#[from] serde_json::Error),
}

impl FxError {
    /// Whether the error only means "try another corridor", as opposed to a
    /// broken configuration.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FxError::RateNotAvailable(_))
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
