//! Reference mid-market rates keyed by ordered currency pair.

use std::collections::BTreeMap;

use primex_common::{CurrencyCode, CurrencyPair};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};

/// Built-in mid rates as (base, quote, mantissa, scale).
const BUILTIN_RATES: [(CurrencyCode, CurrencyCode, i64, u32); 20] = {
    use CurrencyCode::*;
    [
        (Eur, Usd, 10725, 4),
        (Eur, Gbp, 8550, 4),
        (Eur, Jpy, 16250, 2),
        (Eur, Cad, 14600, 4),
        (Usd, Eur, 9324, 4),
        (Usd, Gbp, 7970, 4),
        (Usd, Jpy, 15170, 2),
        (Usd, Cad, 13600, 4),
        (Gbp, Eur, 11696, 4),
        (Gbp, Usd, 12550, 4),
        (Gbp, Jpy, 19130, 2),
        (Gbp, Cad, 17200, 4),
        (Jpy, Eur, 615, 5),
        (Jpy, Usd, 659, 5),
        (Jpy, Gbp, 523, 5),
        (Jpy, Cad, 1100, 5),
        (Cad, Eur, 6849, 4),
        (Cad, Usd, 7350, 4),
        (Cad, Gbp, 5814, 4),
        (Cad, Jpy, 9091, 2),
    ]
};

/// Table of mid rates. Only pairs present in the table are valid corridors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MidRateTable {
    rates: BTreeMap<CurrencyPair, Decimal>,
}

impl MidRateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo table shipped with the converter.
    pub fn builtin() -> Self {
        let rates = BUILTIN_RATES
            .iter()
            .map(|&(base, quote, mantissa, scale)| {
                (CurrencyPair::new(base, quote), Decimal::new(mantissa, scale))
            })
            .collect();
        Self { rates }
    }

    /// Load a table from a `{"EUR": {"USD": "1.0725", ...}, ...}` document.
    ///
    /// Codes are case-insensitive; a corridor spelled twice is rejected.
    pub fn from_json(document: &str) -> FxResult<Self> {
        let raw: BTreeMap<String, BTreeMap<String, Decimal>> = serde_json::from_str(document)?;

        let mut table = Self::new();
        for (base, quotes) in raw {
            let base: CurrencyCode = base.parse()?;
            for (quote, rate) in quotes {
                let quote: CurrencyCode = quote.parse()?;
                let pair = CurrencyPair::new(base, quote);
                if table.contains(&pair) {
                    warn!(pair = %pair, "Duplicate corridor in rate table");
                    return Err(FxError::DuplicatePair(pair));
                }
                table.insert(pair, rate)?;
            }
        }

        debug!(pairs = table.len(), "Loaded rate table");
        Ok(table)
    }

    /// Insert or replace a rate. Rates must be strictly positive.
    pub fn insert(&mut self, pair: CurrencyPair, rate: Decimal) -> FxResult<()> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate { pair, rate });
        }
        self.rates.insert(pair, rate);
        Ok(())
    }

    /// Table value for a pair, if the corridor exists.
    pub fn get(&self, pair: &CurrencyPair) -> Option<Decimal> {
        self.rates.get(pair).copied()
    }

    pub fn contains(&self, pair: &CurrencyPair) -> bool {
        self.rates.contains_key(pair)
    }

    /// All corridors, in (base, quote) order.
    pub fn pairs(&self) -> Vec<CurrencyPair> {
        self.rates.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
