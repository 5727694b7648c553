//! Mid-rate sources.

use chrono::{DateTime, Utc};
use primex_common::{round_half_up, CurrencyCode, CurrencyPair};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};
use crate::jitter::{JitterSource, RandomJitter};
use crate::rate_table::MidRateTable;

/// Fractional digits kept on every quoted mid rate.
pub const MID_RATE_DP: u32 = 6;

/// Default total width of the jitter band (±0.05%).
pub const DEFAULT_JITTER_BAND: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// A mid-market rate as returned by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidQuote {
    /// The currency pair.
    pub pair: CurrencyPair,
    /// Mid-market rate, always positive.
    pub rate: Decimal,
    /// When this rate was quoted.
    pub quoted_at: DateTime<Utc>,
    /// Rate source.
    pub source: String,
}

/// Trait for mid-rate sources.
///
/// Lookups are synchronous and hold no state between calls beyond what the
/// source needs to draw jitter.
pub trait RateSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Get the mid rate for a currency pair.
    fn lookup(&self, pair: &CurrencyPair) -> FxResult<MidQuote>;

    /// Check if this source has a rate for the given pair.
    fn supports_pair(&self, pair: &CurrencyPair) -> bool;

    /// Get all supported currency pairs.
    fn supported_pairs(&self) -> Vec<CurrencyPair>;

    /// Get the mid rate between two currencies.
    fn lookup_codes(&self, base: CurrencyCode, quote: CurrencyCode) -> FxResult<MidQuote> {
        self.lookup(&CurrencyPair::new(base, quote))
    }
}

/// Serves rates from a [`MidRateTable`] with a small random perturbation to
/// simulate a live market.
pub struct TableRateSource {
    table: MidRateTable,
    jitter: Box<dyn JitterSource>,
    band: Decimal,
}

impl TableRateSource {
    /// Create a source over the given table with entropy-seeded jitter.
    pub fn new(table: MidRateTable) -> Self {
        Self {
            table,
            jitter: Box::new(RandomJitter::from_entropy()),
            band: DEFAULT_JITTER_BAND,
        }
    }

    /// Replace the jitter source.
    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Box::new(jitter);
        self
    }

    /// Set the total width of the jitter band. `0.001` means ±0.05%.
    pub fn with_band(mut self, band: Decimal) -> Self {
        self.band = band;
        self
    }

    /// The underlying table.
    pub fn table(&self) -> &MidRateTable {
        &self.table
    }

    /// Jittered and rounded rate. `None` when the result would not be a
    /// usable positive rate.
    fn perturb(&self, rate: Decimal) -> Option<Decimal> {
        let offset = Decimal::from_f64(self.jitter.offset()).unwrap_or(Decimal::ZERO);
        let factor = Decimal::ONE.checked_add(offset.checked_mul(self.band)?)?;
        let rate = round_half_up(rate.checked_mul(factor)?, MID_RATE_DP);
        (rate > Decimal::ZERO).then_some(rate)
    }
}

impl RateSource for TableRateSource {
    fn name(&self) -> &str {
        "TABLE"
    }

    fn lookup(&self, pair: &CurrencyPair) -> FxResult<MidQuote> {
        let Some(base_rate) = self.table.get(pair) else {
            warn!(pair = %pair, "Pair not available");
            return Err(FxError::RateNotAvailable(*pair));
        };

        let Some(rate) = self.perturb(base_rate) else {
            warn!(pair = %pair, table = %base_rate, "Mid rate not usable after rounding");
            return Err(FxError::RateNotAvailable(*pair));
        };
        debug!(pair = %pair, table = %base_rate, mid = %rate, "Quoted mid rate");

        Ok(MidQuote {
            pair: *pair,
            rate,
            quoted_at: Utc::now(),
            source: self.name().to_string(),
        })
    }

    fn supports_pair(&self, pair: &CurrencyPair) -> bool {
        self.table.contains(pair)
    }

    fn supported_pairs(&self) -> Vec<CurrencyPair> {
        self.table.pairs()
    }
}
