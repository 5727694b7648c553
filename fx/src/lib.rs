//! Prime Exchange FX Engine
//!
//! Mid-rate lookup and provider valuation for the converter.
//!
//! # Features
//!
//! - Table-backed mid rates with simulated live movement
//! - Pluggable jitter so tests can pin rates
//! - Broker reference rate and spread
//! - Provider ranking by net amount received
//!
//! # Example
//!
//! ```rust,ignore
//! use primex_fx::{MidRateTable, RateSource, Roster, TableRateSource, ValuationEngine};
//! use primex_common::{CurrencyCode, CurrencyPair};
//!
//! let source = TableRateSource::new(MidRateTable::builtin());
//! let pair = CurrencyPair::new(CurrencyCode::Eur, CurrencyCode::Usd);
//!
//! let quote = source.lookup(&pair)?;
//! let result = ValuationEngine::new().evaluate(pair, quote.rate, amount, &Roster::builtin())?;
//! println!("best: {}", result.best_provider_id);
//! ```

pub mod engine;
pub mod error;
pub mod jitter;
pub mod rate_table;
pub mod roster;
pub mod source;

pub use engine::{ProviderOutcome, RateType, ValuationEngine, ValuationResult, DEFAULT_BROKER_MARGIN};
pub use error::{FxError, FxResult};
pub use jitter::{FixedJitter, JitterSource, NoJitter, RandomJitter};
pub use rate_table::MidRateTable;
pub use roster::{ProviderProfile, Roster};
pub use source::{MidQuote, RateSource, TableRateSource, DEFAULT_JITTER_BAND};
