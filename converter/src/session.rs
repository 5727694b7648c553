//! The compute session: one corridor, one rate source, one roster.
//!
//! Edits land in a draft corridor. A compute cycle snapshots the draft, looks
//! up the mid rate, values the roster and then publishes the corridor and its
//! result together. A cycle that fails leaves the published pair untouched.

use std::fmt;

use parking_lot::RwLock;
use primex_common::{parse_amount, CurrencyCode};
use primex_fx::{FxResult, RateSource, Roster, ValuationEngine, ValuationResult};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::alert::{AlertError, AlertRequest};
use crate::corridor::CorridorState;

/// What started a compute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Convert,
    Swap,
    Edit,
    Refresh,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::Startup => "startup",
            Trigger::Convert => "convert",
            Trigger::Swap => "swap",
            Trigger::Edit => "edit",
            Trigger::Refresh => "refresh",
        };
        f.write_str(name)
    }
}

/// Published corridor and the result computed for it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: CorridorState,
    pub result: Option<ValuationResult>,
}

struct Inner {
    draft: CorridorState,
    published: Snapshot,
}

/// Converter session.
pub struct Converter {
    source: Box<dyn RateSource>,
    engine: ValuationEngine,
    roster: Roster,
    share_base: Url,
    inner: RwLock<Inner>,
}

impl Converter {
    /// Create a session showing `initial`. Nothing is computed until the first
    /// cycle runs.
    pub fn new(
        source: Box<dyn RateSource>,
        engine: ValuationEngine,
        roster: Roster,
        share_base: Url,
        initial: CorridorState,
    ) -> Self {
        Self {
            source,
            engine,
            roster,
            share_base,
            inner: RwLock::new(Inner {
                draft: initial,
                published: Snapshot {
                    state: initial,
                    result: None,
                },
            }),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Corridor of the last successful cycle.
    pub fn state(&self) -> CorridorState {
        self.inner.read().published.state
    }

    /// Corridor as currently edited.
    pub fn draft(&self) -> CorridorState {
        self.inner.read().draft
    }

    pub fn last_result(&self) -> Option<ValuationResult> {
        self.inner.read().published.result.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().published.clone()
    }

    /// Stage a new amount. Unparsable input counts as 0, negatives clamp to 0.
    pub fn set_amount(&self, raw: &str) -> Decimal {
        let amount = match parse_amount(raw) {
            Ok(amount) => amount.max(Decimal::ZERO),
            Err(e) => {
                debug!(error = %e, "Treating amount as zero");
                Decimal::ZERO
            }
        };
        self.inner.write().draft.amount = amount;
        amount
    }

    pub fn set_base(&self, base: CurrencyCode) {
        self.inner.write().draft.base = base;
    }

    pub fn set_quote(&self, quote: CurrencyCode) {
        self.inner.write().draft.quote = quote;
    }

    /// Run a cycle on the current draft.
    pub fn compute(&self, trigger: Trigger) -> FxResult<ValuationResult> {
        let candidate = self.draft();
        self.run_cycle(candidate, trigger)
    }

    /// Exchange base and quote, then run a cycle.
    pub fn swap(&self) -> FxResult<ValuationResult> {
        let candidate = {
            let mut inner = self.inner.write();
            inner.draft = inner.draft.swapped();
            inner.draft
        };
        self.run_cycle(candidate, Trigger::Swap)
    }

    #[instrument(skip_all, fields(trigger = %trigger, pair = %candidate.pair()))]
    fn run_cycle(&self, candidate: CorridorState, trigger: Trigger) -> FxResult<ValuationResult> {
        let outcome = self.source.lookup(&candidate.pair()).and_then(|quote| {
            self.engine
                .evaluate(candidate.pair(), quote.rate, candidate.amount, &self.roster)
        });
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Compute cycle skipped");
                return Err(e);
            }
        };

        {
            let mut inner = self.inner.write();
            inner.published = Snapshot {
                state: candidate,
                result: Some(result.clone()),
            };
        }

        info!(
            cycle_id = %result.cycle_id,
            mid = %result.mid_rate,
            best = %result.best_provider_id,
            "Compute cycle completed"
        );

        Ok(result)
    }

    /// Link to the published corridor.
    pub fn share_url(&self) -> Url {
        self.state().apply_to_url(&self.share_base)
    }

    /// Link to the embeddable view of the published corridor.
    pub fn embed_url(&self) -> Url {
        self.state().with_embed(true).apply_to_url(&self.share_base)
    }

    /// Validate an alert for the corridor being edited.
    pub fn request_alert(&self, email: &str, threshold: &str) -> Result<AlertRequest, AlertError> {
        let pair = self.draft().pair();
        match AlertRequest::new(email, threshold, pair) {
            Ok(alert) => {
                info!(pair = %alert.pair, threshold = %alert.threshold, "Alert accepted");
                Ok(alert)
            }
            Err(e) => {
                warn!(field = e.field(), error = %e, "Alert rejected");
                Err(e)
            }
        }
    }
}
