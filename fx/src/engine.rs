//! Valuation engine: broker reference rate and provider ranking.

use chrono::{DateTime, Utc};
use primex_common::{CurrencyCode, CurrencyPair, CycleId, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{FxError, FxResult};
use crate::roster::Roster;

/// Default broker margin off mid (40 basis points).
pub const DEFAULT_BROKER_MARGIN: Decimal = Decimal::from_parts(4, 0, 0, false, 3);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Label for the kind of rate used as the headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    Interbank,
}

impl RateType {
    pub fn label(&self) -> &'static str {
        match self {
            RateType::Interbank => "Interbank (mid)",
        }
    }
}

/// What one provider would deliver for the requested amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOutcome {
    pub provider_id: String,
    /// Mid rate less the provider margin.
    pub effective_rate: Decimal,
    /// Flat fee, in the base currency.
    pub fee: Money,
    /// Amount received after margin and fee, in the quote currency.
    /// Negative when the fee exceeds the converted value.
    pub net_received: Money,
}

/// Output of one compute cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub cycle_id: CycleId,
    pub amount: Decimal,
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
    pub mid_rate: Decimal,
    /// `1 / mid_rate`, the reverse per-unit figure.
    pub inverse_rate: Decimal,
    /// `amount * mid_rate`, the headline figure.
    pub converted: Money,
    pub broker_rate: Decimal,
    pub spread_percent: Decimal,
    pub rate_type: RateType,
    /// Outcomes in roster order.
    pub per_provider: Vec<ProviderOutcome>,
    pub best_provider_id: String,
    pub computed_at: DateTime<Utc>,
}

impl ValuationResult {
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.base, self.quote)
    }

    /// Outcome for a provider id.
    pub fn outcome(&self, provider_id: &str) -> Option<&ProviderOutcome> {
        self.per_provider.iter().find(|o| o.provider_id == provider_id)
    }

    /// Outcome of the winning provider.
    pub fn best(&self) -> Option<&ProviderOutcome> {
        self.outcome(&self.best_provider_id)
    }

    pub fn is_best(&self, provider_id: &str) -> bool {
        self.best_provider_id == provider_id
    }
}

/// Computes broker and provider figures from a mid rate.
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    broker_margin: Decimal,
}

impl Default for ValuationEngine {
    fn default() -> Self {
        Self {
            broker_margin: DEFAULT_BROKER_MARGIN,
        }
    }
}

impl ValuationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the broker margin, as a fraction (`0.004` = 40 bps).
    pub fn with_broker_margin(mut self, margin: Decimal) -> Self {
        self.broker_margin = margin;
        self
    }

    pub fn broker_margin(&self) -> Decimal {
        self.broker_margin
    }

    /// Broker reference rate and its spread to mid, in percent.
    ///
    /// `None` when `mid_rate` is not positive or the figures overflow.
    pub fn broker_quote(&self, mid_rate: Decimal) -> Option<(Decimal, Decimal)> {
        if mid_rate <= Decimal::ZERO {
            return None;
        }
        let broker_rate = mid_rate.checked_mul(Decimal::ONE.checked_sub(self.broker_margin)?)?;
        let spread_percent = mid_rate
            .checked_sub(broker_rate)?
            .checked_div(mid_rate)?
            .checked_mul(HUNDRED)?;
        Some((broker_rate, spread_percent))
    }

    /// Value `amount` of `pair.base` at `mid_rate` across the roster.
    ///
    /// Expects `amount >= 0`; callers clamp amounts before getting here.
    /// A non-positive mid rate is rejected and amounts too large for
    /// `Decimal` yield [`FxError::AmountOverflow`].
    #[instrument(skip_all, fields(pair = %pair, mid = %mid_rate, amount = %amount))]
    pub fn evaluate(
        &self,
        pair: CurrencyPair,
        mid_rate: Decimal,
        amount: Decimal,
        roster: &Roster,
    ) -> FxResult<ValuationResult> {
        if mid_rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                pair,
                rate: mid_rate,
            });
        }
        debug_assert!(amount >= Decimal::ZERO, "amount must be clamped");

        let overflow = || FxError::AmountOverflow { pair, amount };

        let (broker_rate, spread_percent) = self.broker_quote(mid_rate).ok_or_else(overflow)?;

        let per_provider = roster
            .iter()
            .map(|provider| -> FxResult<ProviderOutcome> {
                let effective_rate = (Decimal::ONE - provider.margin_percent / HUNDRED)
                    .checked_mul(mid_rate)
                    .ok_or_else(overflow)?;
                let net = amount
                    .checked_mul(effective_rate)
                    .and_then(|gross| gross.checked_sub(provider.flat_fee))
                    .ok_or_else(overflow)?;
                Ok(ProviderOutcome {
                    provider_id: provider.id.clone(),
                    effective_rate,
                    fee: Money::new(provider.flat_fee, pair.base),
                    net_received: Money::new(net, pair.quote),
                })
            })
            .collect::<FxResult<Vec<_>>>()?;

        let inverse_rate = Decimal::ONE.checked_div(mid_rate).ok_or_else(overflow)?;
        let converted = amount.checked_mul(mid_rate).ok_or_else(overflow)?;

        // Strict comparison: on equal net amounts the earlier provider keeps the lead.
        let best_idx = per_provider
            .iter()
            .enumerate()
            .fold(0, |best, (idx, outcome)| {
                if outcome.net_received.value > per_provider[best].net_received.value {
                    idx
                } else {
                    best
                }
            });
        let best_provider_id = per_provider
            .get(best_idx)
            .map(|o| o.provider_id.clone())
            .unwrap_or_default();

        debug!(
            best = %best_provider_id,
            broker = %broker_rate,
            "Ranked providers"
        );

        Ok(ValuationResult {
            cycle_id: CycleId::new(),
            amount,
            base: pair.base,
            quote: pair.quote,
            mid_rate,
            inverse_rate,
            converted: Money::new(converted, pair.quote),
            broker_rate,
            spread_percent,
            rate_type: RateType::Interbank,
            per_provider,
            best_provider_id,
            computed_at: Utc::now(),
        })
    }
}
