//! Money-transfer provider profiles.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};

/// Pricing model of one transfer provider: a margin off mid plus a flat fee
/// charged in the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: String,
    pub name: String,
    /// Percentage taken off the mid rate, e.g. `0.10` for 0.10%.
    pub margin_percent: Decimal,
    /// Flat fee in the base currency.
    pub flat_fee: Decimal,
    /// Estimated delivery label.
    pub eta: String,
}

impl ProviderProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        margin_percent: Decimal,
        flat_fee: Decimal,
        eta: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            margin_percent,
            flat_fee,
            eta: eta.into(),
        }
    }
}

/// Ordered, validated set of providers. Order is display order and decides
/// ties when ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roster {
    providers: Vec<ProviderProfile>,
}

impl Roster {
    /// Validate and wrap a provider list.
    ///
    /// The list must be non-empty, ids must be unique, margins and fees must
    /// not be negative.
    pub fn new(providers: Vec<ProviderProfile>) -> FxResult<Self> {
        if providers.is_empty() {
            return Err(FxError::InvalidRoster("roster is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(provider.id.as_str()) {
                return Err(FxError::InvalidRoster(format!(
                    "duplicate provider id {}",
                    provider.id
                )));
            }
            if provider.margin_percent < Decimal::ZERO {
                return Err(FxError::InvalidRoster(format!(
                    "negative margin for {}",
                    provider.id
                )));
            }
            if provider.flat_fee < Decimal::ZERO {
                return Err(FxError::InvalidRoster(format!(
                    "negative fee for {}",
                    provider.id
                )));
            }
        }

        Ok(Self { providers })
    }

    /// The eight providers compared on the converter page.
    pub fn builtin() -> Self {
        let providers = vec![
            ProviderProfile::new("wise", "Wise", Decimal::new(10, 2), Decimal::new(99, 2), "Same-day"),
            ProviderProfile::new("revolut", "Revolut", Decimal::new(20, 2), Decimal::ZERO, "Instant"),
            ProviderProfile::new("western", "Western Union", Decimal::new(180, 2), Decimal::new(290, 2), "Min–Hours"),
            ProviderProfile::new("moneygram", "MoneyGram", Decimal::new(150, 2), Decimal::new(199, 2), "Min–Hours"),
            ProviderProfile::new("remitly", "Remitly", Decimal::new(120, 2), Decimal::new(199, 2), "Hours–1d"),
            ProviderProfile::new("xoom", "Xoom (PayPal)", Decimal::new(160, 2), Decimal::new(299, 2), "Hours–1d"),
            ProviderProfile::new("ofx", "OFX", Decimal::new(35, 2), Decimal::ZERO, "1–2d"),
            ProviderProfile::new("worldremit", "WorldRemit", Decimal::new(110, 2), Decimal::new(249, 2), "Hours–1d"),
        ];
        Self { providers }
    }

    pub fn get(&self, id: &str) -> Option<&ProviderProfile> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderProfile> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
