//! Converter configuration.

use std::time::Duration;

use primex_fx::{DEFAULT_BROKER_MARGIN, DEFAULT_JITTER_BAND};
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use crate::corridor::CorridorDefaults;

/// Configuration problems found by [`ConverterConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Refresh interval cannot be 0")]
    ZeroRefreshInterval,

    #[error("Broker margin {0} must be in (0, 1)")]
    BrokerMarginOutOfRange(Decimal),

    #[error("Jitter band {0} must be in [0, 1)")]
    JitterBandOutOfRange(Decimal),

    #[error("Invalid share URL {url}: {reason}")]
    InvalidShareUrl { url: String, reason: String },
}

/// Main converter configuration.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// How often the pipeline re-runs on its own.
    pub refresh_interval: Duration,
    /// Broker margin off mid, as a fraction.
    pub broker_margin: Decimal,
    /// Total width of the simulated rate movement, as a fraction.
    pub jitter_band: Decimal,
    /// Page that share links point at.
    pub share_base_url: String,
    /// Fallbacks for corridor fields.
    pub defaults: CorridorDefaults,
    /// Log level.
    pub log_level: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            broker_margin: DEFAULT_BROKER_MARGIN,
            jitter_band: DEFAULT_JITTER_BAND,
            share_base_url: "https://primeexchange.example/".to_string(),
            defaults: CorridorDefaults::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ConverterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup; unparsable values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(secs) = lookup("CONVERTER_REFRESH_SECS") {
            if let Ok(secs) = secs.parse() {
                config.refresh_interval = Duration::from_secs(secs);
            }
        }

        if let Some(margin) = lookup("CONVERTER_BROKER_MARGIN") {
            if let Ok(margin) = margin.parse() {
                config.broker_margin = margin;
            }
        }

        if let Some(band) = lookup("CONVERTER_JITTER_BAND") {
            if let Ok(band) = band.parse() {
                config.jitter_band = band;
            }
        }

        if let Some(url) = lookup("CONVERTER_SHARE_URL") {
            config.share_base_url = url;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Parsed share URL.
    pub fn share_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.share_base_url).map_err(|e| ConfigError::InvalidShareUrl {
            url: self.share_base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::ZeroRefreshInterval);
        }

        if self.broker_margin <= Decimal::ZERO || self.broker_margin >= Decimal::ONE {
            return Err(ConfigError::BrokerMarginOutOfRange(self.broker_margin));
        }

        if self.jitter_band < Decimal::ZERO || self.jitter_band >= Decimal::ONE {
            return Err(ConfigError::JitterBandOutOfRange(self.jitter_band));
        }

        self.share_url()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.broker_margin, dec!(0.004));
        assert_eq!(config.jitter_band, dec!(0.001));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = ConverterConfig::default();
        config.refresh_interval = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroRefreshInterval));

        let mut config = ConverterConfig::default();
        config.broker_margin = dec!(1);
        assert!(matches!(config.validate(), Err(ConfigError::BrokerMarginOutOfRange(_))));

        let mut config = ConverterConfig::default();
        config.jitter_band = dec!(-0.1);
        assert!(matches!(config.validate(), Err(ConfigError::JitterBandOutOfRange(_))));

        let mut config = ConverterConfig::default();
        config.share_base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidShareUrl { .. })));
    }

    #[test]
    fn test_broker_margin_must_leave_a_spread() {
        let mut config = ConverterConfig::default();
        config.broker_margin = Decimal::ZERO;
        assert_eq!(
            config.validate(),
            Err(ConfigError::BrokerMarginOutOfRange(Decimal::ZERO))
        );

        config.broker_margin = dec!(-0.001);
        assert!(config.validate().is_err());

        config.broker_margin = dec!(0.0001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_jitter_band_is_allowed() {
        let mut config = ConverterConfig::default();
        config.jitter_band = Decimal::ZERO;
        assert!(config.validate().is_ok());

        config.jitter_band = dec!(1);
        assert!(matches!(config.validate(), Err(ConfigError::JitterBandOutOfRange(_))));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CONVERTER_REFRESH_SECS", "15"),
            ("CONVERTER_BROKER_MARGIN", "0.01"),
            ("CONVERTER_JITTER_BAND", "garbage"),
            ("CONVERTER_SHARE_URL", "https://rates.example/fx"),
            ("LOG_LEVEL", "debug"),
        ]);

        let config = ConverterConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.refresh_interval, Duration::from_secs(15));
        assert_eq!(config.broker_margin, dec!(0.01));
        assert_eq!(config.jitter_band, dec!(0.001));
        assert_eq!(config.share_base_url, "https://rates.example/fx");
        assert_eq!(config.log_level, "debug");
    }
}
