//! Rate alert requests.
//!
//! Alerts are validated here and handed to whatever backend processes them;
//! nothing is stored by the converter itself.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use primex_common::{parse_amount, CurrencyPair};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Field-level validation failures, worded for display next to the field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlertError {
    #[error("Enter a valid email.")]
    InvalidEmail,

    #[error("Enter a valid threshold (e.g., 1.10).")]
    InvalidThreshold,
}

impl AlertError {
    /// Form field the message belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            AlertError::InvalidEmail => "email",
            AlertError::InvalidThreshold => "threshold",
        }
    }
}

/// A validated request to be notified when a corridor crosses a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRequest {
    pub email: String,
    pub pair: CurrencyPair,
    pub threshold: Decimal,
    pub requested_at: DateTime<Utc>,
}

impl AlertRequest {
    /// Validate raw form input. The email is checked first.
    pub fn new(email: &str, threshold: &str, pair: CurrencyPair) -> Result<Self, AlertError> {
        let email = email.trim();
        if !email_regex().is_match(email) {
            return Err(AlertError::InvalidEmail);
        }

        let threshold = parse_amount(threshold).map_err(|_| AlertError::InvalidThreshold)?;
        if threshold <= Decimal::ZERO {
            return Err(AlertError::InvalidThreshold);
        }

        Ok(Self {
            email: email.to_string(),
            pair,
            threshold,
            requested_at: Utc::now(),
        })
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use primex_common::CurrencyCode;
    use rust_decimal_macros::dec;

    fn pair() -> CurrencyPair {
        CurrencyPair::new(CurrencyCode::Eur, CurrencyCode::Usd)
    }

    #[test]
    fn test_valid_alert() {
        let alert = AlertRequest::new("  jo@example.com ", "1.10", pair()).unwrap();

        assert_eq!(alert.email, "jo@example.com");
        assert_eq!(alert.threshold, dec!(1.10));
        assert_eq!(alert.pair, pair());
    }

    #[test]
    fn test_invalid_email() {
        for email in ["", "jo", "jo@example", "jo @example.com", "@example.com"] {
            let err = AlertRequest::new(email, "1.10", pair()).unwrap_err();
            assert_eq!(err, AlertError::InvalidEmail, "accepted {email:?}");
            assert_eq!(err.field(), "email");
        }
    }

    #[test]
    fn test_invalid_threshold() {
        for threshold in ["", "0", "-1", "abc"] {
            let err = AlertRequest::new("jo@example.com", threshold, pair()).unwrap_err();
            assert_eq!(err, AlertError::InvalidThreshold, "accepted {threshold:?}");
        }
        assert_eq!(
            AlertError::InvalidThreshold.to_string(),
            "Enter a valid threshold (e.g., 1.10)."
        );
    }

    #[test]
    fn test_email_checked_before_threshold() {
        let err = AlertRequest::new("nope", "-1", pair()).unwrap_err();
        assert_eq!(err, AlertError::InvalidEmail);
    }
}
