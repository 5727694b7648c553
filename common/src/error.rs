//! Error types shared across the converter crates.

use thiserror::Error;

/// Errors raised while parsing shared converter types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Currency code outside the supported set.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Amount that is not a finite decimal number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl CommonError {
    /// Stable code for logs and user-facing messages.
    pub fn error_code(&self) -> &'static str {
        match self {
            CommonError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            CommonError::InvalidAmount(_) => "INVALID_AMOUNT",
        }
    }
}

/// Result type alias for shared parsing operations.
pub type Result<T> = std::result::Result<T, CommonError>;
