//! FX error types.

use bizdesk_common::{Currency, TenantId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while building rate tables or tracking preferences.
#[derive(Debug, Error)]
pub enum FxError {
    /// Rate is zero or negative.
    #[error("Invalid rate {rate} for {currency}: rates must be positive")]
    InvalidRate { currency: Currency, rate: Decimal },

    /// Reference currency carries a rate other than one.
    #[error("Reference currency {currency} must have rate 1, got {rate}")]
    InvalidReferenceRate { currency: Currency, rate: Decimal },

    /// Rate table source could not be read or parsed.
    #[error("Invalid rate table: {0}")]
    RateTable(String),

    /// Tenant identifier is malformed.
    #[error("Invalid tenant id: {0}")]
    InvalidTenant(TenantId),

    /// No preference subscription is attached.
    #[error("No tenant subscription attached")]
    NotSubscribed,

    /// The settings source dropped the subscription.
    #[error("Settings subscription closed")]
    SubscriptionClosed,
}

impl From<std::io::Error> for FxError {
    fn from(e: std::io::Error) -> Self {
        FxError::RateTable(e.to_string())
    }
}

impl From<serde_json::Error> for FxError {
    fn from(e: serde_json::Error) -> Self {
        FxError::RateTable(e.to_string())
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
