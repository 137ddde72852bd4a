//! Error types shared across Bizdesk crates.

use thiserror::Error;

/// Reasons a stored amount could not be read as a decimal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The field was absent or `null`.
    #[error("Amount is missing")]
    Missing,

    /// The value is not a number and does not parse as one.
    #[error("Amount is not numeric: {0}")]
    NotNumeric(String),

    /// NaN or infinity.
    #[error("Amount is not finite")]
    NonFinite,

    /// The value does not fit in a decimal.
    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

impl AmountError {
    /// Short code used in log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            AmountError::Missing => "AMOUNT_MISSING",
            AmountError::NotNumeric(_) => "AMOUNT_NOT_NUMERIC",
            AmountError::NonFinite => "AMOUNT_NON_FINITE",
            AmountError::OutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AmountError::Missing.error_code(), "AMOUNT_MISSING");
        assert_eq!(
            AmountError::NotNumeric("abc".into()).error_code(),
            "AMOUNT_NOT_NUMERIC"
        );
    }
}
