//! Reading stored amounts into decimals.
//!
//! Amount fields on stored records are loosely typed: numbers, numeric
//! strings, `null`, or missing entirely. [`parse_amount`] validates them into a
//! [`Decimal`]; [`amount_or_zero`] applies the dashboard policy of treating
//! anything unreadable as zero.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::AmountError;

/// Parse a stored JSON amount.
pub fn parse_amount(value: &Value) -> Result<Decimal, AmountError> {
    match value {
        Value::Null => Err(AmountError::Missing),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Decimal::from(u))
            } else {
                parse_amount_f64(n.as_f64().ok_or(AmountError::NonFinite)?)
            }
        }
        Value::String(s) => parse_amount_str(s),
        other => Err(AmountError::NotNumeric(other.to_string())),
    }
}

/// Parse a textual amount, accepting plain or scientific notation.
pub fn parse_amount_str(s: &str) -> Result<Decimal, AmountError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Missing);
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "nan" => return Err(AmountError::NonFinite),
        "inf" | "+inf" | "-inf" | "infinity" | "+infinity" | "-infinity" => {
            return Err(AmountError::NonFinite)
        }
        _ => {}
    }

    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| AmountError::NotNumeric(trimmed.to_string()))
}

/// Convert a float amount, rejecting NaN and infinities.
pub fn parse_amount_f64(value: f64) -> Result<Decimal, AmountError> {
    if !value.is_finite() {
        return Err(AmountError::NonFinite);
    }
    Decimal::from_f64(value).ok_or_else(|| AmountError::OutOfRange(value.to_string()))
}

/// Read an amount, degrading anything unreadable to zero.
pub fn amount_or_zero(value: &Value) -> Decimal {
    parse_amount(value).unwrap_or_else(|e| {
        debug!(error = %e, code = e.error_code(), "Unreadable amount treated as zero");
        Decimal::ZERO
    })
}

/// Float counterpart of [`amount_or_zero`].
pub fn amount_or_zero_f64(value: f64) -> Decimal {
    parse_amount_f64(value).unwrap_or_else(|e| {
        debug!(error = %e, code = e.error_code(), "Unreadable amount treated as zero");
        Decimal::ZERO
    })
}
