//! Monetary types for Bizdesk.

use rust_decimal::Decimal;
use rusty_money::iso;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary amount with currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount value (high precision decimal).
    pub value: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: Currency,
}

impl Money {
    /// Create a new Money instance.
    pub fn new(value: Decimal, currency: Currency) -> Self {
        Self { value, currency }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

/// ISO 4217 currency code.
///
/// Codes are stored upper-cased. The default is the reference currency, USD,
/// which is also what legacy records with a missing or blank currency field
/// are read as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Code of the reference currency all rates are expressed against.
    pub const REFERENCE_CODE: &'static str = "USD";

    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Parse an optional stored code, treating blank values as absent.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() {
            None
        } else {
            Some(Self::new(code))
        }
    }

    /// Resolve an optional stored code, defaulting to USD.
    pub fn or_reference(code: Option<&str>) -> Self {
        code.and_then(Self::parse).unwrap_or_default()
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Whether this is the reference currency.
    pub fn is_reference(&self) -> bool {
        self.0 == Self::REFERENCE_CODE
    }

    /// Display symbol from the ISO 4217 table, if the code is known.
    pub fn symbol(&self) -> Option<&'static str> {
        iso::find(&self.0)
            .map(|currency| currency.symbol)
            .filter(|symbol| !symbol.is_empty())
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::new(Self::REFERENCE_CODE)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::or_reference(Some(s))
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self::or_reference(Some(&s))
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_normalizes_code() {
        assert_eq!(Currency::new(" eur "), Currency::eur());
        assert_eq!(Currency::parse("  "), None);
        assert_eq!(Currency::or_reference(None), Currency::usd());
        assert_eq!(Currency::or_reference(Some("")), Currency::usd());
        assert_eq!(Currency::or_reference(Some("gbp")), Currency::gbp());
    }

    #[test]
    fn test_money_deserializes_without_currency() {
        let money: Money = serde_json::from_str(r#"{"value":"12.5"}"#).unwrap();
        assert_eq!(money.currency, Currency::usd());
        assert_eq!(money.value, dec!(12.5));
    }

    #[test]
    fn test_blank_stored_currency_is_usd() {
        let money: Money = serde_json::from_str(r#"{"value":"3","currency":"  "}"#).unwrap();
        assert_eq!(money.currency, Currency::usd());

        let money: Money = serde_json::from_str(r#"{"value":"3","currency":"eur"}"#).unwrap();
        assert_eq!(money.currency, Currency::eur());
    }

    #[test]
    fn test_symbols_from_iso_table() {
        assert_eq!(Currency::usd().symbol(), Some("$"));
        assert_eq!(Currency::eur().symbol(), Some("€"));
        assert_eq!(Currency::gbp().symbol(), Some("£"));
        assert_eq!(Currency::new("ZZZ").symbol(), None);
    }
}
