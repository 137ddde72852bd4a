//! Exchange-rate table anchored to the reference currency.

use std::collections::BTreeMap;
use std::path::Path;

use bizdesk_common::{parse_amount, Currency};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};

/// Rates per ISO code, expressed as units of that currency per one USD.
///
/// Every rate is strictly positive and the reference currency is always
/// present with rate 1. Lookups for codes that are not in the table fall back
/// to 1, i.e. the amount is treated as if it were already in USD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExchangeRateTable {
    rates: BTreeMap<Currency, Decimal>,
}

impl ExchangeRateTable {
    /// Build a table from `(currency, rate)` pairs.
    pub fn new(rates: impl IntoIterator<Item = (Currency, Decimal)>) -> FxResult<Self> {
        let mut table = BTreeMap::new();

        for (currency, rate) in rates {
            if rate <= Decimal::ZERO {
                return Err(FxError::InvalidRate { currency, rate });
            }
            if currency.is_reference() && rate != Decimal::ONE {
                return Err(FxError::InvalidReferenceRate { currency, rate });
            }
            table.insert(currency, rate);
        }

        table.entry(Currency::default()).or_insert(Decimal::ONE);

        Ok(Self { rates: table })
    }

    /// Built-in static table used when no rate file is configured.
    pub fn default_rates() -> Self {
        let rates = [
            ("USD", Decimal::ONE),
            ("EUR", Decimal::new(92, 2)),
            ("GBP", Decimal::new(79, 2)),
            ("INR", Decimal::new(8312, 2)),
            ("JPY", Decimal::new(14950, 2)),
            ("CAD", Decimal::new(136, 2)),
            ("AUD", Decimal::new(152, 2)),
            ("NZD", Decimal::new(164, 2)),
            ("CHF", Decimal::new(88, 2)),
            ("CNY", Decimal::new(724, 2)),
            ("HKD", Decimal::new(782, 2)),
            ("SGD", Decimal::new(134, 2)),
            ("AED", Decimal::new(367, 2)),
            ("SAR", Decimal::new(375, 2)),
            ("MXN", Decimal::new(1710, 2)),
            ("BRL", Decimal::new(497, 2)),
            ("ZAR", Decimal::new(1880, 2)),
            ("SEK", Decimal::new(1045, 2)),
            ("NOK", Decimal::new(1060, 2)),
            ("DKK", Decimal::new(686, 2)),
            ("PLN", Decimal::new(398, 2)),
            ("KRW", Decimal::new(133000, 2)),
            ("NGN", Decimal::new(155000, 2)),
            ("PHP", Decimal::new(5610, 2)),
        ];

        Self {
            rates: rates
                .into_iter()
                .map(|(code, rate)| (Currency::new(code), rate))
                .collect(),
        }
    }

    /// Parse a JSON object of `code -> rate`; rates may be numbers or strings.
    pub fn from_json_str(json: &str) -> FxResult<Self> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(json)?;
        let mut rates = Vec::with_capacity(raw.len());

        for (code, value) in raw {
            let currency = Currency::parse(&code)
                .ok_or_else(|| FxError::RateTable("empty currency code".to_string()))?;
            let rate = parse_amount(&value)
                .map_err(|e| FxError::RateTable(format!("{}: {}", currency, e)))?;
            rates.push((currency, rate));
        }

        Self::new(rates)
    }

    /// Load a JSON rate table from disk.
    pub fn from_path(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&contents)?;
        debug!(path = %path.display(), currencies = table.len(), "Loaded rate table");
        Ok(table)
    }

    /// Get the configured rate for a currency, if any.
    pub fn get(&self, currency: &Currency) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }

    /// Rate used for conversion, defaulting to 1 for unknown codes.
    pub fn rate(&self, currency: &Currency) -> Decimal {
        match self.get(currency) {
            Some(rate) => rate,
            None => {
                warn!(currency = %currency, "No exchange rate configured, using 1");
                Decimal::ONE
            }
        }
    }

    /// Check if the table has a rate for this currency.
    pub fn contains(&self, currency: &Currency) -> bool {
        self.rates.contains_key(currency)
    }

    /// Currencies with a configured rate, in code order.
    pub fn currencies(&self) -> impl Iterator<Item = &Currency> {
        self.rates.keys()
    }

    /// Number of configured currencies.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for ExchangeRateTable {
    fn default() -> Self {
        Self::default_rates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_inserted() {
        let table = ExchangeRateTable::new([(Currency::eur(), dec!(0.92))]).unwrap();

        assert_eq!(table.get(&Currency::usd()), Some(Decimal::ONE));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let result = ExchangeRateTable::new([(Currency::eur(), Decimal::ZERO)]);
        assert!(matches!(result, Err(FxError::InvalidRate { .. })));

        let result = ExchangeRateTable::new([(Currency::gbp(), dec!(-0.79))]);
        assert!(matches!(result, Err(FxError::InvalidRate { .. })));
    }

    #[test]
    fn test_rejects_bad_reference_rate() {
        let result = ExchangeRateTable::new([(Currency::usd(), dec!(1.1))]);
        assert!(matches!(result, Err(FxError::InvalidReferenceRate { .. })));
    }

    #[test]
    fn test_unknown_currency_defaults_to_one() {
        let table = ExchangeRateTable::default_rates();

        assert!(!table.contains(&Currency::new("ZZZ")));
        assert_eq!(table.rate(&Currency::new("ZZZ")), Decimal::ONE);
        assert_eq!(table.rate(&Currency::eur()), dec!(0.92));
    }

    #[test]
    fn test_from_json() {
        let table =
            ExchangeRateTable::from_json_str(r#"{"usd": 1, "EUR": "0.92", "GBP": 0.79}"#).unwrap();

        assert_eq!(table.get(&Currency::eur()), Some(dec!(0.92)));
        assert_eq!(table.get(&Currency::gbp()), Some(dec!(0.79)));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ExchangeRateTable::from_json_str(r#"{"EUR": "abc"}"#).is_err());
        assert!(ExchangeRateTable::from_json_str(r#"{"EUR": 0}"#).is_err());
        assert!(ExchangeRateTable::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_default_rates_are_valid() {
        let table = ExchangeRateTable::default_rates();
        let rebuilt = ExchangeRateTable::new(
            table.currencies().map(|c| (c.clone(), table.rate(c))),
        )
        .unwrap();

        assert_eq!(table, rebuilt);
    }
}
