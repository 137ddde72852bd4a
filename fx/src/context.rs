//! Conversion context: a target currency plus the rate table to reach it.

use std::sync::Arc;

use bizdesk_common::{amount_or_zero, Currency, Money};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use crate::format::format_amount;
use crate::rates::ExchangeRateTable;

/// Immutable snapshot used by every conversion and formatting call.
///
/// Contexts are cheap to clone and safe to share between threads; a new one is
/// taken whenever the display currency changes.
#[derive(Debug, Clone)]
pub struct CurrencyContext {
    target: Currency,
    rates: Arc<ExchangeRateTable>,
}

impl CurrencyContext {
    /// Create a context converting into `target`.
    pub fn new(target: Currency, rates: Arc<ExchangeRateTable>) -> Self {
        Self { target, rates }
    }

    /// The display currency conversions produce.
    pub fn target(&self) -> &Currency {
        &self.target
    }

    /// The rate table in use.
    pub fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    /// Same rates, different display currency.
    pub fn with_target(&self, target: Currency) -> Self {
        Self {
            target,
            rates: Arc::clone(&self.rates),
        }
    }

    /// Convert `amount` from `source` (USD when absent) into the target.
    ///
    /// Same-currency amounts are returned untouched. Otherwise the amount goes
    /// through the reference currency: `amount / rate(source) * rate(target)`.
    /// Arithmetic overflow yields zero.
    pub fn convert(&self, amount: Decimal, source: Option<&Currency>) -> Decimal {
        let reference = Currency::default();
        let source = source.unwrap_or(&reference);

        if *source == self.target {
            return amount;
        }

        let from = self.rates.rate(source);
        let to = self.rates.rate(&self.target);

        match amount.checked_div(from).and_then(|v| v.checked_mul(to)) {
            Some(converted) => converted,
            None => {
                warn!(
                    amount = %amount,
                    from = %source,
                    to = %self.target,
                    "Conversion overflowed, using 0"
                );
                Decimal::ZERO
            }
        }
    }

    /// Convert a stored amount whose value and currency are loosely typed.
    ///
    /// Unreadable amounts count as zero and blank codes as USD.
    pub fn convert_raw(&self, amount: &Value, source: Option<&str>) -> Decimal {
        let source = Currency::or_reference(source);
        self.convert(amount_or_zero(amount), Some(&source))
    }

    /// Convert a [`Money`] value into the target currency.
    pub fn convert_money(&self, money: &Money) -> Money {
        Money::new(
            self.convert(money.value, Some(&money.currency)),
            self.target.clone(),
        )
    }

    /// Convert then render in the target currency.
    pub fn format(&self, amount: Decimal, source: Option<&Currency>) -> String {
        format_amount(self.convert(amount, source), &self.target)
    }

    /// Format a [`Money`] value in the target currency.
    pub fn format_money(&self, money: &Money) -> String {
        self.format(money.value, Some(&money.currency))
    }

    /// Format a loosely-typed stored amount.
    pub fn format_raw(&self, amount: &Value, source: Option<&str>) -> String {
        format_amount(self.convert_raw(amount, source), &self.target)
    }
}
