//! Reducers that sum normalized amounts.

use std::collections::BTreeMap;

use bizdesk_fx::CurrencyContext;
use rust_decimal::Decimal;
use tracing::warn;

use crate::pipeline::LeadStage;
use crate::records::{Expense, Invoice, InvoiceStatus, Lead, MonetaryRecord, YearMonth};

/// Sum of all records in the display currency.
pub fn total<'a, R, I>(records: I, ctx: &CurrencyContext) -> Decimal
where
    R: MonetaryRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .fold(Decimal::ZERO, |acc, r| accumulate(acc, r.normalized(ctx)))
}

/// Sum of records grouped by an arbitrary key.
pub fn total_by<'a, R, I, K, F>(records: I, ctx: &CurrencyContext, key: F) -> BTreeMap<K, Decimal>
where
    R: MonetaryRecord + 'a,
    I: IntoIterator<Item = &'a R>,
    K: Ord,
    F: Fn(&R) -> K,
{
    let mut totals = BTreeMap::new();
    for record in records {
        let value = record.normalized(ctx);
        let entry = totals.entry(key(record)).or_insert(Decimal::ZERO);
        *entry = accumulate(*entry, value);
    }
    totals
}

/// Add `value` to a running total. An addend that would overflow is dropped.
pub fn accumulate(total: Decimal, value: Decimal) -> Decimal {
    total.checked_add(value).unwrap_or_else(|| {
        warn!(total = %total, value = %value, "Total overflowed, skipping amount");
        total
    })
}

/// `a - b`, or zero when the difference does not fit in a decimal.
pub fn difference(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| {
        warn!(minuend = %a, subtrahend = %b, "Difference overflowed, using 0");
        Decimal::ZERO
    })
}

/// Sum of records grouped by calendar month.
pub fn total_by_month<'a, R, I>(records: I, ctx: &CurrencyContext) -> BTreeMap<YearMonth, Decimal>
where
    R: MonetaryRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    total_by(records, ctx, |r| YearMonth::from(r.date()))
}

/// Every month from `first` to `last` inclusive, with gaps filled by zero.
pub fn monthly_series(
    totals: &BTreeMap<YearMonth, Decimal>,
    first: YearMonth,
    last: YearMonth,
) -> Vec<(YearMonth, Decimal)> {
    let mut series = Vec::new();
    let mut month = first;
    while month <= last {
        let value = totals.get(&month).copied().unwrap_or(Decimal::ZERO);
        series.push((month, value));
        month = month.succ();
    }
    series
}

/// Invoice totals per status.
pub fn invoice_totals_by_status(
    invoices: &[Invoice],
    ctx: &CurrencyContext,
) -> BTreeMap<InvoiceStatus, Decimal> {
    total_by(invoices, ctx, |i: &Invoice| i.status)
}

/// Expense totals per category.
pub fn expense_totals_by_category(
    expenses: &[Expense],
    ctx: &CurrencyContext,
) -> BTreeMap<String, Decimal> {
    total_by(expenses, ctx, |e: &Expense| e.category.clone())
}

/// Lead value per pipeline stage.
pub fn pipeline_value_by_stage(
    leads: &[Lead],
    ctx: &CurrencyContext,
) -> BTreeMap<LeadStage, Decimal> {
    total_by(leads, ctx, |l: &Lead| l.stage)
}
