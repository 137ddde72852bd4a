//! Dashboard summary across all monetary collections.

use bizdesk_common::Currency;
use bizdesk_fx::{format_amount, CurrencyContext};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::aggregate::{difference, monthly_series, total, total_by_month};
use crate::pipeline::LeadStage;
use crate::records::{RecordSet, YearMonth};

/// Revenue and expenses for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub month: YearMonth,
    pub revenue: Decimal,
    pub expenses: Decimal,
}

impl MonthlyTotals {
    pub fn profit(&self) -> Decimal {
        difference(self.revenue, self.expenses)
    }
}

/// Headline figures shown on the finance dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Display currency every figure is expressed in.
    pub currency: Currency,
    /// Paid invoices.
    pub revenue: Decimal,
    /// Sent and overdue invoices.
    pub outstanding: Decimal,
    /// All expenses.
    pub expenses: Decimal,
    /// Revenue minus expenses.
    pub net_profit: Decimal,
    /// Value of leads not yet won or lost.
    pub open_pipeline: Decimal,
    /// Value of won leads.
    pub won_value: Decimal,
    /// Per-month revenue and expenses, contiguous from first to last month.
    pub monthly: Vec<MonthlyTotals>,
}

impl DashboardSummary {
    /// Compute the summary in the context's display currency.
    #[instrument(skip_all, fields(currency = %ctx.target()))]
    pub fn compute(records: &RecordSet, ctx: &CurrencyContext) -> Self {
        let paid = records.invoices.iter().filter(|i| i.status.is_paid());
        let outstanding = records.invoices.iter().filter(|i| i.status.is_outstanding());
        let open = records.leads.iter().filter(|l| l.stage.is_open());
        let won = records.leads.iter().filter(|l| l.stage == LeadStage::Won);

        let revenue = total(paid, ctx);
        let expenses = total(&records.expenses, ctx);

        let revenue_by_month = total_by_month(
            records.invoices.iter().filter(|i| i.status.is_paid()),
            ctx,
        );
        let expenses_by_month = total_by_month(&records.expenses, ctx);

        let first = revenue_by_month
            .keys()
            .chain(expenses_by_month.keys())
            .min()
            .copied();
        let last = revenue_by_month
            .keys()
            .chain(expenses_by_month.keys())
            .max()
            .copied();

        let monthly = match (first, last) {
            (Some(first), Some(last)) => {
                let revenue_series = monthly_series(&revenue_by_month, first, last);
                let expense_series = monthly_series(&expenses_by_month, first, last);
                revenue_series
                    .into_iter()
                    .zip(expense_series)
                    .map(|((month, revenue), (_, expenses))| MonthlyTotals {
                        month,
                        revenue,
                        expenses,
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        let summary = Self {
            currency: ctx.target().clone(),
            revenue,
            outstanding: total(outstanding, ctx),
            expenses,
            net_profit: difference(revenue, expenses),
            open_pipeline: total(open, ctx),
            won_value: total(won, ctx),
            monthly,
        };

        debug!(
            revenue = %summary.revenue,
            expenses = %summary.expenses,
            months = summary.monthly.len(),
            "Dashboard summary computed"
        );

        summary
    }

    /// Labelled, formatted headline figures.
    pub fn headline(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Revenue", format_amount(self.revenue, &self.currency)),
            ("Outstanding", format_amount(self.outstanding, &self.currency)),
            ("Expenses", format_amount(self.expenses, &self.currency)),
            ("Net profit", format_amount(self.net_profit, &self.currency)),
            ("Open pipeline", format_amount(self.open_pipeline, &self.currency)),
            ("Won deals", format_amount(self.won_value, &self.currency)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdesk_fx::ExchangeRateTable;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    const RECORDS: &str = r#"{
        "invoices": [
            {"total": 1000, "currency": "USD", "status": "paid", "issued_on": "2024-01-10"},
            {"total": "500", "currency": "EUR", "status": "paid", "issued_on": "2024-03-02"},
            {"total": 300, "currency": "USD", "status": "sent", "issued_on": "2024-03-05"},
            {"total": 200, "currency": "USD", "status": "overdue", "issued_on": "2024-02-01"},
            {"total": 999, "currency": "USD", "status": "draft", "issued_on": "2024-02-01"}
        ],
        "expenses": [
            {"amount": 400, "currency": "USD", "category": "rent", "spent_on": "2024-01-01"},
            {"amount": "oops", "currency": "USD", "category": "rent", "spent_on": "2024-02-01"}
        ],
        "leads": [
            {"name": "Initech", "value": 2000, "currency": "USD", "stage": "proposal", "created_on": "2024-01-01"},
            {"name": "Hooli", "value": 1000, "currency": "USD", "stage": "won", "created_on": "2024-01-01"},
            {"name": "Umbrella", "value": 5000, "currency": "USD", "stage": "lost", "created_on": "2024-01-01"}
        ]
    }"#;

    fn ctx(target: Currency) -> CurrencyContext {
        let rates = ExchangeRateTable::new([(Currency::eur(), dec!(0.92))]).unwrap();
        CurrencyContext::new(target, Arc::new(rates))
    }

    #[test]
    fn test_summary_in_eur() {
        let records = RecordSet::from_json_str(RECORDS).unwrap();
        let summary = DashboardSummary::compute(&records, &ctx(Currency::eur()));

        assert_eq!(summary.currency, Currency::eur());
        assert_eq!(summary.revenue, dec!(1420));
        assert_eq!(summary.outstanding, dec!(460));
        assert_eq!(summary.expenses, dec!(368));
        assert_eq!(summary.net_profit, dec!(1052));
        assert_eq!(summary.open_pipeline, dec!(1840));
        assert_eq!(summary.won_value, dec!(920));
    }

    #[test]
    fn test_monthly_series() {
        let records = RecordSet::from_json_str(RECORDS).unwrap();
        let summary = DashboardSummary::compute(&records, &ctx(Currency::eur()));

        assert_eq!(summary.monthly.len(), 3);
        assert_eq!(summary.monthly[0].month, YearMonth::new(2024, 1));
        assert_eq!(summary.monthly[0].profit(), dec!(552));
        assert_eq!(summary.monthly[1].revenue, Decimal::ZERO);
        assert_eq!(summary.monthly[1].expenses, Decimal::ZERO);
        assert_eq!(summary.monthly[2].revenue, dec!(500));
    }

    #[test]
    fn test_headline_formatting() {
        let records = RecordSet::from_json_str(RECORDS).unwrap();
        let summary = DashboardSummary::compute(&records, &ctx(Currency::usd()));
        let headline = summary.headline();

        assert_eq!(headline[0], ("Revenue", "$1,543.48".to_string()));
        assert_eq!(headline[2], ("Expenses", "$400".to_string()));
    }

    #[test]
    fn test_empty_records() {
        let summary = DashboardSummary::compute(&RecordSet::default(), &ctx(Currency::usd()));

        assert!(summary.monthly.is_empty());
        assert_eq!(summary.net_profit, Decimal::ZERO);
        assert_eq!(summary.headline()[3].1, "$0");
    }

    #[test]
    fn test_extreme_amounts_do_not_panic() {
        let records = RecordSet::from_json_str(
            r#"{
                "invoices": [
                    {"total": "-79228162514264337593543950335", "currency": "USD", "status": "paid", "issued_on": "2024-01-10"}
                ],
                "expenses": [
                    {"amount": "79228162514264337593543950335", "currency": "USD", "spent_on": "2024-01-01"},
                    {"amount": "79228162514264337593543950335", "currency": "USD", "spent_on": "2024-01-02"}
                ]
            }"#,
        )
        .unwrap();

        let summary = DashboardSummary::compute(&records, &ctx(Currency::usd()));

        assert_eq!(summary.expenses, Decimal::MAX);
        assert_eq!(summary.revenue, Decimal::MIN);
        assert_eq!(summary.net_profit, Decimal::ZERO);
        assert_eq!(summary.monthly[0].profit(), Decimal::ZERO);
    }
}
