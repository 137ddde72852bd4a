//! Monetary records read from tenant collections.

use std::fmt;
use std::path::Path;

use bizdesk_common::RecordId;
use bizdesk_fx::CurrencyContext;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ReportError, ReportResult};
use crate::pipeline::LeadStage;

/// A record carrying an amount and an optional currency code.
///
/// Amount fields are kept as raw JSON because stored documents are not
/// reliably typed; [`MonetaryRecord::normalized`] reads them through the
/// zero-on-invalid policy.
pub trait MonetaryRecord {
    /// The stored amount field.
    fn raw_amount(&self) -> &Value;

    /// The stored currency code, if any.
    fn currency_code(&self) -> Option<&str>;

    /// The date the record is reported under.
    fn date(&self) -> NaiveDate;

    /// Amount in the context's display currency.
    fn normalized(&self, ctx: &CurrencyContext) -> Decimal {
        ctx.convert_raw(self.raw_amount(), self.currency_code())
    }
}

/// Calendar month used as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Create a year-month; `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month following this one.
    pub fn succ(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Money received.
    pub fn is_paid(&self) -> bool {
        matches!(self, InvoiceStatus::Paid)
    }

    /// Billed but not yet received.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, InvoiceStatus::Sent | InvoiceStatus::Overdue)
    }
}

/// An issued invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub total: Value,
    #[serde(default)]
    pub currency: Option<String>,
    pub status: InvoiceStatus,
    pub issued_on: NaiveDate,
}

impl MonetaryRecord for Invoice {
    fn raw_amount(&self) -> &Value {
        &self.total
    }

    fn currency_code(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    fn date(&self) -> NaiveDate {
        self.issued_on
    }
}

/// A recorded expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default = "Expense::default_category")]
    pub category: String,
    pub spent_on: NaiveDate,
}

impl Expense {
    fn default_category() -> String {
        "uncategorized".to_string()
    }
}

impl MonetaryRecord for Expense {
    fn raw_amount(&self) -> &Value {
        &self.amount
    }

    fn currency_code(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    fn date(&self) -> NaiveDate {
        self.spent_on
    }
}

/// A sales-pipeline lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub currency: Option<String>,
    pub stage: LeadStage,
    pub created_on: NaiveDate,
}

impl Lead {
    /// Move the lead to another stage.
    pub fn transition(&mut self, next: LeadStage) -> ReportResult<()> {
        if !self.stage.can_transition_to(next) {
            return Err(ReportError::InvalidStageTransition {
                from: self.stage,
                to: next,
            });
        }

        info!(lead_id = %self.id, from = ?self.stage, to = ?next, "Lead stage changed");
        self.stage = next;
        Ok(())
    }

    /// Move the lead along the happy path.
    pub fn advance(&mut self) -> ReportResult<LeadStage> {
        let next = self.stage.next().ok_or(ReportError::InvalidStageTransition {
            from: self.stage,
            to: self.stage,
        })?;
        self.transition(next)?;
        Ok(next)
    }
}

impl MonetaryRecord for Lead {
    fn raw_amount(&self) -> &Value {
        &self.value
    }

    fn currency_code(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    fn date(&self) -> NaiveDate {
        self.created_on
    }
}

/// Snapshot of a tenant's monetary collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub leads: Vec<Lead>,
}

impl RecordSet {
    /// Parse a JSON document with `invoices`, `expenses` and `leads` arrays.
    pub fn from_json_str(json: &str) -> ReportResult<Self> {
        let records: RecordSet = serde_json::from_str(json)?;
        debug!(
            invoices = records.invoices.len(),
            expenses = records.expenses.len(),
            leads = records.leads.len(),
            "Parsed records"
        );
        Ok(records)
    }

    /// Load a record document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReportResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdesk_common::Currency;
    use bizdesk_fx::ExchangeRateTable;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn eur_context() -> CurrencyContext {
        CurrencyContext::new(Currency::eur(), Arc::new(ExchangeRateTable::default_rates()))
    }

    fn lead(stage: LeadStage) -> Lead {
        Lead {
            id: RecordId::new(),
            name: "Globex".into(),
            value: json!(5000),
            currency: Some("USD".into()),
            stage,
            created_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_parse_record_set() {
        let records = RecordSet::from_json_str(
            r#"{
                "invoices": [
                    {"total": "1200.50", "currency": "GBP", "status": "paid", "issued_on": "2024-01-15"}
                ],
                "expenses": [
                    {"amount": 80, "spent_on": "2024-01-20"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(records.invoices.len(), 1);
        assert_eq!(records.invoices[0].status, InvoiceStatus::Paid);
        assert_eq!(records.expenses[0].category, "uncategorized");
        assert_eq!(records.expenses[0].currency_code(), None);
        assert!(records.leads.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_status() {
        let result = RecordSet::from_json_str(
            r#"{"invoices": [{"total": 1, "status": "lost", "issued_on": "2024-01-15"}]}"#,
        );

        assert!(matches!(result, Err(ReportError::InvalidRecords(_))));
    }

    #[test]
    fn test_normalized_amounts() {
        let ctx = eur_context();
        let expense = Expense {
            id: RecordId::new(),
            description: None,
            amount: json!("abc"),
            currency: Some("EUR".into()),
            category: "travel".into(),
            spent_on: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };

        assert_eq!(expense.normalized(&ctx), Decimal::ZERO);
        assert_eq!(lead(LeadStage::New).normalized(&ctx), dec!(4600));
    }

    #[test]
    fn test_year_month() {
        let ym = YearMonth::from(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        assert_eq!(ym.to_string(), "2024-12");
        assert_eq!(ym.succ(), YearMonth::new(2025, 1));
        assert!(YearMonth::new(2024, 2) < YearMonth::new(2024, 11));
    }

    #[test]
    fn test_lead_transitions() {
        let mut lead = lead(LeadStage::New);

        assert_eq!(lead.advance().unwrap(), LeadStage::Contacted);
        lead.transition(LeadStage::Lost).unwrap();

        let err = lead.transition(LeadStage::Won).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidStageTransition {
                from: LeadStage::Lost,
                to: LeadStage::Won
            }
        ));

        lead.transition(LeadStage::New).unwrap();
        assert_eq!(lead.stage, LeadStage::New);
    }

    #[test]
    fn test_advance_from_won_fails() {
        let mut lead = lead(LeadStage::Won);

        assert!(lead.advance().is_err());
        assert_eq!(lead.stage, LeadStage::Won);
    }
}
