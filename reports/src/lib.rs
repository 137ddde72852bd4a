//! Bizdesk Reports
//!
//! Dashboard reducers over invoices, expenses and sales leads. Every amount is
//! normalized into the context's display currency before it is summed.

pub mod aggregate;
pub mod error;
pub mod pipeline;
pub mod records;
pub mod summary;

pub use aggregate::*;
pub use error::{ReportError, ReportResult};
pub use pipeline::LeadStage;
pub use records::*;
pub use summary::{DashboardSummary, MonthlyTotals};
