//! Report error types.

use thiserror::Error;

use crate::pipeline::LeadStage;

/// Errors raised while loading records or moving leads through the pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Lead cannot move between these stages.
    #[error("Invalid stage transition from {from:?} to {to:?}")]
    InvalidStageTransition { from: LeadStage, to: LeadStage },

    /// Record document could not be parsed.
    #[error("Invalid records: {0}")]
    InvalidRecords(#[from] serde_json::Error),

    /// Record file could not be read.
    #[error("Cannot read records: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;
