//! Sales pipeline stages.

use serde::{Deserialize, Serialize};

/// Stage of a lead in the sales pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStage {
    /// Just captured.
    New,
    /// First contact made.
    Contacted,
    /// Budget and need confirmed.
    Qualified,
    /// Proposal sent.
    Proposal,
    /// Terms under discussion.
    Negotiation,
    /// Deal closed.
    Won,
    /// Deal dropped.
    Lost,
}

impl LeadStage {
    /// Open stages in pipeline order.
    pub const OPEN: [LeadStage; 5] = [
        LeadStage::New,
        LeadStage::Contacted,
        LeadStage::Qualified,
        LeadStage::Proposal,
        LeadStage::Negotiation,
    ];

    /// Check if the deal is closed either way.
    pub fn is_closed(&self) -> bool {
        matches!(self, LeadStage::Won | LeadStage::Lost)
    }

    /// Check if the lead still counts towards open pipeline value.
    pub fn is_open(&self) -> bool {
        !self.is_closed()
    }

    /// Next stage in the happy path, if any.
    pub fn next(&self) -> Option<LeadStage> {
        match self {
            LeadStage::New => Some(LeadStage::Contacted),
            LeadStage::Contacted => Some(LeadStage::Qualified),
            LeadStage::Qualified => Some(LeadStage::Proposal),
            LeadStage::Proposal => Some(LeadStage::Negotiation),
            LeadStage::Negotiation => Some(LeadStage::Won),
            LeadStage::Won | LeadStage::Lost => None,
        }
    }

    /// Check if transition to given stage is valid.
    ///
    /// Open leads may move forward any number of stages or drop to `Lost`.
    /// `Lost` leads can only be reopened as `New`; `Won` is final.
    pub fn can_transition_to(&self, next: LeadStage) -> bool {
        match (self, next) {
            (LeadStage::Won, _) => false,
            (LeadStage::Lost, to) => to == LeadStage::New,
            (_, LeadStage::Lost) => true,
            (from, to) => to > *from,
        }
    }
}
