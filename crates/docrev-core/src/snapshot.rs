//! Workflow snapshot
//!
//! The single read surface for display layers: everything is copied by
//! value, so no display code ever holds a reference into core state.

use crate::view::ViewMode;
use docrev_content::DocumentSnapshot;
use docrev_proposal::{ProposalKind, ProposalSnapshot};
use serde::{Deserialize, Serialize};

/// By-value view of the whole workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    /// Document text, dirty flag, summary state
    pub document: DocumentSnapshot,
    /// One entry per kind, in `ProposalKind::ALL` order
    pub proposals: Vec<ProposalSnapshot>,
    /// Accepted-item count for the Questions proposal
    pub qa_accepted: usize,
    /// Selected layout
    pub view_mode: ViewMode,
    /// Proposal panel currently in front, if any
    pub active_panel: Option<ProposalKind>,
}

impl WorkflowSnapshot {
    /// The slot snapshot for `kind`
    #[must_use]
    pub fn proposal(&self, kind: ProposalKind) -> Option<&ProposalSnapshot> {
        self.proposals.iter().find(|p| p.kind == kind)
    }
}
