//! Proposal lifecycle state machine
//!
//! `Idle -> Pending -> Ready -> Applied`, with failure and discard
//! returning to `Idle`. Applied is terminal for a generation instance;
//! the fresh cycle re-enters through `Pending`. A discarded proposal is
//! modeled as the slot returning to `Idle` with its payload cleared.

use crate::error::RegistryError;
use crate::kind::ProposalKind;
use serde::{Deserialize, Serialize};

/// Lifecycle state of the proposal slot for one kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// No proposal exists for this kind
    #[default]
    Idle,
    /// A generation is in flight
    Pending,
    /// A payload is available for review
    Ready,
    /// The payload was merged into canonical state
    Applied,
}

impl std::fmt::Display for ProposalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProposalState::Idle => "idle",
            ProposalState::Pending => "pending",
            ProposalState::Ready => "ready",
            ProposalState::Applied => "applied",
        };
        f.write_str(s)
    }
}

pub fn allowed_transitions(from: ProposalState) -> Vec<ProposalState> {
    use ProposalState::*;
    match from {
        Idle => vec![Pending],
        Pending => vec![Ready, Idle],
        Ready => vec![Applied, Idle],
        // Fresh cycle: begin() clears the applied instance
        Applied => vec![Pending],
    }
}

fn allowed(from: ProposalState, to: ProposalState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

/// Validates a state transition for `kind`, naming the operation that
/// attempted it in the error.
pub fn validate_transition(
    kind: ProposalKind,
    from: ProposalState,
    to: ProposalState,
    op: &'static str,
) -> Result<(), RegistryError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(RegistryError::InvalidTransition { kind, from, op })
    }
}
