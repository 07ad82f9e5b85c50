//! Error types for proposals
//!
//! All recoverable-local: a generation failure resets its kind to Idle,
//! a registry error leaves the slot exactly as it was.

use crate::kind::ProposalKind;
use crate::lifecycle::ProposalState;

/// Raw inference backend failure, before the engine attributes it to a kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The backend ran and failed
    #[error("inference failed: {0}")]
    Failed(String),

    /// The backend could not be reached
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Generation failure, carrying the kind so the caller can reset its slot
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Backend error for this kind
    #[error("generation failed for {kind}: {source}")]
    Backend {
        kind: ProposalKind,
        source: BackendError,
    },

    /// The configured timeout expired; the in-flight work is abandoned
    #[error("generation for {kind} timed out after {timeout_ms}ms")]
    TimedOut { kind: ProposalKind, timeout_ms: u64 },

    /// The backend returned a payload of the wrong shape for the kind
    #[error("backend returned {got} payload for a {kind} request")]
    ShapeMismatch {
        kind: ProposalKind,
        got: ProposalKind,
    },
}

impl GenerationError {
    /// The kind whose slot must be reset to Idle
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ProposalKind {
        match self {
            GenerationError::Backend { kind, .. }
            | GenerationError::TimedOut { kind, .. }
            | GenerationError::ShapeMismatch { kind, .. } => *kind,
        }
    }
}

/// Registry operation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Operation not legal for the slot's kind or current state
    #[error("invalid transition: {op} on {kind} proposal in state {from}")]
    InvalidTransition {
        kind: ProposalKind,
        from: ProposalState,
        op: &'static str,
    },

    /// Q&A item index out of range
    #[error("item index {index} out of range for {kind} proposal ({len} items)")]
    IndexOutOfRange {
        kind: ProposalKind,
        index: usize,
        len: usize,
    },

    /// Apply requested with zero accepted items; a validation error, not a
    /// crash - the slot stays Ready
    #[error("no items accepted for {kind} proposal")]
    NoSelection { kind: ProposalKind },
}
