//! Error rollup for the workflow layer
//!
//! Every component error converts into `WorkflowError` so callers handle a
//! single type. All variants are recoverable-local: the affected operation
//! is back in its pre-attempt state and the document remains editable.

use docrev_content::{ExtractError, SaveError};
use docrev_proposal::{GenerationError, RegistryError};

/// Workflow error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Save sink rejected a persist attempt
    #[error("save failed: {0}")]
    Save(#[from] SaveError),

    /// Source extraction failed
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// A generation failed; its kind is back to Idle and retryable
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// A proposal operation was not legal in the current state
    #[error("proposal error: {0}")]
    Registry(#[from] RegistryError),
}

impl WorkflowError {
    /// Whether the underlying operation can simply be retried as-is
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Save(_) | Self::Extract(_) | Self::Generation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrev_proposal::ProposalKind;

    #[test]
    fn conversions_preserve_message() {
        let err: WorkflowError = SaveError::Rejected("disk full".to_string()).into();
        assert!(err.to_string().contains("disk full"));

        let err: WorkflowError = RegistryError::NoSelection {
            kind: ProposalKind::Questions,
        }
        .into();
        assert!(err.to_string().contains("no items accepted"));
    }

    #[test]
    fn io_failures_are_retryable() {
        let err: WorkflowError = SaveError::Rejected("x".to_string()).into();
        assert!(err.is_retryable());

        let err: WorkflowError = RegistryError::NoSelection {
            kind: ProposalKind::Questions,
        }
        .into();
        assert!(!err.is_retryable());
    }
}
