//! Proposal kinds

use serde::{Deserialize, Serialize};

/// The kinds of candidate artifacts a generation can produce.
///
/// At most one proposal of each kind exists at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalKind {
    /// Readability rewrite of the whole working text
    Rewrite,
    /// Extracted question/answer pairs
    Questions,
    /// Document summary
    Summary,
}

impl ProposalKind {
    /// Every kind, in a stable order
    pub const ALL: [ProposalKind; 3] = [
        ProposalKind::Rewrite,
        ProposalKind::Questions,
        ProposalKind::Summary,
    ];

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProposalKind::Rewrite => "rewrite",
            ProposalKind::Questions => "questions",
            ProposalKind::Summary => "summary",
        }
    }
}

impl std::fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_kind() {
        assert_eq!(ProposalKind::ALL.len(), 3);
        for kind in ProposalKind::ALL {
            assert!(ProposalKind::ALL.contains(&kind));
        }
    }

    #[test]
    fn display_is_stable() {
        assert_eq!(ProposalKind::Rewrite.to_string(), "rewrite");
        assert_eq!(ProposalKind::Questions.to_string(), "questions");
        assert_eq!(ProposalKind::Summary.to_string(), "summary");
    }
}
