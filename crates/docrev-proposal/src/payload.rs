//! Typed proposal payloads
//!
//! The payload shape is determined by the proposal kind: plain text for
//! rewrites and summaries, an ordered item list for Q&A sets.

use crate::kind::ProposalKind;
use serde::{Deserialize, Serialize};

/// One extracted question/answer pair.
///
/// Owned exclusively by a `Questions` payload; `accepted` marks the item
/// for inclusion when the proposal is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaItem {
    pub question: String,
    pub answer: String,
    pub accepted: bool,
}

impl QaItem {
    /// New item, not accepted
    #[inline]
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            accepted: false,
        }
    }
}

/// Editable field of a [`QaItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QaField {
    Question,
    Answer,
}

/// Generation result, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalPayload {
    /// Full replacement text
    Rewrite(String),
    /// Ordered question/answer pairs
    Questions(Vec<QaItem>),
    /// Summary text
    Summary(String),
}

impl ProposalPayload {
    /// The kind this payload belongs to
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ProposalKind {
        match self {
            ProposalPayload::Rewrite(_) => ProposalKind::Rewrite,
            ProposalPayload::Questions(_) => ProposalKind::Questions,
            ProposalPayload::Summary(_) => ProposalKind::Summary,
        }
    }

    /// Text content for Rewrite/Summary payloads
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ProposalPayload::Rewrite(text) | ProposalPayload::Summary(text) => Some(text),
            ProposalPayload::Questions(_) => None,
        }
    }

    /// Item list for Questions payloads
    #[inline]
    #[must_use]
    pub fn as_items(&self) -> Option<&[QaItem]> {
        match self {
            ProposalPayload::Questions(items) => Some(items),
            _ => None,
        }
    }

    /// Number of accepted items (0 for non-Questions payloads)
    #[inline]
    #[must_use]
    pub fn accepted_count(&self) -> usize {
        match self {
            ProposalPayload::Questions(items) => items.iter().filter(|i| i.accepted).count(),
            _ => 0,
        }
    }
}
