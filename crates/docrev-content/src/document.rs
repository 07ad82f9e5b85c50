//! Document state and snapshots
//!
//! Defines the document entity owned by the content store:
//! - Identifier newtype
//! - Canonical / working / pristine text triple
//! - Summary state (applied vs. proposed)
//! - By-value snapshot handed to display layers

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique document identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Ulid);

impl DocumentId {
    /// Generate new document ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document summary, decoupled from the document body.
///
/// `applied` is the persisted summary; `proposed` mirrors a live AI
/// candidate until it is explicitly applied or discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryState {
    /// Last applied summary, if any
    pub applied: Option<String>,
    /// Live editable candidate, if a summary proposal is ready
    pub proposed: Option<String>,
}

/// The document under review.
///
/// Invariants:
/// - `pristine_text` changes only on a successful save
/// - `canonical_text` equals the last value applied or saved
/// - dirty is derived: `working_text != pristine_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Document identifier
    pub id: DocumentId,
    /// Authoritative content: last saved or applied value
    pub canonical_text: String,
    /// Currently edited, possibly unsaved, content
    pub working_text: String,
    /// Snapshot of the last persisted content
    pub pristine_text: String,
    /// Summary state for this document
    pub summary: SummaryState,
}

impl Document {
    /// Create a document from freshly extracted text.
    ///
    /// Canonical, working, and pristine all start equal, so a new
    /// document is clean.
    #[inline]
    #[must_use]
    pub fn new(id: DocumentId, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id,
            canonical_text: text.clone(),
            working_text: text.clone(),
            pristine_text: text,
            summary: SummaryState::default(),
        }
    }

    /// Whether the working text diverges from the last persisted snapshot
    #[inline]
    #[must_use]
    pub fn dirty(&self) -> bool {
        self.working_text != self.pristine_text
    }

    /// By-value snapshot for display layers
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            id: self.id,
            working_text: self.working_text.clone(),
            dirty: self.dirty(),
            summary: self.summary.clone(),
        }
    }
}

/// Read-only copy of document state for display layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: DocumentId,
    pub working_text: String,
    pub dirty: bool,
    pub summary: SummaryState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_clean() {
        let doc = Document::new(DocumentId::new(), "# Title");
        assert!(!doc.dirty());
        assert_eq!(doc.canonical_text, "# Title");
        assert_eq!(doc.pristine_text, "# Title");
    }

    #[test]
    fn dirty_tracks_working_vs_pristine() {
        let mut doc = Document::new(DocumentId::new(), "a");
        doc.working_text = "b".to_string();
        assert!(doc.dirty());

        doc.working_text = "a".to_string();
        assert!(!doc.dirty());
    }

    #[test]
    fn snapshot_copies_state() {
        let mut doc = Document::new(DocumentId::new(), "a");
        doc.working_text = "b".to_string();
        doc.summary.applied = Some("s".to_string());

        let snap = doc.snapshot();
        assert_eq!(snap.working_text, "b");
        assert!(snap.dirty);
        assert_eq!(snap.summary.applied.as_deref(), Some("s"));
    }

    #[test]
    fn document_id_display_roundtrip() {
        let id = DocumentId::new();
        assert_eq!(id.to_string().len(), 26);
    }
}
