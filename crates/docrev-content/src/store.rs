//! Content store
//!
//! Single owner of the document under review. Synchronous mutations take
//! the state lock briefly; the asynchronous flows (save, re-extraction,
//! open) snapshot what they need, release the lock, and only re-acquire it
//! to commit a successful result. An edit racing a save is never lost: the
//! save commits the snapshot it actually persisted, and the document stays
//! dirty if the working text moved on meanwhile.

use crate::document::{Document, DocumentId, DocumentSnapshot, SummaryState};
use crate::error::{ExtractError, SaveError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Save sink collaborator
///
/// Supplied by the surrounding system; persists working text for a
/// document.
#[async_trait::async_trait]
pub trait SaveSink: Send + Sync {
    /// Persist `text` as the saved content of `id`
    async fn persist(&self, id: DocumentId, text: &str) -> Result<(), SaveError>;
}

/// Source extraction collaborator
///
/// Supplied by the surrounding system; derives the textual representation
/// of a source document.
#[async_trait::async_trait]
pub trait SourceExtractor: Send + Sync {
    /// Extract the text for `id` from its source
    async fn extract(&self, id: DocumentId) -> Result<String, ExtractError>;
}

/// Owns canonical document state and the persistence/extraction seams
pub struct ContentStore {
    doc: Mutex<Document>,
    sink: Arc<dyn SaveSink>,
    extractor: Arc<dyn SourceExtractor>,
}

impl ContentStore {
    /// Create a store with an empty placeholder document.
    ///
    /// Callers are expected to `open` a real document before use; the
    /// placeholder just keeps every read well-defined.
    #[must_use]
    pub fn new(sink: Arc<dyn SaveSink>, extractor: Arc<dyn SourceExtractor>) -> Self {
        Self {
            doc: Mutex::new(Document::new(DocumentId::new(), String::new())),
            sink,
            extractor,
        }
    }

    /// Open (or switch to) a document.
    ///
    /// Extracts the initial text and replaces the current document with a
    /// clean one. On failure the previous document is left intact.
    ///
    /// # Errors
    /// Returns `ExtractError` if the extractor rejects the document.
    pub async fn open(&self, id: DocumentId) -> Result<(), ExtractError> {
        let text = self.extractor.extract(id).await.map_err(|e| {
            tracing::warn!(document = %id, error = %e, "open failed");
            e
        })?;

        let mut doc = self.doc.lock();
        *doc = Document::new(id, text);
        tracing::info!(document = %id, "document opened");
        Ok(())
    }

    /// Replace the working text with a user edit. Never fails.
    pub fn edit(&self, text: impl Into<String>) {
        let mut doc = self.doc.lock();
        doc.working_text = text.into();
        tracing::debug!(document = %doc.id, dirty = doc.dirty(), "working text edited");
    }

    /// Persist the working text if dirty.
    ///
    /// Returns `Ok(true)` if a write happened, `Ok(false)` if the document
    /// was already clean. On success, pristine and canonical are set to the
    /// snapshot that was persisted; edits made while the sink call was in
    /// flight keep the document dirty.
    ///
    /// # Errors
    /// Returns `SaveError` if the sink rejects; working text is untouched
    /// so the user may retry.
    pub async fn save(&self) -> Result<bool, SaveError> {
        let (id, text) = {
            let doc = self.doc.lock();
            if !doc.dirty() {
                tracing::debug!(document = %doc.id, "save skipped, document clean");
                return Ok(false);
            }
            (doc.id, doc.working_text.clone())
        };

        self.sink.persist(id, &text).await.map_err(|e| {
            tracing::warn!(document = %id, error = %e, "save failed");
            e
        })?;

        let mut doc = self.doc.lock();
        doc.pristine_text = text.clone();
        doc.canonical_text = text;
        tracing::info!(document = %id, dirty = doc.dirty(), "document saved");
        Ok(true)
    }

    /// Re-derive the working text from the original source.
    ///
    /// Overwrites the working text only; pristine is untouched, so the
    /// result stays dirty until saved.
    ///
    /// # Errors
    /// Returns `ExtractError` if the extractor rejects; text is untouched.
    pub async fn regenerate_from_source(&self) -> Result<(), ExtractError> {
        let id = self.doc.lock().id;

        let text = self.extractor.extract(id).await.map_err(|e| {
            tracing::warn!(document = %id, error = %e, "regeneration failed");
            e
        })?;

        let mut doc = self.doc.lock();
        // The document may have been switched while extraction ran; a
        // stale result must not clobber the new document.
        if doc.id != id {
            tracing::debug!(document = %id, "regeneration result dropped, document switched");
            return Ok(());
        }
        doc.working_text = text;
        tracing::info!(document = %id, dirty = doc.dirty(), "working text regenerated");
        Ok(())
    }

    /// Apply path for rewrite proposals: the new text is both working and
    /// canonical (it is the last applied value). Pristine is untouched, so
    /// an applied rewrite still needs a save.
    pub fn replace_working(&self, text: impl Into<String>) {
        let text = text.into();
        let mut doc = self.doc.lock();
        doc.working_text = text.clone();
        doc.canonical_text = text;
        tracing::debug!(document = %doc.id, dirty = doc.dirty(), "working text replaced");
    }

    /// Apply path for merged QA blocks: append to working and canonical.
    pub fn append_canonical(&self, block: &str) {
        let mut doc = self.doc.lock();
        doc.working_text.push_str(block);
        doc.canonical_text.push_str(block);
        tracing::debug!(document = %doc.id, "canonical text appended");
    }

    /// Record an applied summary
    pub fn set_applied_summary(&self, text: impl Into<String>) {
        let mut doc = self.doc.lock();
        doc.summary.applied = Some(text.into());
    }

    /// Mirror (or clear) the live summary candidate
    pub fn set_proposed_summary(&self, text: Option<String>) {
        let mut doc = self.doc.lock();
        doc.summary.proposed = text;
    }

    /// Current summary state, by value
    #[must_use]
    pub fn summary(&self) -> SummaryState {
        self.doc.lock().summary.clone()
    }

    /// Current document ID
    #[must_use]
    pub fn document_id(&self) -> DocumentId {
        self.doc.lock().id
    }

    /// Current working text, by value
    #[must_use]
    pub fn working_text(&self) -> String {
        self.doc.lock().working_text.clone()
    }

    /// Whether the working text diverges from the last saved snapshot
    #[must_use]
    pub fn dirty(&self) -> bool {
        self.doc.lock().dirty()
    }

    /// By-value snapshot for display layers
    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        self.doc.lock().snapshot()
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("doc", &*self.doc.lock())
            .finish_non_exhaustive()
    }
}
