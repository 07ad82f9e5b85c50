//! Workflow controller
//!
//! Routes user intents and owns the transition points between components.
//! Generation, save, and re-extraction are the only suspension points;
//! every state mutation happens synchronously between them, so intents for
//! one kind never interleave mid-transition and intents for different
//! kinds run freely while a generation is in flight.

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::snapshot::WorkflowSnapshot;
use crate::view::ViewMode;
use docrev_content::{ContentStore, DocumentId, SaveSink, SourceExtractor};
use docrev_proposal::{
    InferenceBackend, ProposalEngine, ProposalKind, ProposalPayload, ProposalRegistry,
    ProposalSnapshot, QaField, QaItem,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
struct ViewFlags {
    mode: ViewMode,
    active_panel: Option<ProposalKind>,
}

/// Orchestrates content edits, proposal generations, and merges
pub struct WorkflowController {
    config: WorkflowConfig,
    store: ContentStore,
    registry: ProposalRegistry,
    engine: ProposalEngine,
    view: Mutex<ViewFlags>,
}

impl WorkflowController {
    /// Wire up a controller from its collaborators
    #[must_use]
    pub fn new(
        config: WorkflowConfig,
        sink: Arc<dyn SaveSink>,
        extractor: Arc<dyn SourceExtractor>,
        backend: Arc<dyn InferenceBackend>,
    ) -> Self {
        let mut engine = ProposalEngine::new(backend);
        if let Some(timeout) = config.generation_timeout {
            engine = engine.with_timeout(timeout);
        }
        Self {
            store: ContentStore::new(sink, extractor),
            registry: ProposalRegistry::new().with_history_cap(config.history_cap),
            engine,
            config,
            view: Mutex::new(ViewFlags::default()),
        }
    }

    /// Open (or switch to) a document: extract its text, then reset every
    /// proposal slot and the view flags. On failure nothing changes.
    ///
    /// # Errors
    /// `WorkflowError::Extract` if the extractor rejects the document.
    pub async fn open_document(&self, id: DocumentId) -> Result<(), WorkflowError> {
        self.store.open(id).await?;
        self.registry.reset();
        self.view.lock().active_panel = None;
        Ok(())
    }

    /// Replace the working text with a user edit
    pub fn edit(&self, text: impl Into<String>) {
        self.store.edit(text);
    }

    /// Persist the working text if dirty; `Ok(true)` if a write happened
    ///
    /// # Errors
    /// `WorkflowError::Save` if the sink rejects; retryable.
    pub async fn save(&self) -> Result<bool, WorkflowError> {
        Ok(self.store.save().await?)
    }

    /// Re-derive the working text from the original source
    ///
    /// # Errors
    /// `WorkflowError::Extract` if the extractor rejects; retryable.
    pub async fn regenerate(&self) -> Result<(), WorkflowError> {
        Ok(self.store.regenerate_from_source().await?)
    }

    /// Request a proposal of `kind`.
    ///
    /// If one is already Pending or Ready, it is surfaced (the panel
    /// switches to it) and no new generation starts. Otherwise a fresh
    /// cycle begins: the slot goes Pending, the working text is
    /// snapshotted, and the engine runs without any lock held.
    ///
    /// # Errors
    /// `WorkflowError::Generation` if the generation fails; the slot is
    /// back to Idle and the kind retryable.
    pub async fn request(&self, kind: ProposalKind) -> Result<ProposalSnapshot, WorkflowError> {
        self.view.lock().active_panel = Some(kind);

        if self.registry.begin(kind).is_err() {
            // Pending or Ready: surface the existing proposal. This also
            // covers a request losing the race to a concurrent one.
            tracing::debug!(%kind, "surfacing existing proposal");
            return Ok(self.registry.snapshot(kind));
        }

        let document = self.store.document_id();
        let text = self.store.working_text();

        match self.engine.generate(kind, &text).await {
            Ok(payload) => {
                // The document may have been switched while the generation
                // ran (slot reset to Idle); the result belongs to the old
                // document and is dropped.
                if self.store.document_id() != document
                    || self.registry.complete(kind, payload.clone()).is_err()
                {
                    tracing::debug!(%kind, "stale generation dropped");
                    return Ok(self.registry.snapshot(kind));
                }
                if let ProposalPayload::Summary(text) = payload {
                    self.store.set_proposed_summary(Some(text));
                }
                Ok(self.registry.snapshot(kind))
            }
            Err(err) => {
                // Reset so the kind is retryable; the slot may already be
                // Idle if the document was switched meanwhile.
                let _ = self.registry.fail(kind);
                Err(err.into())
            }
        }
    }

    /// Flip a Q&A item's accepted flag; returns the new value
    ///
    /// # Errors
    /// `WorkflowError::Registry` unless a Questions proposal is Ready and
    /// the index is in range.
    pub fn toggle_accept(&self, kind: ProposalKind, index: usize) -> Result<bool, WorkflowError> {
        Ok(self.registry.toggle_accept(kind, index)?)
    }

    /// Edit one field of a Q&A item
    ///
    /// # Errors
    /// `WorkflowError::Registry` unless a Questions proposal is Ready and
    /// the index is in range.
    pub fn edit_item(
        &self,
        kind: ProposalKind,
        index: usize,
        field: QaField,
        value: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        Ok(self.registry.edit_item(kind, index, field, value)?)
    }

    /// Edit the text of a Ready Rewrite or Summary candidate
    ///
    /// # Errors
    /// `WorkflowError::Registry` unless that kind's proposal is Ready.
    pub fn edit_text(
        &self,
        kind: ProposalKind,
        value: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        let value = value.into();
        self.registry.edit_text(kind, value.clone())?;
        if kind == ProposalKind::Summary {
            self.store.set_proposed_summary(Some(value));
        }
        Ok(())
    }

    /// Discard the current proposal of `kind`
    ///
    /// # Errors
    /// `WorkflowError::Registry` if the proposal is Applied.
    pub fn discard(&self, kind: ProposalKind) -> Result<(), WorkflowError> {
        self.registry.discard(kind)?;
        if kind == ProposalKind::Summary {
            self.store.set_proposed_summary(None);
        }
        let mut view = self.view.lock();
        if view.active_panel == Some(kind) {
            view.active_panel = None;
        }
        Ok(())
    }

    /// Apply the Ready proposal of `kind`, merging it into canonical
    /// state:
    /// - Rewrite replaces the working text
    /// - Summary becomes the applied summary
    /// - Questions appends the accepted items under the configured heading
    ///
    /// # Errors
    /// `WorkflowError::Registry` unless Ready; `NoSelection` for a
    /// Questions proposal with nothing accepted (store untouched, slot
    /// stays Ready).
    pub fn apply(&self, kind: ProposalKind) -> Result<(), WorkflowError> {
        let payload = self.registry.apply(kind)?;

        match payload {
            ProposalPayload::Rewrite(text) => {
                self.store.replace_working(text);
            }
            ProposalPayload::Summary(text) => {
                self.store.set_applied_summary(text);
                self.store.set_proposed_summary(None);
            }
            ProposalPayload::Questions(items) => {
                let block = render_qa_block(&self.config.qa_heading, &items);
                self.store.append_canonical(&block);
            }
        }

        tracing::info!(%kind, "proposal merged");
        Ok(())
    }

    /// Select the display layout
    pub fn set_view_mode(&self, mode: ViewMode) {
        self.view.lock().mode = mode;
    }

    /// Currently selected layout
    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view.lock().mode
    }

    /// Proposal panel currently in front, if any
    #[must_use]
    pub fn active_panel(&self) -> Option<ProposalKind> {
        self.view.lock().active_panel
    }

    /// The full by-value view for display layers
    #[must_use]
    pub fn snapshot(&self) -> WorkflowSnapshot {
        let view = *self.view.lock();
        WorkflowSnapshot {
            document: self.store.snapshot(),
            proposals: ProposalKind::ALL
                .into_iter()
                .map(|kind| self.registry.snapshot(kind))
                .collect(),
            qa_accepted: self.registry.accepted_count(ProposalKind::Questions),
            view_mode: view.mode,
            active_panel: view.active_panel,
        }
    }
}

impl std::fmt::Debug for WorkflowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Serialize accepted Q&A items into the block appended to canonical text.
///
/// Deterministic: a fixed heading, then each pair in original order.
fn render_qa_block(heading: &str, items: &[QaItem]) -> String {
    let mut block = format!("\n\n{heading}\n");
    for item in items {
        block.push_str("\n**Q:** ");
        block.push_str(&item.question);
        block.push_str("\n**A:** ");
        block.push_str(&item.answer);
        block.push('\n');
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn qa_block_is_deterministic_and_ordered() {
        let items = vec![QaItem::new("What?", "This."), QaItem::new("Why?", "Because.")];

        let block = render_qa_block("## Questions & Answers", &items);
        assert_eq!(
            block,
            "\n\n## Questions & Answers\n\
             \n**Q:** What?\n**A:** This.\n\
             \n**Q:** Why?\n**A:** Because.\n"
        );
        assert_eq!(block, render_qa_block("## Questions & Answers", &items));
    }

    #[test]
    fn qa_block_with_no_items_is_just_the_heading() {
        assert_eq!(render_qa_block("## FAQ", &[]), "\n\n## FAQ\n");
    }
}
