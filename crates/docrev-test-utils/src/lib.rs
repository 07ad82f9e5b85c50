//! Testing utilities for the docrev workspace
//!
//! Fake implementations of the three external collaborators, with failure
//! injection and gating so tests can hold an async operation in flight.

#![allow(missing_docs)]

use docrev_content::{DocumentId, ExtractError, SaveError, SaveSink, SourceExtractor};
use docrev_proposal::{BackendError, InferenceBackend, ProposalKind, ProposalPayload, QaItem};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Extractor returning a configurable text, with failure injection.
pub struct StubExtractor {
    text: Mutex<String>,
    fail_next: AtomicBool,
}

impl StubExtractor {
    pub fn new(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            text: Mutex::new(text.into()),
            fail_next: AtomicBool::new(false),
        })
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.lock() = text.into();
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl SourceExtractor for StubExtractor {
    async fn extract(&self, _id: DocumentId) -> Result<String, ExtractError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ExtractError::Failed("injected".to_string()));
        }
        Ok(self.text.lock().clone())
    }
}

/// In-memory save sink recording every persisted text, with failure
/// injection and optional gating (persist blocks until `release`).
pub struct MemorySink {
    saved: Mutex<Vec<(DocumentId, String)>>,
    attempts: AtomicUsize,
    fail_next: AtomicBool,
    gate: Option<Semaphore>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            saved: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
            gate: None,
        })
    }

    /// A sink whose `persist` blocks until a permit is released
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            saved: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
            gate: Some(Semaphore::new(0)),
        })
    }

    /// Number of `persist` calls seen, including blocked and failed ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn saved(&self) -> Vec<(DocumentId, String)> {
        self.saved.lock().clone()
    }

    pub fn last_saved(&self) -> Option<String> {
        self.saved.lock().last().map(|(_, text)| text.clone())
    }
}

#[async_trait::async_trait]
impl SaveSink for MemorySink {
    async fn persist(&self, id: DocumentId, text: &str) -> Result<(), SaveError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("sink gate closed");
            permit.forget();
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SaveError::Rejected("injected".to_string()));
        }
        self.saved.lock().push((id, text.to_string()));
        Ok(())
    }
}

/// Inference backend with scripted responses per kind, call counting, and
/// optional gating so a generation can be held in flight.
///
/// With no scripted response, a deterministic default payload is derived
/// from the kind and the input text.
pub struct StubBackend {
    responses: Mutex<HashMap<ProposalKind, VecDeque<Result<ProposalPayload, BackendError>>>>,
    calls: Mutex<HashMap<ProposalKind, usize>>,
    gate: Option<Semaphore>,
}

impl StubBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            gate: None,
        })
    }

    /// A backend whose `infer` blocks until a permit is released
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            gate: Some(Semaphore::new(0)),
        })
    }

    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Queue the next result for `kind`
    pub fn enqueue(&self, kind: ProposalKind, result: Result<ProposalPayload, BackendError>) {
        self.responses.lock().entry(kind).or_default().push_back(result);
    }

    /// Number of `infer` calls seen for `kind`
    pub fn calls(&self, kind: ProposalKind) -> usize {
        self.calls.lock().get(&kind).copied().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl InferenceBackend for StubBackend {
    async fn infer(&self, kind: ProposalKind, text: &str) -> Result<ProposalPayload, BackendError> {
        *self.calls.lock().entry(kind).or_insert(0) += 1;

        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("backend gate closed");
            permit.forget();
        }

        if let Some(scripted) = self.responses.lock().entry(kind).or_default().pop_front() {
            return scripted;
        }

        Ok(default_payload(kind, text))
    }
}

/// Deterministic payload for `kind` derived from the input text
pub fn default_payload(kind: ProposalKind, text: &str) -> ProposalPayload {
    match kind {
        ProposalKind::Rewrite => ProposalPayload::Rewrite(format!("improved: {text}")),
        ProposalKind::Questions => ProposalPayload::Questions(
            (0..4)
                .map(|i| QaItem::new(format!("question {i}"), format!("answer {i}")))
                .collect(),
        ),
        ProposalKind::Summary => ProposalPayload::Summary(format!("summary ({} chars)", text.len())),
    }
}
