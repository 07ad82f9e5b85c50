//! Proposal engine
//!
//! Wraps the abstract inference backend in a typed, kind-attributed
//! generation operation. The engine enforces the result contract (payload
//! shape matches the requested kind, optional timeout) but not
//! single-flight - that is the registry's `Pending` guard. A generation is
//! not cancellable once started; on timeout the in-flight work is
//! abandoned and the expiry surfaces as a `GenerationError`.

use crate::error::{BackendError, GenerationError};
use crate::kind::ProposalKind;
use crate::payload::ProposalPayload;
use std::sync::Arc;
use std::time::Duration;

/// Inference backend collaborator
///
/// Supplied by the surrounding system; produces the payload shape
/// appropriate to the kind (text for Rewrite/Summary, an ordered item list
/// for Questions).
#[async_trait::async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Produce a candidate payload of `kind` from `text`
    async fn infer(&self, kind: ProposalKind, text: &str) -> Result<ProposalPayload, BackendError>;
}

/// Runs generations against an inference backend
pub struct ProposalEngine {
    backend: Arc<dyn InferenceBackend>,
    timeout: Option<Duration>,
}

impl ProposalEngine {
    /// Create an engine with no timeout
    #[must_use]
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            backend,
            timeout: None,
        }
    }

    /// Bound each generation; expiry surfaces as `GenerationError::TimedOut`
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run one generation.
    ///
    /// # Errors
    /// - `GenerationError::Backend` if the backend fails
    /// - `GenerationError::TimedOut` if the configured timeout expires
    /// - `GenerationError::ShapeMismatch` if the payload does not match
    ///   the requested kind
    pub async fn generate(
        &self,
        kind: ProposalKind,
        source_text: &str,
    ) -> Result<ProposalPayload, GenerationError> {
        tracing::info!(%kind, chars = source_text.len(), "generation started");

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.backend.infer(kind, source_text))
                .await
                .map_err(|_| GenerationError::TimedOut {
                    kind,
                    timeout_ms: limit.as_millis() as u64,
                })?,
            None => self.backend.infer(kind, source_text).await,
        };

        let payload = result.map_err(|source| {
            tracing::warn!(%kind, error = %source, "generation failed");
            GenerationError::Backend { kind, source }
        })?;

        if payload.kind() != kind {
            tracing::warn!(%kind, got = %payload.kind(), "payload shape mismatch");
            return Err(GenerationError::ShapeMismatch {
                kind,
                got: payload.kind(),
            });
        }

        tracing::info!(%kind, "generation completed");
        Ok(payload)
    }
}

impl std::fmt::Debug for ProposalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProposalEngine")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::QaItem;

    struct EchoBackend;

    #[async_trait::async_trait]
    impl InferenceBackend for EchoBackend {
        async fn infer(
            &self,
            kind: ProposalKind,
            text: &str,
        ) -> Result<ProposalPayload, BackendError> {
            Ok(match kind {
                ProposalKind::Rewrite => ProposalPayload::Rewrite(format!("rewritten: {text}")),
                ProposalKind::Questions => {
                    ProposalPayload::Questions(vec![QaItem::new("q", text)])
                }
                ProposalKind::Summary => ProposalPayload::Summary(format!("summary: {text}")),
            })
        }
    }

    struct WrongShapeBackend;

    #[async_trait::async_trait]
    impl InferenceBackend for WrongShapeBackend {
        async fn infer(
            &self,
            _kind: ProposalKind,
            _text: &str,
        ) -> Result<ProposalPayload, BackendError> {
            Ok(ProposalPayload::Summary("always a summary".into()))
        }
    }

    struct StalledBackend;

    #[async_trait::async_trait]
    impl InferenceBackend for StalledBackend {
        async fn infer(
            &self,
            _kind: ProposalKind,
            _text: &str,
        ) -> Result<ProposalPayload, BackendError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn generate_returns_typed_payload() {
        let engine = ProposalEngine::new(Arc::new(EchoBackend));
        let payload = engine.generate(ProposalKind::Rewrite, "body").await.unwrap();
        assert_eq!(payload.as_text(), Some("rewritten: body"));
    }

    #[tokio::test]
    async fn generate_rejects_wrong_shape() {
        let engine = ProposalEngine::new(Arc::new(WrongShapeBackend));
        let err = engine
            .generate(ProposalKind::Questions, "body")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::ShapeMismatch {
                kind: ProposalKind::Questions,
                got: ProposalKind::Summary,
            }
        ));
    }

    #[tokio::test]
    async fn generate_surfaces_backend_failure_with_kind() {
        struct FailingBackend;

        #[async_trait::async_trait]
        impl InferenceBackend for FailingBackend {
            async fn infer(
                &self,
                _kind: ProposalKind,
                _text: &str,
            ) -> Result<ProposalPayload, BackendError> {
                Err(BackendError::Failed("model overloaded".into()))
            }
        }

        let engine = ProposalEngine::new(Arc::new(FailingBackend));
        let err = engine
            .generate(ProposalKind::Summary, "body")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ProposalKind::Summary);
    }

    #[tokio::test(start_paused = true)]
    async fn generate_times_out() {
        let engine =
            ProposalEngine::new(Arc::new(StalledBackend)).with_timeout(Duration::from_millis(50));
        let err = engine
            .generate(ProposalKind::Rewrite, "body")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::TimedOut {
                kind: ProposalKind::Rewrite,
                timeout_ms: 50,
            }
        ));
    }
}
