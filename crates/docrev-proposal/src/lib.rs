//! Docrev Proposal - candidate artifacts and their lifecycle
//!
//! Everything between "the user asked for a suggestion" and "the suggestion
//! was merged":
//! - Proposal kinds and typed payloads (rewrite, Q&A set, summary)
//! - The per-kind lifecycle state machine
//! - A keyed registry holding at most one proposal per kind
//! - An async generation engine over an abstract inference backend
//!
//! The registry's `Pending` guard is what keeps generations single-flight
//! per kind; the engine itself never spawns or deduplicates work.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod engine;
pub mod error;
pub mod kind;
pub mod lifecycle;
pub mod payload;
pub mod registry;

pub use engine::{InferenceBackend, ProposalEngine};
pub use error::{BackendError, GenerationError, RegistryError};
pub use kind::ProposalKind;
pub use lifecycle::{allowed_transitions, validate_transition, ProposalState};
pub use payload::{ProposalPayload, QaField, QaItem};
pub use registry::{ProposalRegistry, ProposalSnapshot};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
