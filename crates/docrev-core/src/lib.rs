//! Docrev Core - workflow controller
//!
//! The orchestration layer of the document review workflow:
//! - Routes user intents to the content store and the proposal registry
//! - Enforces one in-flight generation per proposal kind
//! - Merges accepted proposals back into canonical document state
//! - Exposes a by-value snapshot for display layers
//!
//! # Example
//!
//! ```rust,ignore
//! use docrev_core::{WorkflowConfig, WorkflowController};
//! use docrev_proposal::ProposalKind;
//!
//! # async fn example(controller: WorkflowController) -> Result<(), docrev_core::WorkflowError> {
//! controller.edit("# My document");
//! controller.save().await?;
//!
//! controller.request(ProposalKind::Summary).await?;
//! controller.apply(ProposalKind::Summary)?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod snapshot;
pub mod view;

// Re-exports for convenience
pub use config::WorkflowConfig;
pub use controller::WorkflowController;
pub use error::WorkflowError;
pub use snapshot::WorkflowSnapshot;
pub use view::ViewMode;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the docrev workflow
    pub use crate::{ViewMode, WorkflowConfig, WorkflowController, WorkflowError, WorkflowSnapshot};
    pub use docrev_content::{DocumentId, DocumentSnapshot, SummaryState};
    pub use docrev_proposal::{ProposalKind, ProposalPayload, ProposalState, QaField, QaItem};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
