//! Docrev Content - canonical document state
//!
//! Owns the document under review:
//! - Canonical, working, and pristine text with dirty tracking
//! - Summary state (applied vs. proposed candidate)
//! - Asynchronous save and source re-extraction flows
//!
//! The store is the single owner of document state. Display layers read
//! by-value snapshots; the workflow layer mutates through the operations
//! defined here. No lock is held across an await point.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod document;
pub mod error;
pub mod store;

pub use document::{Document, DocumentId, DocumentSnapshot, SummaryState};
pub use error::{ExtractError, SaveError};
pub use store::{ContentStore, SaveSink, SourceExtractor};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
