//! Error types for the content store
//!
//! Both errors are recoverable-local: the document is left in its
//! pre-attempt state and the operation may be retried.

/// Save sink rejected a persist attempt. Working text is untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    /// The sink refused the write
    #[error("save rejected: {0}")]
    Rejected(String),

    /// The sink could not be reached
    #[error("save sink unavailable: {0}")]
    Unavailable(String),
}

/// Source extraction failed. Document text is untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The extractor failed on this document
    #[error("extraction failed: {0}")]
    Failed(String),

    /// No source is known for the requested document
    #[error("unknown document: {0}")]
    UnknownDocument(String),
}
