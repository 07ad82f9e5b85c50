//! Workflow configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Bound on each generation; `None` waits indefinitely
    pub generation_timeout: Option<Duration>,
    /// Heading under which accepted Q&A items are merged
    pub qa_heading: String,
    /// Retained edit-history revisions per proposal slot
    pub history_cap: usize,
}

impl WorkflowConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a generation timeout
    #[inline]
    #[must_use]
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = Some(timeout);
        self
    }

    /// With a Q&A merge heading
    #[inline]
    #[must_use]
    pub fn with_qa_heading(mut self, heading: impl Into<String>) -> Self {
        self.qa_heading = heading.into();
        self
    }

    /// With an edit-history cap
    #[inline]
    #[must_use]
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap;
        self
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            generation_timeout: Some(Duration::from_secs(60)),
            qa_heading: "## Questions & Answers".to_string(),
            history_cap: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = WorkflowConfig::new()
            .with_generation_timeout(Duration::from_millis(100))
            .with_qa_heading("## FAQ")
            .with_history_cap(4);

        assert_eq!(config.generation_timeout, Some(Duration::from_millis(100)));
        assert_eq!(config.qa_heading, "## FAQ");
        assert_eq!(config.history_cap, 4);
    }

    #[test]
    fn default_has_a_timeout() {
        assert!(WorkflowConfig::default().generation_timeout.is_some());
    }
}
