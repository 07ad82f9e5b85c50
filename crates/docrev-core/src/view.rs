//! Display-layer view flags
//!
//! Inert state with no invariants: the display layer reads these to decide
//! what to render, the core only stores them.

use serde::{Deserialize, Serialize};

/// Layout selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    /// Source pages and editor side by side
    #[default]
    SideBySide,
    /// Source pages only
    SourceOnly,
    /// Editor only
    EditorOnly,
    /// Extracted page images
    PageImages,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_side_by_side() {
        assert_eq!(ViewMode::default(), ViewMode::SideBySide);
    }
}
