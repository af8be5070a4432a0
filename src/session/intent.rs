//! Operator intents
//!
//! An intent is what the operator asked for; the session turns it into a
//! [`FetchQuery`](crate::adapter::FetchQuery) using its own context (seed,
//! type filter, current view).

use crate::pagination::PageRequest;
use crate::resource::{BrowseTarget, TypeFilter};

/// A request to change what the session shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// List the children of a page, the model types, or a model's instances
    Browse {
        target: BrowseTarget,
        /// First page when absent
        page: Option<PageRequest>,
    },
    /// Full-text search; a blank query browses the root instead
    Search {
        query: String,
        /// Overrides the session's type filter (hierarchical only)
        type_filter: Option<TypeFilter>,
        page: Option<PageRequest>,
    },
    /// Browse `target` from its first page
    Navigate(BrowseTarget),
    /// Re-issue the current browse or search at another position
    ChangePage(PageRequest),
}

impl Intent {
    #[must_use]
    pub const fn browse(target: BrowseTarget) -> Self {
        Self::Browse { target, page: None }
    }

    #[must_use]
    pub fn search(query: impl Into<String>) -> Self {
        Self::Search {
            query: query.into(),
            type_filter: None,
            page: None,
        }
    }
}
