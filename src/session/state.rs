//! Browse state
//!
//! [`BrowseState`] is immutable once built. Every transition derives a new
//! value from the previous one, and the session swaps it in whole, so a
//! reader holding an `Arc<BrowseState>` never observes a half-applied
//! transition.

use crate::adapter::{FetchPage, SearchScope};
use crate::api::{ApiError, ErrorKind};
use crate::pagination::{Navigation, PageRequest, PaginationCursor, PaginationStyle};
use crate::resource::{BrowseTarget, PageTypeInfo, ParentContext, ResourceItem, ResourceKind};
use std::collections::BTreeMap;

/// Which presentation the state drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Browse,
    Search,
    Error,
}

/// Mode-specific context of the last issued intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOptions {
    Browse { target: BrowseTarget },
    Search { query: String, scope: SearchScope },
}

impl ViewOptions {
    /// Mode this context selects when no error is present
    #[must_use]
    pub const fn mode(&self) -> ViewMode {
        match self {
            Self::Browse { .. } => ViewMode::Browse,
            Self::Search { .. } => ViewMode::Search,
        }
    }
}

/// The last fetch failure, as shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ApiError> for FetchFailure {
    fn from(error: &ApiError) -> Self {
        Self {
            kind: error.kind(),
            message: error.user_message(),
        }
    }
}

/// Everything the views need to render one chooser session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    pub view_mode: ViewMode,
    pub view_options: ViewOptions,
    /// Results in server order
    pub items: Vec<ResourceItem>,
    /// Page being browsed and its ancestors, absent at the root and in search
    pub parent_context: Option<ParentContext>,
    /// Known total; always present for offset pagination after a fetch
    pub total_count: Option<u64>,
    /// Page type names collected from every listing so far
    pub page_types: BTreeMap<String, PageTypeInfo>,
    pub is_fetching: bool,
    pub error: Option<FetchFailure>,
    pub cursor: PaginationCursor,
}

impl BrowseState {
    /// Fresh state for a session browsing `kind`, pointed at `seed`
    #[must_use]
    pub fn new(kind: ResourceKind, seed: BrowseTarget) -> Self {
        Self {
            view_mode: ViewMode::Browse,
            view_options: ViewOptions::Browse { target: seed },
            items: Vec::new(),
            parent_context: None,
            total_count: None,
            page_types: BTreeMap::new(),
            is_fetching: false,
            error: None,
            cursor: PaginationCursor::initial(kind.into()),
        }
    }

    #[must_use]
    pub const fn pagination_style(&self) -> PaginationStyle {
        self.cursor.style()
    }

    #[must_use]
    pub const fn navigation(&self) -> Navigation {
        self.cursor.navigation()
    }

    /// Error message, if the last fetch failed
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|failure| failure.message.as_str())
    }

    /// Browse target of the current browse context
    #[must_use]
    pub const fn browse_target(&self) -> Option<&BrowseTarget> {
        match &self.view_options {
            ViewOptions::Browse { target } => Some(target),
            ViewOptions::Search { .. } => None,
        }
    }

    /// State after an intent was issued
    pub(crate) fn fetching(&self, options: ViewOptions) -> Self {
        Self {
            view_mode: options.mode(),
            view_options: options,
            is_fetching: true,
            error: None,
            ..self.clone()
        }
    }

    /// State after the latest request succeeded
    pub(crate) fn succeeded(&self, request: &PageRequest, page: FetchPage) -> Self {
        let mut page_types = self.page_types.clone();
        page_types.extend(page.page_types);

        Self {
            view_mode: self.view_options.mode(),
            view_options: self.view_options.clone(),
            items: page.items,
            parent_context: page.parent_context,
            total_count: page.meta.total_count,
            page_types,
            is_fetching: false,
            error: None,
            cursor: PaginationCursor::after_response(request, &page.meta),
        }
    }

    /// State after the latest request failed
    ///
    /// Items are cleared and the total drops to zero where totals exist at
    /// all. The cursor and parent context are kept so the operator can retry
    /// from where they were.
    pub(crate) fn failed(&self, error: &ApiError) -> Self {
        let total_count = match self.cursor.style() {
            PaginationStyle::Offset => Some(0),
            PaginationStyle::Token => None,
        };

        Self {
            view_mode: ViewMode::Error,
            items: Vec::new(),
            total_count,
            is_fetching: false,
            error: Some(error.into()),
            ..self.clone()
        }
    }
}
