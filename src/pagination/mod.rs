//! Pagination engine
//!
//! Pure cursor arithmetic for the two pagination protocols. No I/O happens
//! here: the session feeds in the request it just completed plus the
//! response metadata and gets back the new cursor and its navigation flags.
//!
//! # Protocols
//!
//! - **Offset** (pages): 1-based page number, fixed page size of
//!   [`PAGE_SIZE`], total known from the server's `total_count`.
//! - **Token** (models): opaque next/previous tokens handed out by the
//!   server. Only their presence matters; their content is sent back
//!   verbatim and never inspected.

use crate::resource::ResourceKind;
use std::fmt;

/// Fixed page size for offset pagination
pub const PAGE_SIZE: u32 = 20;

/// Opaque continuation token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageToken(String);

impl PageToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which protocol a session paginates with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    Offset,
    Token,
}

impl From<ResourceKind> for PaginationStyle {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Hierarchical => Self::Offset,
            ResourceKind::Flat => Self::Token,
        }
    }
}

/// Position to request from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// 1-based page number
    Offset { page_number: u32 },
    /// `None` requests the first page
    Token(Option<PageToken>),
}

impl PageRequest {
    /// First page for the given protocol
    #[must_use]
    pub const fn first(style: PaginationStyle) -> Self {
        match style {
            PaginationStyle::Offset => Self::Offset { page_number: 1 },
            PaginationStyle::Token => Self::Token(None),
        }
    }

    #[must_use]
    pub const fn style(&self) -> PaginationStyle {
        match self {
            Self::Offset { .. } => PaginationStyle::Offset,
            Self::Token(_) => PaginationStyle::Token,
        }
    }

    /// Zero-based item offset for offset requests
    #[must_use]
    pub const fn item_offset(page_number: u32, page_size: u32) -> u64 {
        page_number.saturating_sub(1) as u64 * page_size as u64
    }
}

/// Metadata the engine needs from a completed fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    pub total_count: Option<u64>,
    pub next: Option<PageToken>,
    pub previous: Option<PageToken>,
}

/// Offset cursor state after a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetCursor {
    pub page_number: u32,
    pub page_size: u32,
    /// ceil(total_count / page_size)
    pub total_pages: u32,
}

impl OffsetCursor {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }
}

/// Token cursor state after a fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCursor {
    pub next: Option<PageToken>,
    pub previous: Option<PageToken>,
}

/// Enable/disable state for previous/next controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    pub has_previous: bool,
    pub has_next: bool,
}

/// Current pagination position of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationCursor {
    Offset(OffsetCursor),
    Token(TokenCursor),
}

impl PaginationCursor {
    /// Cursor before anything has been fetched
    #[must_use]
    pub const fn initial(style: PaginationStyle) -> Self {
        match style {
            PaginationStyle::Offset => Self::Offset(OffsetCursor {
                page_number: 1,
                page_size: PAGE_SIZE,
                total_pages: 0,
            }),
            PaginationStyle::Token => Self::Token(TokenCursor {
                next: None,
                previous: None,
            }),
        }
    }

    /// Cursor after `request` completed with `meta`
    ///
    /// Offset cursors take the page number from the request and derive the
    /// page count from the total. Token cursors are replaced wholesale by
    /// the tokens of the response.
    #[must_use]
    pub fn after_response(request: &PageRequest, meta: &ResponseMeta) -> Self {
        match request {
            PageRequest::Offset { page_number } => {
                let total = meta.total_count.unwrap_or(0);
                let pages = total.div_ceil(u64::from(PAGE_SIZE));
                Self::Offset(OffsetCursor {
                    page_number: (*page_number).max(1),
                    page_size: PAGE_SIZE,
                    total_pages: u32::try_from(pages).unwrap_or(u32::MAX),
                })
            }
            PageRequest::Token(_) => Self::Token(TokenCursor {
                next: meta.next.clone(),
                previous: meta.previous.clone(),
            }),
        }
    }

    #[must_use]
    pub const fn style(&self) -> PaginationStyle {
        match self {
            Self::Offset(_) => PaginationStyle::Offset,
            Self::Token(_) => PaginationStyle::Token,
        }
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        match self {
            Self::Offset(cursor) => cursor.has_previous(),
            Self::Token(cursor) => cursor.previous.is_some(),
        }
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        match self {
            Self::Offset(cursor) => cursor.has_next(),
            Self::Token(cursor) => cursor.next.is_some(),
        }
    }

    #[must_use]
    pub const fn navigation(&self) -> Navigation {
        Navigation {
            has_previous: self.has_previous(),
            has_next: self.has_next(),
        }
    }

    /// Request for the following page, if there is one
    #[must_use]
    pub fn next_request(&self) -> Option<PageRequest> {
        match self {
            Self::Offset(cursor) if cursor.has_next() => Some(PageRequest::Offset {
                page_number: cursor.page_number + 1,
            }),
            Self::Token(cursor) => cursor
                .next
                .clone()
                .map(|token| PageRequest::Token(Some(token))),
            Self::Offset(_) => None,
        }
    }

    /// Request for the preceding page, if there is one
    #[must_use]
    pub fn previous_request(&self) -> Option<PageRequest> {
        match self {
            Self::Offset(cursor) if cursor.has_previous() => Some(PageRequest::Offset {
                page_number: cursor.page_number - 1,
            }),
            Self::Token(cursor) => cursor
                .previous
                .clone()
                .map(|token| PageRequest::Token(Some(token))),
            Self::Offset(_) => None,
        }
    }
}
