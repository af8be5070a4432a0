//! Resource adapters
//!
//! A resource adapter turns a [`FetchQuery`] into concrete requests against
//! one source endpoint and normalizes the answer into a [`FetchPage`]. The
//! two implementations differ in nearly every detail of the wire protocol,
//! but the session only ever sees this module's types.
//!
//! # Architecture
//!
//! - `pages`: hierarchical pages, offset pagination, ancestor lookup
//! - `models`: flat model records, token pagination, bucket/instance parsing

pub mod models;
pub mod pages;

pub use models::ModelsAdapter;
pub use pages::PagesAdapter;

use crate::api::ApiError;
use crate::pagination::{PageRequest, ResponseMeta};
use crate::resource::{
    BrowseTarget, ModelLabel, PageTypeInfo, ParentContext, ResourceItem, ResourceKind, TypeFilter,
};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Optional restrictions applied to a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchScope {
    /// Page types to search (hierarchical only)
    pub type_filter: Option<TypeFilter>,
    /// Model type to search within (flat only)
    pub model: Option<ModelLabel>,
}

/// One concrete query against a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchQuery {
    Browse {
        target: BrowseTarget,
        page: PageRequest,
    },
    Search {
        query: String,
        scope: SearchScope,
        page: PageRequest,
    },
}

impl FetchQuery {
    /// Pagination position this query asks for
    #[must_use]
    pub const fn page(&self) -> &PageRequest {
        match self {
            Self::Browse { page, .. } | Self::Search { page, .. } => page,
        }
    }
}

/// Normalized result of a successful fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPage {
    /// Items in server order
    pub items: Vec<ResourceItem>,
    /// Total and continuation tokens, as far as the server reported them
    pub meta: ResponseMeta,
    /// Parent and ancestor chain when browsing below the root
    pub parent_context: Option<ParentContext>,
    /// Page type verbose names advertised by the listing
    pub page_types: BTreeMap<String, PageTypeInfo>,
}

/// Uniform query interface over one remote resource kind
#[async_trait]
pub trait ResourceAdapter: Send + Sync {
    /// Resource kind this adapter serves
    fn kind(&self) -> ResourceKind;

    /// Run the query and normalize the response
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` for statuses other than 200, transport failures and
    /// responses missing required fields. Nothing is silently defaulted.
    async fn fetch(&self, query: &FetchQuery) -> Result<FetchPage, ApiError>;
}
