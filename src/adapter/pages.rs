//! Hierarchical page adapter
//!
//! Talks to the page listing endpoint:
//!
//! ```text
//! GET <endpoint>?child_of=<id|root>&fields=parent,children&limit=20&offset=N
//! GET <endpoint><id>/?fields=ancestors
//! GET <endpoint>?search=<q>&fields=parent[&type=a.b,c.d]&limit=20&offset=N
//! ```
//!
//! The tree root has no record on the server, so browsing it skips the
//! ancestor lookup and leaves the parent context empty.

use super::{FetchPage, FetchQuery, ResourceAdapter, SearchScope};
use crate::api::{self, ApiError, ApiRequest, HttpTransport};
use crate::pagination::{PAGE_SIZE, PageRequest, ResponseMeta};
use crate::resource::{
    BrowseTarget, PageId, PageRecord, PageStatus, PageSummary, PageTypeInfo, ParentContext,
    ResourceItem, ResourceKind,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct PageListing {
    items: Vec<WirePage>,
    meta: ListingMeta,
    #[serde(default, rename = "__types")]
    types: BTreeMap<String, PageTypeInfo>,
}

#[derive(Debug, Deserialize)]
struct ListingMeta {
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct WirePage {
    id: u64,
    title: String,
    meta: WirePageMeta,
}

#[derive(Debug, Deserialize)]
struct WirePageMeta {
    #[serde(rename = "type")]
    page_type: String,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    status: Option<WireStatus>,
    #[serde(default)]
    children: Option<WireChildren>,
    #[serde(default)]
    latest_revision_created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct WireStatus {
    status: String,
    live: bool,
}

#[derive(Debug, Deserialize)]
struct WireChildren {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct PageDetail {
    id: u64,
    title: String,
    meta: PageDetailMeta,
}

#[derive(Debug, Deserialize)]
struct PageDetailMeta {
    #[serde(default, rename = "type")]
    page_type: Option<String>,
    ancestors: Vec<WireAncestor>,
}

#[derive(Debug, Deserialize)]
struct WireAncestor {
    id: u64,
    title: String,
    #[serde(default)]
    meta: Option<WireAncestorMeta>,
}

#[derive(Debug, Deserialize)]
struct WireAncestorMeta {
    #[serde(default, rename = "type")]
    page_type: Option<String>,
}

impl From<WirePage> for PageRecord {
    fn from(page: WirePage) -> Self {
        Self {
            id: PageId(page.id),
            title: page.title,
            page_type: page.meta.page_type,
            html_url: page.meta.html_url,
            status: page.meta.status.map(|status| PageStatus {
                label: status.status,
                live: status.live,
            }),
            child_count: page.meta.children.map_or(0, |children| children.count),
            last_revision_at: page.meta.latest_revision_created_at,
        }
    }
}

impl From<WireAncestor> for PageSummary {
    fn from(ancestor: WireAncestor) -> Self {
        Self {
            id: PageId(ancestor.id),
            title: ancestor.title,
            page_type: ancestor.meta.and_then(|meta| meta.page_type),
        }
    }
}

impl From<PageDetail> for ParentContext {
    fn from(detail: PageDetail) -> Self {
        Self {
            page: PageSummary {
                id: PageId(detail.id),
                title: detail.title,
                page_type: detail.meta.page_type,
            },
            ancestors: detail.meta.ancestors.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Adapter
// ============================================================================

/// Adapter for the hierarchical page endpoint
#[derive(Clone)]
pub struct PagesAdapter {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl PagesAdapter {
    /// Create an adapter for `endpoint` (absolute URL, trailing slash)
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    /// Children of `parent`, plus its ancestor chain when it is not the root
    ///
    /// # Errors
    ///
    /// Fails if either request fails; the two run concurrently and the first
    /// error wins.
    pub async fn list_children(
        &self,
        parent: Option<PageId>,
        page_number: u32,
    ) -> Result<FetchPage, ApiError> {
        let child_of = parent.map_or_else(|| "root".to_string(), |id| id.to_string());
        let request = self.paged(
            ApiRequest::new(&self.endpoint)
                .param("child_of", child_of)
                .param("fields", "parent,children"),
            page_number,
        );

        let Some(parent_id) = parent else {
            return self.listing(&request).await;
        };

        let (mut page, parent_context) =
            tokio::try_join!(self.listing(&request), self.ancestors(parent_id))?;
        page.parent_context = Some(parent_context);
        Ok(page)
    }

    /// Full-text search over all pages, optionally restricted by type
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails or the body is malformed.
    pub async fn search_pages(
        &self,
        query: &str,
        scope: &SearchScope,
        page_number: u32,
    ) -> Result<FetchPage, ApiError> {
        let mut request = ApiRequest::new(&self.endpoint)
            .param("search", query)
            .param("fields", "parent");
        if let Some(filter) = &scope.type_filter {
            request = request.param("type", filter.to_query_value());
        }
        let request = self.paged(request, page_number);

        self.listing(&request).await
    }

    fn paged(&self, request: ApiRequest, page_number: u32) -> ApiRequest {
        request
            .param("limit", PAGE_SIZE.to_string())
            .param(
                "offset",
                PageRequest::item_offset(page_number, PAGE_SIZE).to_string(),
            )
    }

    async fn listing(&self, request: &ApiRequest) -> Result<FetchPage, ApiError> {
        let response = self.transport.get(request).await?;
        let listing: PageListing = api::decode_response(response)?;

        Ok(FetchPage {
            items: listing
                .items
                .into_iter()
                .map(|page| ResourceItem::Page(page.into()))
                .collect(),
            meta: ResponseMeta {
                total_count: Some(listing.meta.total_count),
                next: None,
                previous: None,
            },
            parent_context: None,
            page_types: listing.types,
        })
    }

    async fn ancestors(&self, id: PageId) -> Result<ParentContext, ApiError> {
        let request =
            ApiRequest::new(format!("{}{id}/", self.endpoint)).param("fields", "ancestors");
        let response = self.transport.get(&request).await?;
        let detail: PageDetail = api::decode_response(response)?;
        Ok(detail.into())
    }
}

#[async_trait]
impl ResourceAdapter for PagesAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Hierarchical
    }

    async fn fetch(&self, query: &FetchQuery) -> Result<FetchPage, ApiError> {
        let PageRequest::Offset { page_number } = *query.page() else {
            return Err(ApiError::Unsupported(
                "page listings are paginated by page number".to_string(),
            ));
        };

        match query {
            FetchQuery::Browse {
                target: BrowseTarget::Root,
                ..
            } => self.list_children(None, page_number).await,
            FetchQuery::Browse {
                target: BrowseTarget::Page(id),
                ..
            } => self.list_children(Some(*id), page_number).await,
            FetchQuery::Browse {
                target: BrowseTarget::Model(label),
                ..
            } => Err(ApiError::Unsupported(format!(
                "cannot browse model type `{label}` in the page tree"
            ))),
            FetchQuery::Search { query, scope, .. } => {
                self.search_pages(query, scope, page_number).await
            }
        }
    }
}
