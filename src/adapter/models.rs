//! Flat model adapter
//!
//! ```text
//! GET <endpoint>?models=True[&model=<label>][&page=<token>]
//! GET <endpoint>?models=True[&model=<label>]&search=<q>[&page=<token>]
//! ```
//!
//! Without a model label the endpoint lists the available model types;
//! each comes back as a bucket. With a label it lists instances. Whether a
//! record is a bucket or an instance is decided once, here, by the presence
//! of an `id`.

use super::{FetchPage, FetchQuery, ResourceAdapter};
use crate::api::{self, ApiError, ApiRequest, HttpTransport};
use crate::pagination::{PageRequest, PageToken, ResponseMeta};
use crate::resource::{
    BrowseTarget, InstanceId, ModelBucket, ModelEntry, ModelInstance, ModelLabel, ResourceItem,
    ResourceKind,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct ModelListing {
    items: Vec<WireModelEntry>,
    meta: ModelListingMeta,
}

#[derive(Debug, Deserialize)]
struct ModelListingMeta {
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default, alias = "next_token")]
    next_page: Option<WireToken>,
    #[serde(default, alias = "previous_token")]
    prev_page: Option<WireToken>,
}

/// Tokens are strings or numbers depending on the server generation
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireToken {
    Number(serde_json::Number),
    Text(String),
}

impl From<WireToken> for PageToken {
    fn from(token: WireToken) -> Self {
        match token {
            WireToken::Number(n) => Self::new(n.to_string()),
            WireToken::Text(s) => Self::new(s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(u64),
    Text(String),
}

impl From<WireId> for InstanceId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => Self::Number(n),
            WireId::Text(s) => Self::Text(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireModelEntry {
    #[serde(default)]
    id: Option<WireId>,
    #[serde(default)]
    model_label: Option<String>,
    #[serde(default)]
    object_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl WireModelEntry {
    /// Resolve into a bucket or an instance
    ///
    /// Instances without their own `model_label` inherit `scope`, the model
    /// the request was restricted to.
    fn into_entry(self, scope: Option<&ModelLabel>) -> Result<ModelEntry, ApiError> {
        let label = self
            .model_label
            .map(ModelLabel::new)
            .or_else(|| scope.cloned());

        match self.id {
            Some(id) => {
                let label = label.ok_or_else(|| {
                    ApiError::malformed("model instance without a model label")
                })?;
                let name = self
                    .object_name
                    .or(self.name)
                    .ok_or_else(|| ApiError::malformed(format!("model instance {label} has no name")))?;
                Ok(ModelEntry::Instance(ModelInstance {
                    label,
                    id: id.into(),
                    name,
                }))
            }
            None => {
                let label =
                    label.ok_or_else(|| ApiError::malformed("model type without a label"))?;
                let name = self
                    .name
                    .or(self.object_name)
                    .ok_or_else(|| ApiError::malformed(format!("model type {label} has no name")))?;
                Ok(ModelEntry::Bucket(ModelBucket { label, name }))
            }
        }
    }
}

// ============================================================================
// Adapter
// ============================================================================

/// Adapter for the flat model endpoint
#[derive(Clone)]
pub struct ModelsAdapter {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl ModelsAdapter {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    /// Model types (no label) or instances of one model type
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails or any record is malformed.
    pub async fn list_instances(
        &self,
        model: Option<&ModelLabel>,
        token: Option<&PageToken>,
    ) -> Result<FetchPage, ApiError> {
        let request = self.request(model, None, token);
        self.listing(&request, model).await
    }

    /// Instances matching `query`, optionally within one model type
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails or any record is malformed.
    pub async fn search_instances(
        &self,
        query: &str,
        model: Option<&ModelLabel>,
        token: Option<&PageToken>,
    ) -> Result<FetchPage, ApiError> {
        let request = self.request(model, Some(query), token);
        self.listing(&request, model).await
    }

    fn request(
        &self,
        model: Option<&ModelLabel>,
        search: Option<&str>,
        token: Option<&PageToken>,
    ) -> ApiRequest {
        let mut request = ApiRequest::new(&self.endpoint).param("models", "True");
        if let Some(model) = model {
            request = request.param("model", model.as_str());
        }
        if let Some(search) = search {
            request = request.param("search", search);
        }
        if let Some(token) = token {
            request = request.param("page", token.as_str());
        }
        request
    }

    async fn listing(
        &self,
        request: &ApiRequest,
        scope: Option<&ModelLabel>,
    ) -> Result<FetchPage, ApiError> {
        let response = self.transport.get(request).await?;
        let listing: ModelListing = api::decode_response(response)?;

        let items = listing
            .items
            .into_iter()
            .map(|entry| entry.into_entry(scope).map(ResourceItem::Model))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FetchPage {
            items,
            meta: ResponseMeta {
                total_count: listing.meta.total_count,
                next: listing.meta.next_page.map(Into::into),
                previous: listing.meta.prev_page.map(Into::into),
            },
            parent_context: None,
            page_types: BTreeMap::new(),
        })
    }
}

#[async_trait]
impl ResourceAdapter for ModelsAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Flat
    }

    async fn fetch(&self, query: &FetchQuery) -> Result<FetchPage, ApiError> {
        let PageRequest::Token(token) = query.page() else {
            return Err(ApiError::Unsupported(
                "model listings are paginated by token".to_string(),
            ));
        };

        match query {
            FetchQuery::Browse {
                target: BrowseTarget::Root,
                ..
            } => self.list_instances(None, token.as_ref()).await,
            FetchQuery::Browse {
                target: BrowseTarget::Model(label),
                ..
            } => self.list_instances(Some(label), token.as_ref()).await,
            FetchQuery::Browse {
                target: BrowseTarget::Page(id),
                ..
            } => Err(ApiError::Unsupported(format!(
                "cannot browse page {id} in the model listing"
            ))),
            FetchQuery::Search { query, scope, .. } => {
                self.search_instances(query, scope.model.as_ref(), token.as_ref())
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SearchScope;
    use crate::api::ApiResponse;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    const ENDPOINT: &str = "https://source.example.com/api/chooser/models/";

    #[derive(Default)]
    struct StubTransport {
        responses: Mutex<VecDeque<ApiResponse>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl StubTransport {
        async fn push(&self, body: &str) {
            self.responses.lock().await.push_back(ApiResponse::ok(body));
        }
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
            self.requests.lock().await.push(request.clone());
            self.responses
                .lock()
                .await
                .pop_front()
                .ok_or_else(|| ApiError::Transport("stub transport has no more queued responses".into()))
        }
    }

    fn adapter() -> (ModelsAdapter, Arc<StubTransport>) {
        let transport = Arc::new(StubTransport::default());
        (ModelsAdapter::new(transport.clone(), ENDPOINT), transport)
    }

    #[tokio::test]
    async fn test_root_listing_yields_buckets() {
        let (adapter, transport) = adapter();
        transport
            .push(r#"{"meta": {"total_count": 1}, "items": [{"model_label": "tests.category", "name": "Category"}]}"#)
            .await;

        let page = adapter.list_instances(None, None).await.unwrap();

        assert_eq!(
            page.items,
            vec![ResourceItem::Model(ModelEntry::Bucket(ModelBucket {
                label: ModelLabel::new("tests.category"),
                name: "Category".into(),
            }))]
        );
        assert_eq!(page.meta.total_count, Some(1));

        let requests = transport.requests.lock().await;
        assert_eq!(requests[0].get_param("models"), Some("True"));
        assert_eq!(requests[0].get_param("model"), None);
        assert_eq!(requests[0].get_param("page"), None);
    }

    #[tokio::test]
    async fn test_instance_listing_inherits_scope_and_tokens() {
        let (adapter, transport) = adapter();
        transport
            .push(
                r#"{"meta": {"next_page": 3, "prev_page": 1},
                    "items": [{"id": 7, "object_name": "Red"}, {"id": "uuid-1", "name": "Blue"}]}"#,
            )
            .await;
        let label = ModelLabel::new("tests.category");

        let page = adapter
            .list_instances(Some(&label), Some(&PageToken::new("2")))
            .await
            .unwrap();

        assert_eq!(page.meta.total_count, None);
        assert_eq!(page.meta.next, Some(PageToken::new("3")));
        assert_eq!(page.meta.previous, Some(PageToken::new("1")));
        assert_eq!(
            page.items[0],
            ResourceItem::Model(ModelEntry::Instance(ModelInstance {
                label: label.clone(),
                id: InstanceId::Number(7),
                name: "Red".into(),
            }))
        );
        assert_eq!(
            page.items[1],
            ResourceItem::Model(ModelEntry::Instance(ModelInstance {
                label: label.clone(),
                id: InstanceId::Text("uuid-1".into()),
                name: "Blue".into(),
            }))
        );

        let requests = transport.requests.lock().await;
        assert_eq!(requests[0].get_param("model"), Some("tests.category"));
        assert_eq!(requests[0].get_param("page"), Some("2"));
    }

    #[tokio::test]
    async fn test_token_aliases_are_accepted() {
        let (adapter, transport) = adapter();
        transport
            .push(r#"{"meta": {"next_token": "opaque==", "previous_token": null}, "items": []}"#)
            .await;

        let page = adapter.list_instances(None, None).await.unwrap();
        assert_eq!(page.meta.next, Some(PageToken::new("opaque==")));
        assert_eq!(page.meta.previous, None);
    }

    #[tokio::test]
    async fn test_search_is_scoped_to_model() {
        let (adapter, transport) = adapter();
        transport
            .push(r#"{"meta": {"total_count": 0}, "items": []}"#)
            .await;
        let query = FetchQuery::Search {
            query: "red".into(),
            scope: SearchScope {
                type_filter: None,
                model: Some(ModelLabel::new("tests.category")),
            },
            page: PageRequest::Token(None),
        };

        adapter.fetch(&query).await.unwrap();

        let requests = transport.requests.lock().await;
        assert_eq!(requests[0].get_param("search"), Some("red"));
        assert_eq!(requests[0].get_param("model"), Some("tests.category"));
    }

    #[tokio::test]
    async fn test_instance_without_label_is_malformed() {
        let (adapter, transport) = adapter();
        transport
            .push(r#"{"meta": {}, "items": [{"id": 1, "object_name": "Orphan"}]}"#)
            .await;

        let result = adapter.list_instances(None, None).await;
        assert!(matches!(result, Err(ApiError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_missing_meta_is_malformed() {
        let (adapter, transport) = adapter();
        transport.push(r#"{"items": []}"#).await;

        let result = adapter.list_instances(None, None).await;
        assert!(matches!(result, Err(ApiError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_rejects_offset_requests() {
        let (adapter, transport) = adapter();
        let query = FetchQuery::Browse {
            target: BrowseTarget::Root,
            page: PageRequest::Offset { page_number: 1 },
        };

        assert!(matches!(
            adapter.fetch(&query).await,
            Err(ApiError::Unsupported(_))
        ));
        assert!(transport.requests.lock().await.is_empty());
    }
}
