//! Chooser session controller
//!
//! [`ChooserSession`] owns the browse state of one chooser invocation and
//! mediates every adapter call. Fetches are split into three steps so they
//! can overlap:
//!
//! 1. [`ChooserSession::begin`] validates the intent, moves the state into
//!    fetching and hands out a [`PendingFetch`] stamped with a sequence
//!    number.
//! 2. [`PendingFetch::run`] performs the I/O. It borrows nothing from the
//!    session and can be spawned.
//! 3. [`ChooserSession::complete`] applies the result, but only if its
//!    sequence number is still the latest one issued. Older responses are
//!    discarded on arrival.
//!
//! [`ChooserSession::dispatch`] chains the three for callers that await
//! one intent at a time.

use super::error::SessionError;
use super::intent::Intent;
use super::state::{BrowseState, ViewOptions};
use crate::adapter::{FetchPage, FetchQuery, ResourceAdapter, SearchScope};
use crate::api::ApiError;
use crate::pagination::{PageRequest, PaginationStyle};
use crate::resource::{
    BrowseTarget, ChosenItem, ModelEntry, PageId, ResourceItem, ResourceKind, TypeFilter,
};
use crate::selection::{self, SelectionEmitter};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tree root id used when none is configured
pub const DEFAULT_ROOT_PAGE_ID: PageId = PageId(1);

/// Caller-supplied context of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Where browsing starts
    pub seed: BrowseTarget,
    /// Page types that may be chosen (hierarchical only)
    pub type_filter: Option<TypeFilter>,
    /// Page id that stands for the tree root
    pub root_page_id: PageId,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: BrowseTarget::Root,
            type_filter: None,
            root_page_id: DEFAULT_ROOT_PAGE_ID,
        }
    }
}

/// Whether a completion changed the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Superseded by a newer intent, or the session is closed
    Discarded,
}

/// Result of choosing a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The row was a model type; the session browsed into it instead
    Navigated(Arc<BrowseState>),
    Chosen(ChosenItem),
}

/// An issued fetch awaiting execution
pub struct PendingFetch {
    seq: u64,
    query: FetchQuery,
    adapter: Arc<dyn ResourceAdapter>,
}

impl PendingFetch {
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub const fn query(&self) -> &FetchQuery {
        &self.query
    }

    /// Perform the request
    pub async fn run(self) -> FetchCompletion {
        let result = self.adapter.fetch(&self.query).await;
        FetchCompletion {
            seq: self.seq,
            request: self.query.page().clone(),
            result,
        }
    }
}

impl std::fmt::Debug for PendingFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingFetch")
            .field("seq", &self.seq)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

/// A finished fetch, ready to be applied
#[derive(Debug)]
pub struct FetchCompletion {
    seq: u64,
    request: PageRequest,
    result: Result<FetchPage, ApiError>,
}

impl FetchCompletion {
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// One chooser invocation: browse state, fencing and the selection emitter
pub struct ChooserSession {
    adapter: Arc<dyn ResourceAdapter>,
    kind: ResourceKind,
    config: SessionConfig,
    state: Arc<BrowseState>,
    latest_seq: u64,
    emitter: SelectionEmitter,
}

impl ChooserSession {
    /// Create a session over `adapter`; nothing is fetched until
    /// [`start`](Self::start) or another intent is issued
    #[must_use]
    pub fn new(
        adapter: Arc<dyn ResourceAdapter>,
        emitter: SelectionEmitter,
        mut config: SessionConfig,
    ) -> Self {
        let kind = adapter.kind();
        config.seed = alias_root(kind, config.root_page_id, config.seed);
        let state = Arc::new(BrowseState::new(kind, config.seed.clone()));

        Self {
            adapter,
            kind,
            config,
            state,
            latest_seq: 0,
            emitter,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Current state snapshot
    #[must_use]
    pub fn state(&self) -> Arc<BrowseState> {
        Arc::clone(&self.state)
    }

    #[must_use]
    pub const fn type_filter(&self) -> Option<&TypeFilter> {
        self.config.type_filter.as_ref()
    }

    #[must_use]
    pub const fn root_page_id(&self) -> PageId {
        self.config.root_page_id
    }

    #[must_use]
    pub const fn seed(&self) -> &BrowseTarget {
        &self.config.seed
    }

    /// Sequence number of the most recently issued intent
    #[must_use]
    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// True once an item was chosen or the session was cancelled
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.emitter.is_closed()
    }

    // ------------------------------------------------------------------------
    // Fetch lifecycle
    // ------------------------------------------------------------------------

    /// Issue `intent`: the state enters fetching and the returned fetch
    /// supersedes every earlier one
    ///
    /// # Errors
    ///
    /// Returns `Closed` after the session ended, and a mismatch error when
    /// the intent does not fit this session's resource kind. A rejected
    /// intent leaves the state untouched.
    pub fn begin(&mut self, intent: Intent) -> Result<PendingFetch, SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        let (options, query) = self.resolve(intent)?;

        self.latest_seq += 1;
        debug!(seq = self.latest_seq, kind = %self.kind, query = ?query, "Issuing fetch");
        self.state = Arc::new(self.state.fetching(options));

        Ok(PendingFetch {
            seq: self.latest_seq,
            query,
            adapter: Arc::clone(&self.adapter),
        })
    }

    /// Apply a finished fetch if it is still the latest one
    pub fn complete(&mut self, completion: FetchCompletion) -> Outcome {
        if self.is_closed() {
            debug!(seq = completion.seq, "Session closed, dropping response");
            return Outcome::Discarded;
        }
        if completion.seq != self.latest_seq {
            debug!(
                seq = completion.seq,
                latest = self.latest_seq,
                "Discarding stale response"
            );
            return Outcome::Discarded;
        }

        let next = match completion.result {
            Ok(page) => self.state.succeeded(&completion.request, page),
            Err(error) => {
                warn!(seq = completion.seq, kind = ?error.kind(), error = %error, "Fetch failed");
                self.state.failed(&error)
            }
        };
        self.state = Arc::new(next);
        Outcome::Applied
    }

    /// Issue `intent`, await it and apply the result
    ///
    /// # Errors
    ///
    /// See [`begin`](Self::begin). Fetch failures are not errors here: they
    /// put the state into the error view.
    pub async fn dispatch(&mut self, intent: Intent) -> Result<Arc<BrowseState>, SessionError> {
        let pending = self.begin(intent)?;
        let completion = pending.run().await;
        self.complete(completion);
        Ok(self.state())
    }

    // ------------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------------

    /// Browse the seed target
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn start(&mut self) -> Result<Arc<BrowseState>, SessionError> {
        let seed = self.config.seed.clone();
        self.dispatch(Intent::browse(seed)).await
    }

    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn browse(&mut self, target: BrowseTarget) -> Result<Arc<BrowseState>, SessionError> {
        self.dispatch(Intent::browse(target)).await
    }

    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn search(&mut self, query: &str) -> Result<Arc<BrowseState>, SessionError> {
        self.dispatch(Intent::search(query)).await
    }

    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn navigate(
        &mut self,
        target: BrowseTarget,
    ) -> Result<Arc<BrowseState>, SessionError> {
        self.dispatch(Intent::Navigate(target)).await
    }

    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn change_page(
        &mut self,
        page: PageRequest,
    ) -> Result<Arc<BrowseState>, SessionError> {
        self.dispatch(Intent::ChangePage(page)).await
    }

    /// Move to the following page of the current view
    ///
    /// # Errors
    ///
    /// Returns `NoSuchPage` when the cursor has no next page.
    pub async fn next_page(&mut self) -> Result<Arc<BrowseState>, SessionError> {
        let page = self
            .state
            .cursor
            .next_request()
            .ok_or(SessionError::NoSuchPage("next"))?;
        self.change_page(page).await
    }

    /// Move to the preceding page of the current view
    ///
    /// # Errors
    ///
    /// Returns `NoSuchPage` when the cursor has no previous page.
    pub async fn previous_page(&mut self) -> Result<Arc<BrowseState>, SessionError> {
        let page = self
            .state
            .cursor
            .previous_request()
            .ok_or(SessionError::NoSuchPage("previous"))?;
        self.change_page(page).await
    }

    /// Drill into row `index`
    ///
    /// # Errors
    ///
    /// Returns `NoSuchRow` or `NotNavigable` for rows that cannot be opened.
    pub async fn open_row(&mut self, index: usize) -> Result<Arc<BrowseState>, SessionError> {
        let item = self
            .state
            .items
            .get(index)
            .ok_or(SessionError::NoSuchRow(index))?;
        let target = item
            .navigation_target()
            .ok_or(SessionError::NotNavigable(index))?;
        self.navigate(target).await
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Choose `item` and close the session
    ///
    /// # Errors
    ///
    /// Returns `Closed` after the session ended, or the selection error for
    /// items that cannot be chosen.
    pub fn choose(&mut self, item: &ResourceItem) -> Result<ChosenItem, SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        let chosen = self.emitter.choose(item, self.config.type_filter.as_ref())?;
        info!(kind = %self.kind, chosen = ?chosen, "Item chosen");
        Ok(chosen)
    }

    /// Choose row `index`; model types are browsed into instead
    ///
    /// # Errors
    ///
    /// Returns `NoSuchRow` for an index past the listing, otherwise see
    /// [`choose`](Self::choose).
    pub async fn choose_row(&mut self, index: usize) -> Result<Activation, SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        let item = self
            .state
            .items
            .get(index)
            .cloned()
            .ok_or(SessionError::NoSuchRow(index))?;

        if let ResourceItem::Model(ModelEntry::Bucket(bucket)) = &item {
            debug!(label = %bucket.label, "Model type chosen, browsing into it");
            let state = self
                .navigate(BrowseTarget::Model(bucket.label.clone()))
                .await?;
            return Ok(Activation::Navigated(state));
        }

        self.choose(&item).map(Activation::Chosen)
    }

    /// Choose the page whose children are being browsed
    ///
    /// # Errors
    ///
    /// Returns `NoParent` at the root or outside browse mode.
    pub fn choose_parent(&mut self) -> Result<ChosenItem, SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        let parent = self
            .state
            .parent_context
            .as_ref()
            .map(|context| &context.page)
            .ok_or(SessionError::NoParent)?;
        let chosen = selection::parent_identity(parent, self.config.type_filter.as_ref())?;
        self.emitter.emit(chosen.clone())?;
        info!(kind = %self.kind, chosen = ?chosen, "Parent page chosen");
        Ok(chosen)
    }

    /// End the session without choosing
    pub fn cancel(&mut self) {
        if !self.is_closed() {
            debug!(kind = %self.kind, "Session cancelled");
        }
        self.emitter.cancel();
    }

    // ------------------------------------------------------------------------
    // Intent resolution
    // ------------------------------------------------------------------------

    fn resolve(&self, intent: Intent) -> Result<(ViewOptions, FetchQuery), SessionError> {
        match intent {
            Intent::Browse { target, page } => self.resolve_browse(target, page),
            Intent::Navigate(target) => self.resolve_browse(target, None),
            Intent::Search {
                query,
                type_filter,
                page,
            } => {
                let query = query.trim();
                if query.is_empty() {
                    return self.resolve_browse(BrowseTarget::Root, None);
                }
                let page = self.checked_page(page)?;
                let scope = self.search_scope(type_filter);
                Ok((
                    ViewOptions::Search {
                        query: query.to_string(),
                        scope: scope.clone(),
                    },
                    FetchQuery::Search {
                        query: query.to_string(),
                        scope,
                        page,
                    },
                ))
            }
            Intent::ChangePage(page) => {
                let page = self.checked_page(Some(page))?;
                let options = self.state.view_options.clone();
                let query = match &options {
                    ViewOptions::Browse { target } => FetchQuery::Browse {
                        target: target.clone(),
                        page,
                    },
                    ViewOptions::Search { query, scope } => FetchQuery::Search {
                        query: query.clone(),
                        scope: scope.clone(),
                        page,
                    },
                };
                Ok((options, query))
            }
        }
    }

    fn resolve_browse(
        &self,
        target: BrowseTarget,
        page: Option<PageRequest>,
    ) -> Result<(ViewOptions, FetchQuery), SessionError> {
        let target = alias_root(self.kind, self.config.root_page_id, target);
        let fits = matches!(
            (self.kind, &target),
            (_, BrowseTarget::Root)
                | (ResourceKind::Hierarchical, BrowseTarget::Page(_))
                | (ResourceKind::Flat, BrowseTarget::Model(_))
        );
        if !fits {
            return Err(SessionError::TargetMismatch {
                kind: self.kind,
                target,
            });
        }

        let page = self.checked_page(page)?;
        Ok((
            ViewOptions::Browse {
                target: target.clone(),
            },
            FetchQuery::Browse { target, page },
        ))
    }

    fn checked_page(&self, page: Option<PageRequest>) -> Result<PageRequest, SessionError> {
        let expected = PaginationStyle::from(self.kind);
        let page = page.unwrap_or_else(|| PageRequest::first(expected));
        if page.style() == expected {
            Ok(page)
        } else {
            Err(SessionError::PaginationMismatch {
                expected,
                got: page.style(),
            })
        }
    }

    /// Scope of a new search
    ///
    /// Page searches use the given or session type filter. Model searches
    /// stay within the model type currently shown, if any.
    fn search_scope(&self, type_filter: Option<TypeFilter>) -> SearchScope {
        match self.kind {
            ResourceKind::Hierarchical => SearchScope {
                type_filter: type_filter.or_else(|| self.config.type_filter.clone()),
                model: None,
            },
            ResourceKind::Flat => {
                let model = match &self.state.view_options {
                    ViewOptions::Browse {
                        target: BrowseTarget::Model(label),
                    } => Some(label.clone()),
                    ViewOptions::Search { scope, .. } => scope.model.clone(),
                    ViewOptions::Browse { .. } => None,
                };
                SearchScope {
                    type_filter: None,
                    model,
                }
            }
        }
    }
}

impl std::fmt::Debug for ChooserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChooserSession")
            .field("kind", &self.kind)
            .field("config", &self.config)
            .field("latest_seq", &self.latest_seq)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// The configured root page id addresses the synthesized root
fn alias_root(kind: ResourceKind, root_page_id: PageId, target: BrowseTarget) -> BrowseTarget {
    match target {
        BrowseTarget::Page(id) if kind == ResourceKind::Hierarchical && id == root_page_id => {
            BrowseTarget::Root
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{PageToken, ResponseMeta};
    use crate::resource::{
        InstanceId, ModelBucket, ModelInstance, ModelLabel, PageRecord, PageSummary,
        ParentContext,
    };
    use crate::selection::{SelectionError, SelectionReceiver};
    use crate::session::state::ViewMode;
    use async_trait::async_trait;
    use std::sync::Mutex;

    type Respond = dyn Fn(&FetchQuery) -> Result<FetchPage, ApiError> + Send + Sync;

    struct FnAdapter {
        kind: ResourceKind,
        respond: Box<Respond>,
        queries: Mutex<Vec<FetchQuery>>,
    }

    impl FnAdapter {
        fn new(
            kind: ResourceKind,
            respond: impl Fn(&FetchQuery) -> Result<FetchPage, ApiError> + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                kind,
                respond: Box::new(respond),
                queries: Mutex::new(Vec::new()),
            })
        }

        fn queries(&self) -> Vec<FetchQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ResourceAdapter for FnAdapter {
        fn kind(&self) -> ResourceKind {
            self.kind
        }

        async fn fetch(&self, query: &FetchQuery) -> Result<FetchPage, ApiError> {
            self.queries.lock().unwrap().push(query.clone());
            (self.respond)(query)
        }
    }

    fn page(id: u64, children: u64, page_type: &str) -> ResourceItem {
        ResourceItem::Page(PageRecord {
            id: PageId(id),
            title: format!("Page {id}"),
            page_type: page_type.to_string(),
            html_url: None,
            status: None,
            child_count: children,
            last_revision_at: None,
        })
    }

    fn listing(items: Vec<ResourceItem>, total: u64) -> FetchPage {
        FetchPage {
            items,
            meta: ResponseMeta {
                total_count: Some(total),
                ..ResponseMeta::default()
            },
            ..FetchPage::default()
        }
    }

    /// Children of a page are pages numbered `parent * 10 + n`
    fn page_tree(query: &FetchQuery) -> Result<FetchPage, ApiError> {
        match query {
            FetchQuery::Browse {
                target: BrowseTarget::Root,
                ..
            } => Ok(listing(
                vec![page(2, 3, "tests.eventindex"), page(3, 0, "tests.simplepage")],
                2,
            )),
            FetchQuery::Browse {
                target: BrowseTarget::Page(id),
                ..
            } => {
                let mut page_listing = listing(vec![page(id.0 * 10 + 1, 0, "tests.eventpage")], 45);
                page_listing.parent_context = Some(ParentContext {
                    page: PageSummary {
                        id: *id,
                        title: format!("Page {id}"),
                        page_type: Some("tests.eventindex".into()),
                    },
                    ancestors: Vec::new(),
                });
                Ok(page_listing)
            }
            FetchQuery::Search { query, .. } if query == "boom" => Err(ApiError::ServerError),
            FetchQuery::Search { .. } => Ok(listing(vec![page(9, 0, "tests.eventpage")], 1)),
            FetchQuery::Browse { .. } => Err(ApiError::Unsupported("model target".into())),
        }
    }

    fn pages_session(config: SessionConfig) -> (ChooserSession, Arc<FnAdapter>, SelectionReceiver) {
        let adapter = FnAdapter::new(ResourceKind::Hierarchical, page_tree);
        let (emitter, receiver) = SelectionEmitter::channel();
        (
            ChooserSession::new(adapter.clone(), emitter, config),
            adapter,
            receiver,
        )
    }

    fn bucket(label: &str) -> ResourceItem {
        ResourceItem::Model(ModelEntry::Bucket(ModelBucket {
            label: ModelLabel::new(label),
            name: label.to_string(),
        }))
    }

    fn instance(label: &str, id: u64) -> ResourceItem {
        ResourceItem::Model(ModelEntry::Instance(ModelInstance {
            label: ModelLabel::new(label),
            id: InstanceId::Number(id),
            name: format!("Instance {id}"),
        }))
    }

    fn model_listing(query: &FetchQuery) -> Result<FetchPage, ApiError> {
        let items = match query {
            FetchQuery::Browse {
                target: BrowseTarget::Model(label),
                ..
            } => vec![instance(label.as_str(), 1), instance(label.as_str(), 2)],
            FetchQuery::Search { .. } => vec![instance("tests.category", 7)],
            FetchQuery::Browse { .. } => vec![bucket("tests.category"), bucket("tests.author")],
        };
        Ok(FetchPage {
            items,
            meta: ResponseMeta {
                total_count: None,
                next: Some(PageToken::new("next-token")),
                previous: None,
            },
            ..FetchPage::default()
        })
    }

    fn models_session() -> (ChooserSession, Arc<FnAdapter>, SelectionReceiver) {
        let adapter = FnAdapter::new(ResourceKind::Flat, model_listing);
        let (emitter, receiver) = SelectionEmitter::channel();
        (
            ChooserSession::new(adapter.clone(), emitter, SessionConfig::default()),
            adapter,
            receiver,
        )
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[tokio::test]
    async fn test_seed_root_scenario() {
        let (mut session, _, _receiver) = pages_session(SessionConfig::default());

        let state = session.start().await.unwrap();

        assert_eq!(state.view_mode, ViewMode::Browse);
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.total_count, Some(2));
        assert!(!state.navigation().has_next);
        assert!(!state.is_fetching);
        assert!(state.parent_context.is_none());
    }

    #[tokio::test]
    async fn test_begin_marks_fetching() {
        let (mut session, _, _receiver) = pages_session(SessionConfig::default());

        let pending = session.begin(Intent::browse(BrowseTarget::Root)).unwrap();
        assert!(session.state().is_fetching);
        assert_eq!(pending.seq(), 1);

        let completion = pending.run().await;
        assert_eq!(session.complete(completion), Outcome::Applied);
        assert!(!session.state().is_fetching);
    }

    #[tokio::test]
    async fn test_browse_is_idempotent() {
        let (mut session, _, _receiver) = pages_session(SessionConfig::default());

        let first = session.browse(BrowseTarget::Page(PageId(2))).await.unwrap();
        let second = session.browse(BrowseTarget::Page(PageId(2))).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let (mut session, _, _receiver) = pages_session(SessionConfig::default());

        let a = session.begin(Intent::browse(BrowseTarget::Page(PageId(2)))).unwrap();
        let b = session.begin(Intent::browse(BrowseTarget::Page(PageId(5)))).unwrap();
        let (a, b) = tokio::join!(a.run(), b.run());

        assert_eq!(session.complete(b), Outcome::Applied);
        assert_eq!(session.complete(a), Outcome::Discarded);

        let state = session.state();
        assert_eq!(state.items[0].title(), "Page 51");
        assert_eq!(
            state.browse_target(),
            Some(&BrowseTarget::Page(PageId(5)))
        );
    }

    #[tokio::test]
    async fn test_stale_response_before_latest_keeps_fetching() {
        let (mut session, _, _receiver) = pages_session(SessionConfig::default());

        let a = session.begin(Intent::browse(BrowseTarget::Page(PageId(2)))).unwrap();
        let b = session.begin(Intent::search("events")).unwrap();

        assert_eq!(session.complete(a.run().await), Outcome::Discarded);
        let state = session.state();
        assert!(state.is_fetching);
        assert!(state.items.is_empty());

        assert_eq!(session.complete(b.run().await), Outcome::Applied);
        assert_eq!(session.state().view_mode, ViewMode::Search);
    }

    #[tokio::test]
    async fn test_blank_search_browses_root() {
        let config = SessionConfig {
            seed: BrowseTarget::Page(PageId(2)),
            ..SessionConfig::default()
        };
        let (mut blank, blank_adapter, _r1) = pages_session(config.clone());
        let (mut browse, browse_adapter, _r2) = pages_session(config);

        blank.start().await.unwrap();
        browse.start().await.unwrap();
        let searched = blank.search("   ").await.unwrap();
        let browsed = browse.browse(BrowseTarget::Root).await.unwrap();

        assert_eq!(searched, browsed);
        assert_eq!(blank_adapter.queries(), browse_adapter.queries());
        assert!(matches!(
            blank_adapter.queries().last(),
            Some(FetchQuery::Browse {
                target: BrowseTarget::Root,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_blank_search_in_model_lists_model_types() {
        let adapter = FnAdapter::new(ResourceKind::Flat, model_listing);
        let (emitter, _receiver) = SelectionEmitter::channel();
        let mut session = ChooserSession::new(
            adapter.clone(),
            emitter,
            SessionConfig {
                seed: BrowseTarget::Model(ModelLabel::new("tests.category")),
                ..SessionConfig::default()
            },
        );

        session.start().await.unwrap();
        let state = session.search("").await.unwrap();

        assert_eq!(
            adapter.queries().last(),
            Some(&FetchQuery::Browse {
                target: BrowseTarget::Root,
                page: PageRequest::Token(None),
            })
        );
        assert_eq!(state.browse_target(), Some(&BrowseTarget::Root));
        assert_eq!(state.items.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_enters_error_view_and_recovers() {
        let (mut session, _, _receiver) = pages_session(SessionConfig::default());
        session.start().await.unwrap();

        let failed = session.search("boom").await.unwrap();
        assert_eq!(failed.view_mode, ViewMode::Error);
        assert!(failed.items.is_empty());
        assert_eq!(failed.total_count, Some(0));
        assert_eq!(failed.error_message(), Some("Internal server error"));

        let recovered = session.browse(BrowseTarget::Root).await.unwrap();
        assert_eq!(recovered.view_mode, ViewMode::Browse);
        assert!(recovered.error.is_none());
        assert_eq!(recovered.items.len(), 2);
    }

    #[tokio::test]
    async fn test_root_page_id_is_aliased() {
        let (mut session, adapter, _receiver) = pages_session(SessionConfig::default());

        session.browse(BrowseTarget::Page(PageId(1))).await.unwrap();

        assert_eq!(
            adapter.queries()[0],
            FetchQuery::Browse {
                target: BrowseTarget::Root,
                page: PageRequest::Offset { page_number: 1 },
            }
        );
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    #[tokio::test]
    async fn test_change_page_preserves_view_options() {
        let filter = TypeFilter::new(["tests.eventpage"]);
        let (mut session, adapter, _receiver) = pages_session(SessionConfig {
            type_filter: filter.clone(),
            ..SessionConfig::default()
        });

        session.search("events").await.unwrap();
        session
            .change_page(PageRequest::Offset { page_number: 2 })
            .await
            .unwrap();

        assert_eq!(
            adapter.queries()[1],
            FetchQuery::Search {
                query: "events".into(),
                scope: SearchScope {
                    type_filter: filter,
                    model: None,
                },
                page: PageRequest::Offset { page_number: 2 },
            }
        );
    }

    #[tokio::test]
    async fn test_next_and_previous_page() {
        let (mut session, adapter, _receiver) = pages_session(SessionConfig::default());

        session.browse(BrowseTarget::Page(PageId(2))).await.unwrap();
        assert!(matches!(
            session.previous_page().await,
            Err(SessionError::NoSuchPage("previous"))
        ));

        let state = session.next_page().await.unwrap();
        assert!(state.navigation().has_previous);
        assert!(state.navigation().has_next);
        assert_eq!(
            adapter.queries().last(),
            Some(&FetchQuery::Browse {
                target: BrowseTarget::Page(PageId(2)),
                page: PageRequest::Offset { page_number: 2 },
            })
        );
    }

    #[tokio::test]
    async fn test_rejects_foreign_pagination_and_targets() {
        let (mut session, _, _receiver) = pages_session(SessionConfig::default());

        assert!(matches!(
            session.change_page(PageRequest::Token(None)).await,
            Err(SessionError::PaginationMismatch { .. })
        ));
        assert!(matches!(
            session
                .browse(BrowseTarget::Model(ModelLabel::new("tests.category")))
                .await,
            Err(SessionError::TargetMismatch { .. })
        ));
        assert_eq!(session.latest_seq(), 0);
    }

    #[tokio::test]
    async fn test_token_pagination_round_trips_tokens() {
        let (mut session, adapter, _receiver) = models_session();

        session
            .browse(BrowseTarget::Model(ModelLabel::new("tests.category")))
            .await
            .unwrap();
        session.next_page().await.unwrap();

        assert_eq!(
            adapter.queries()[1],
            FetchQuery::Browse {
                target: BrowseTarget::Model(ModelLabel::new("tests.category")),
                page: PageRequest::Token(Some(PageToken::new("next-token"))),
            }
        );
    }

    // ========================================================================
    // Model sessions
    // ========================================================================

    #[tokio::test]
    async fn test_flat_search_is_scoped_to_current_model() {
        let (mut session, adapter, _receiver) = models_session();

        session
            .browse(BrowseTarget::Model(ModelLabel::new("tests.author")))
            .await
            .unwrap();
        session.search("smith").await.unwrap();

        assert_eq!(
            adapter.queries()[1],
            FetchQuery::Search {
                query: "smith".into(),
                scope: SearchScope {
                    type_filter: None,
                    model: Some(ModelLabel::new("tests.author")),
                },
                page: PageRequest::Token(None),
            }
        );
    }

    #[tokio::test]
    async fn test_choosing_bucket_navigates() {
        let (mut session, _, mut receiver) = models_session();
        session.start().await.unwrap();

        let state = match session.choose_row(0).await.unwrap() {
            Activation::Navigated(state) => state,
            other => panic!("Expected navigation, got {other:?}"),
        };
        assert_eq!(
            state.browse_target(),
            Some(&BrowseTarget::Model(ModelLabel::new("tests.category")))
        );
        assert!(!session.is_closed());
        assert!(receiver.try_recv().is_err());

        let activation = session.choose_row(1).await.unwrap();
        let expected = ChosenItem::Model {
            model_label: ModelLabel::new("tests.category"),
            id: InstanceId::Number(2),
        };
        assert_eq!(activation, Activation::Chosen(expected.clone()));
        assert_eq!(receiver.try_recv().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_direct_bucket_choice_is_rejected() {
        let (mut session, _, _receiver) = models_session();
        session.start().await.unwrap();

        let item = session.state().items[0].clone();
        assert!(matches!(
            session.choose(&item),
            Err(SessionError::Selection(SelectionError::BucketNotChoosable(_)))
        ));
        assert!(!session.is_closed());
    }

    // ========================================================================
    // Selection and closing
    // ========================================================================

    #[tokio::test]
    async fn test_session_closes_after_choice() {
        let (mut session, _, mut receiver) = pages_session(SessionConfig::default());
        session.start().await.unwrap();

        let pending = session.begin(Intent::search("late")).unwrap();
        let chosen = session.choose_row(1).await.unwrap();
        assert_eq!(chosen, Activation::Chosen(ChosenItem::Page { id: PageId(3) }));
        assert_eq!(
            receiver.try_recv().unwrap(),
            ChosenItem::Page { id: PageId(3) }
        );

        assert_eq!(session.complete(pending.run().await), Outcome::Discarded);
        assert!(matches!(
            session.browse(BrowseTarget::Root).await,
            Err(SessionError::Closed)
        ));
        assert!(matches!(session.choose_row(0).await, Err(SessionError::Closed)));
    }

    #[tokio::test]
    async fn test_choose_parent_respects_type_filter() {
        let (mut session, _, _receiver) = pages_session(SessionConfig {
            type_filter: TypeFilter::new(["tests.eventpage"]),
            ..SessionConfig::default()
        });
        session.start().await.unwrap();
        assert!(matches!(session.choose_parent(), Err(SessionError::NoParent)));

        session.open_row(0).await.unwrap();
        assert!(matches!(
            session.choose_parent(),
            Err(SessionError::Selection(SelectionError::NotChoosable { .. }))
        ));

        assert_eq!(
            session.choose_row(0).await.unwrap(),
            Activation::Chosen(ChosenItem::Page { id: PageId(21) })
        );
    }

    #[tokio::test]
    async fn test_open_leaf_row_is_rejected() {
        let (mut session, _, _receiver) = pages_session(SessionConfig::default());
        session.start().await.unwrap();

        assert!(matches!(
            session.open_row(1).await,
            Err(SessionError::NotNavigable(1))
        ));
        assert!(matches!(
            session.open_row(9).await,
            Err(SessionError::NoSuchRow(9))
        ));
    }

    #[tokio::test]
    async fn test_cancel_closes_receiver() {
        let (mut session, _, receiver) = pages_session(SessionConfig::default());

        session.cancel();

        assert!(session.is_closed());
        assert!(receiver.await.is_err());
        assert!(matches!(session.start().await, Err(SessionError::Closed)));
    }
}
