//! Domain types for the two remote resource kinds
//!
//! These are pure data structures. Wire-format structs live next to the
//! adapter that parses them; by the time data reaches this module the
//! bucket/instance distinction and every required field has been checked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page type that matches every page; never kept in a type filter
pub const GENERIC_PAGE_TYPE: &str = "wagtailcore.page";

// ============================================================================
// Resource kinds and identities
// ============================================================================

/// Which remote resource a chooser session browses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Tree-structured pages addressed by numeric id
    Hierarchical,
    /// Model records addressed by model label plus optional id
    Flat,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hierarchical => write!(f, "pages"),
            Self::Flat => write!(f, "models"),
        }
    }
}

/// Numeric page id on the source site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lower-case `app_label.model_name` label of a model type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelLabel(pub String);

impl ModelLabel {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primary key of a model instance, kept in its textual form
///
/// Sources may serialize keys as numbers or strings; either way the value is
/// passed back unchanged when the item is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum InstanceId {
    Number(u64),
    Text(String),
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Where a browse intent points
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BrowseTarget {
    /// Tree root for pages, the list of model types for models
    Root,
    /// Children of a page
    Page(PageId),
    /// Instances of a model type
    Model(ModelLabel),
}

impl fmt::Display for BrowseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Page(id) => write!(f, "{id}"),
            Self::Model(label) => write!(f, "{label}"),
        }
    }
}

// ============================================================================
// Result records
// ============================================================================

/// A page as listed by the hierarchical endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub id: PageId,
    pub title: String,
    /// `app.Model` type label as sent by the server
    pub page_type: String,
    pub html_url: Option<String>,
    pub status: Option<PageStatus>,
    /// Number of child pages (0 when the server omitted the count)
    pub child_count: u64,
    pub last_revision_at: Option<DateTime<Utc>>,
}

impl PageRecord {
    /// Pages with children can be drilled into
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.child_count > 0
    }
}

/// Publication status of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStatus {
    /// Human label, e.g. "live" or "draft"
    pub label: String,
    pub live: bool,
}

/// A model-type pseudo-item: navigable, never choosable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBucket {
    pub label: ModelLabel,
    pub name: String,
}

/// A concrete model record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInstance {
    pub label: ModelLabel,
    pub id: InstanceId,
    pub name: String,
}

/// Entry returned by the flat endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEntry {
    Bucket(ModelBucket),
    Instance(ModelInstance),
}

impl ModelEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bucket(bucket) => &bucket.name,
            Self::Instance(instance) => &instance.name,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &ModelLabel {
        match self {
            Self::Bucket(bucket) => &bucket.label,
            Self::Instance(instance) => &instance.label,
        }
    }
}

/// One row of a result listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceItem {
    Page(PageRecord),
    Model(ModelEntry),
}

impl ResourceItem {
    /// Display title of the item
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Page(page) => &page.title,
            Self::Model(entry) => entry.name(),
        }
    }

    /// Browse target reached by drilling into this item, if it has one
    #[must_use]
    pub fn navigation_target(&self) -> Option<BrowseTarget> {
        match self {
            Self::Page(page) if page.is_container() => Some(BrowseTarget::Page(page.id)),
            Self::Page(_) => None,
            Self::Model(ModelEntry::Bucket(bucket)) => Some(BrowseTarget::Model(bucket.label.clone())),
            Self::Model(ModelEntry::Instance(_)) => None,
        }
    }
}

/// Minimal page reference used for breadcrumbs and the parent row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub id: PageId,
    pub title: String,
    pub page_type: Option<String>,
}

/// The page being browsed plus its ancestor chain, root first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentContext {
    pub page: PageSummary,
    pub ancestors: Vec<PageSummary>,
}

/// Verbose name of a page type, as advertised in a listing's `__types`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageTypeInfo {
    pub verbose_name: String,
}

// ============================================================================
// Type filter
// ============================================================================

/// Normalized set of page types a hierarchical session may choose
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeFilter(Vec<String>);

impl TypeFilter {
    /// Lower-case the given labels and drop the generic page type
    ///
    /// Returns `None` when nothing is left, meaning "no restriction".
    pub fn new<I, S>(types: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for raw in types {
            let label = raw.as_ref().trim().to_lowercase();
            if label.is_empty() || label == GENERIC_PAGE_TYPE || normalized.contains(&label) {
                continue;
            }
            normalized.push(label);
        }

        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// Case-insensitive membership check
    #[must_use]
    pub fn matches(&self, page_type: &str) -> bool {
        let page_type = page_type.to_lowercase();
        self.0.iter().any(|t| *t == page_type)
    }

    /// Comma-separated form used by the `type` query parameter
    #[must_use]
    pub fn to_query_value(&self) -> String {
        self.0.join(",")
    }

    #[must_use]
    pub fn types(&self) -> &[String] {
        &self.0
    }
}

// ============================================================================
// Selection identity
// ============================================================================

/// Canonical identity of the chosen item, handed to the embedding context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChosenItem {
    Page {
        id: PageId,
    },
    Model {
        model_label: ModelLabel,
        id: InstanceId,
    },
}
