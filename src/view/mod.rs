//! View selector
//!
//! [`select_view`] is a pure function from a [`BrowseState`] to the
//! presentation the operator should see. It never looks at the resource
//! kind: rows follow from the item variants and the pagination controls
//! branch on the cursor variant alone.
//!
//! Precedence is error first, then the view mode.

use crate::pagination::PaginationCursor;
use crate::resource::{
    BrowseTarget, ModelEntry, PageId, PageRecord, PageSummary, PageTypeInfo, ResourceItem,
    TypeFilter,
};
use crate::selection;
use crate::session::{BrowseState, ViewMode, ViewOptions};
use std::collections::BTreeMap;

const ROOT_PAGE_CRUMB: &str = "Home";
const ROOT_MODEL_CRUMB: &str = "Models";
const REVISION_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Session context the views need besides the state
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub type_filter: Option<&'a TypeFilter>,
    pub root_page_id: PageId,
}

/// What to show for the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationView {
    Error(ErrorView),
    Browse(BrowseView),
    Search(SearchView),
}

impl PresentationView {
    /// Whether the search input accepts queries
    #[must_use]
    pub const fn search_enabled(&self) -> bool {
        !matches!(self, Self::Error(_))
    }

    /// Rows of the listing, empty for the error view
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        match self {
            Self::Error(_) => &[],
            Self::Browse(view) => &view.rows,
            Self::Search(view) => &view.rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseView {
    /// Path from the root to the current location, current last
    pub breadcrumb: Vec<Crumb>,
    /// The page whose children are listed
    pub parent: Option<Row>,
    pub rows: Vec<Row>,
    pub pagination: Option<PaginationControls>,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub query: String,
    /// "There are N matches"
    pub headline: String,
    pub rows: Vec<Row>,
    pub pagination: Option<PaginationControls>,
    pub busy: bool,
}

/// One breadcrumb entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub target: BrowseTarget,
}

/// One listing row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    pub detail: RowDetail,
    /// Where opening the row leads, if it can be opened
    pub navigate_to: Option<BrowseTarget>,
    pub choosable: bool,
}

impl Row {
    #[must_use]
    pub const fn is_navigable(&self) -> bool {
        self.navigate_to.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDetail {
    Page {
        /// Verbose type name where known
        page_type: String,
        status: Option<String>,
        unpublished: bool,
        last_revision: Option<String>,
    },
    ModelType {
        label: String,
    },
    Instance {
        label: String,
        id: String,
    },
}

/// Previous/next controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    /// "Page x of y." for numbered pagination
    pub label: Option<String>,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Derive the presentation for `state`
#[must_use]
pub fn select_view(state: &BrowseState, context: &ViewContext<'_>) -> PresentationView {
    if let Some(message) = state.error_message() {
        return PresentationView::Error(ErrorView {
            message: message.to_string(),
        });
    }

    let rows = state
        .items
        .iter()
        .map(|item| item_row(item, &state.page_types, context.type_filter))
        .collect();
    let pagination = pagination_controls(&state.cursor);

    match (&state.view_mode, &state.view_options) {
        (ViewMode::Search, ViewOptions::Search { query, .. }) => {
            let total = state
                .total_count
                .unwrap_or_else(|| state.items.len() as u64);
            PresentationView::Search(SearchView {
                query: query.clone(),
                headline: search_headline(total),
                rows,
                pagination,
                busy: state.is_fetching,
            })
        }
        (_, options) => {
            let target = match options {
                ViewOptions::Browse { target } => target.clone(),
                ViewOptions::Search { .. } => BrowseTarget::Root,
            };
            let parent = state.parent_context.as_ref().map(|parent_context| {
                summary_row(&parent_context.page, &state.page_types, context.type_filter)
            });
            PresentationView::Browse(BrowseView {
                breadcrumb: breadcrumb(state, &target, context.root_page_id),
                parent,
                rows,
                pagination,
                busy: state.is_fetching,
            })
        }
    }
}

/// Result count phrasing of the search view
#[must_use]
pub fn search_headline(total: u64) -> String {
    match total {
        0 => "There are no matches".to_string(),
        1 => "There is one match".to_string(),
        n => format!("There are {n} matches"),
    }
}

/// Human name of a page type, via the advertised verbose names
///
/// The first letter is capitalised; unknown types fall back to the label.
#[must_use]
pub fn page_type_name(page_type: &str, page_types: &BTreeMap<String, PageTypeInfo>) -> String {
    let found = page_types
        .get(page_type)
        .or_else(|| page_types.get(&page_type.to_lowercase()));
    match found {
        Some(info) => capitalize_first(&info.verbose_name),
        None => page_type.to_string(),
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn pagination_controls(cursor: &PaginationCursor) -> Option<PaginationControls> {
    match cursor {
        PaginationCursor::Offset(offset) if offset.total_pages > 1 => Some(PaginationControls {
            label: Some(format!(
                "Page {} of {}.",
                offset.page_number, offset.total_pages
            )),
            has_previous: offset.has_previous(),
            has_next: offset.has_next(),
        }),
        PaginationCursor::Token(tokens) if tokens.next.is_some() || tokens.previous.is_some() => {
            Some(PaginationControls {
                label: None,
                has_previous: tokens.previous.is_some(),
                has_next: tokens.next.is_some(),
            })
        }
        PaginationCursor::Offset(_) | PaginationCursor::Token(_) => None,
    }
}

fn breadcrumb(state: &BrowseState, target: &BrowseTarget, root_page_id: PageId) -> Vec<Crumb> {
    match target {
        BrowseTarget::Root => Vec::new(),
        BrowseTarget::Model(label) => vec![
            Crumb {
                label: ROOT_MODEL_CRUMB.to_string(),
                target: BrowseTarget::Root,
            },
            Crumb {
                label: label.to_string(),
                target: target.clone(),
            },
        ],
        BrowseTarget::Page(_) => {
            let Some(parent_context) = &state.parent_context else {
                return Vec::new();
            };
            let page_crumb = |page: &PageSummary| {
                if page.id == root_page_id {
                    Crumb {
                        label: ROOT_PAGE_CRUMB.to_string(),
                        target: BrowseTarget::Root,
                    }
                } else {
                    Crumb {
                        label: page.title.clone(),
                        target: BrowseTarget::Page(page.id),
                    }
                }
            };

            let mut crumbs: Vec<Crumb> = parent_context.ancestors.iter().map(page_crumb).collect();
            if crumbs.first().is_none_or(|crumb| crumb.target != BrowseTarget::Root) {
                crumbs.insert(
                    0,
                    Crumb {
                        label: ROOT_PAGE_CRUMB.to_string(),
                        target: BrowseTarget::Root,
                    },
                );
            }
            crumbs.push(page_crumb(&parent_context.page));
            crumbs
        }
    }
}

fn item_row(
    item: &ResourceItem,
    page_types: &BTreeMap<String, PageTypeInfo>,
    filter: Option<&TypeFilter>,
) -> Row {
    let detail = match item {
        ResourceItem::Page(page) => page_detail(page, page_types),
        ResourceItem::Model(ModelEntry::Bucket(bucket)) => RowDetail::ModelType {
            label: bucket.label.to_string(),
        },
        ResourceItem::Model(ModelEntry::Instance(instance)) => RowDetail::Instance {
            label: instance.label.to_string(),
            id: instance.id.to_string(),
        },
    };

    Row {
        title: item.title().to_string(),
        detail,
        navigate_to: item.navigation_target(),
        choosable: selection::identity_of(item, filter).is_ok(),
    }
}

fn page_detail(page: &PageRecord, page_types: &BTreeMap<String, PageTypeInfo>) -> RowDetail {
    RowDetail::Page {
        page_type: page_type_name(&page.page_type, page_types),
        status: page.status.as_ref().map(|status| status.label.clone()),
        unpublished: page.status.as_ref().is_some_and(|status| !status.live),
        last_revision: page
            .last_revision_at
            .map(|at| at.format(REVISION_FORMAT).to_string()),
    }
}

fn summary_row(
    page: &PageSummary,
    page_types: &BTreeMap<String, PageTypeInfo>,
    filter: Option<&TypeFilter>,
) -> Row {
    Row {
        title: page.title.clone(),
        detail: RowDetail::Page {
            page_type: page
                .page_type
                .as_deref()
                .map(|page_type| page_type_name(page_type, page_types))
                .unwrap_or_default(),
            status: None,
            unpublished: false,
            last_revision: None,
        },
        navigate_to: None,
        choosable: selection::parent_identity(page, filter).is_ok(),
    }
}
