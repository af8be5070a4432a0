//! Output formatting for CLI display
//!
//! Turns a [`PresentationView`] into terminal lines and the chosen item into
//! the JSON line the import workflow reads.

use crate::resource::{ChosenItem, ResourceKind};
use crate::view::{
    BrowseView, Crumb, PaginationControls, PresentationView, Row, RowDetail, SearchView,
};
use colored::Colorize;
use serde_json::json;

/// Render a whole view, one entry per terminal line
#[must_use]
pub fn render_view(view: &PresentationView) -> Vec<String> {
    match view {
        PresentationView::Error(error) => vec![
            format!("{} {}", "Error:".red().bold(), error.message),
            "Search is disabled until you browse again.".dimmed().to_string(),
        ],
        PresentationView::Browse(browse) => render_browse(browse),
        PresentationView::Search(search) => render_search(search),
    }
}

fn render_browse(view: &BrowseView) -> Vec<String> {
    let mut lines = Vec::new();
    if !view.breadcrumb.is_empty() {
        lines.push(breadcrumb(&view.breadcrumb));
    }
    if let Some(parent) = &view.parent {
        lines.push(format!("  {} {}", "^".bold(), row_text(parent)));
    }
    lines.extend(rows(&view.rows));
    if view.rows.is_empty() {
        lines.push("  (empty)".dimmed().to_string());
    }
    lines.extend(view.pagination.as_ref().map(pagination));
    if view.busy {
        lines.push("Loading...".yellow().to_string());
    }
    lines
}

fn render_search(view: &SearchView) -> Vec<String> {
    let mut lines = vec![format!(
        "{} for \"{}\"",
        view.headline.bold(),
        view.query
    )];
    lines.extend(rows(&view.rows));
    lines.extend(view.pagination.as_ref().map(pagination));
    if view.busy {
        lines.push("Loading...".yellow().to_string());
    }
    lines
}

/// "Home › Section › Events"
#[must_use]
pub fn breadcrumb(crumbs: &[Crumb]) -> String {
    crumbs
        .iter()
        .map(|crumb| crumb.label.as_str())
        .collect::<Vec<_>>()
        .join(" › ")
        .cyan()
        .to_string()
}

fn rows(rows: &[Row]) -> impl Iterator<Item = String> + '_ {
    rows.iter()
        .enumerate()
        .map(|(index, row)| format!("{:>4}. {}", index + 1, row_text(row)))
}

/// Title plus details, with markers for openable and non-choosable rows
#[must_use]
pub fn row_text(row: &Row) -> String {
    let title = if row.choosable {
        row.title.bold().to_string()
    } else {
        row.title.dimmed().to_string()
    };

    let detail = match &row.detail {
        RowDetail::Page {
            page_type,
            status,
            unpublished,
            last_revision,
        } => {
            let mut parts = vec![page_type.clone()];
            if let Some(status) = status {
                parts.push(if *unpublished {
                    status.red().to_string()
                } else {
                    status.green().to_string()
                });
            }
            if let Some(revision) = last_revision {
                parts.push(format!("updated {revision}"));
            }
            parts.join(", ")
        }
        RowDetail::ModelType { label } => format!("model type {label}"),
        RowDetail::Instance { label, id } => format!("{label} #{id}"),
    };

    let marker = if row.is_navigable() { " ›" } else { "" };
    format!("{title} {}{marker}", format!("[{detail}]").dimmed())
}

fn pagination(controls: &PaginationControls) -> String {
    let mut parts = Vec::new();
    if controls.has_previous {
        parts.push("‹ previous".to_string());
    }
    if let Some(label) = &controls.label {
        parts.push(label.clone());
    }
    if controls.has_next {
        parts.push("next ›".to_string());
    }
    parts.join("  ").dimmed().to_string()
}

/// JSON line describing the chosen item
///
/// # Errors
///
/// Returns a `serde_json::Error` if the identity cannot be serialized.
pub fn chosen_json(
    source: &str,
    kind: ResourceKind,
    chosen: &ChosenItem,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&json!({
        "source": source,
        "kind": kind.to_string(),
        "item": chosen,
    }))
}
