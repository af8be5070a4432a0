//! Choose command - interactive page or model chooser
//!
//! Renders the current view, offers the actions that apply to it and feeds
//! the operator's pick back into the session until something is chosen or
//! the operator cancels.

use crate::{
    ChooserError,
    output,
    resource::{BrowseTarget, ChosenItem},
    session::{Activation, ChooserSession, SessionError},
    ui::UserInput,
    view::{PresentationView, ViewContext, select_view},
};

type Result<T> = std::result::Result<T, ChooserError>;

const ACTION_PROMPT: &str = "Action";
const SEARCH_PROMPT: &str = "Search (empty to browse)";

/// One entry of the action menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Choose(usize),
    Open(usize),
    ChooseParent,
    Breadcrumb(BrowseTarget),
    Previous,
    Next,
    Search,
    ClearSearch,
    Restart,
    Cancel,
}

/// Actions that apply to `view`, with their menu labels
#[must_use]
pub fn actions_for(view: &PresentationView) -> Vec<(String, MenuAction)> {
    let mut actions = Vec::new();

    let (rows, pagination) = match view {
        PresentationView::Error(_) => {
            actions.push(("Start over".to_string(), MenuAction::Restart));
            actions.push(("Cancel".to_string(), MenuAction::Cancel));
            return actions;
        }
        PresentationView::Browse(browse) => {
            if let Some(parent) = browse.parent.as_ref().filter(|parent| parent.choosable) {
                actions.push((format!("Choose {}", parent.title), MenuAction::ChooseParent));
            }
            (&browse.rows, &browse.pagination)
        }
        PresentationView::Search(search) => (&search.rows, &search.pagination),
    };

    for (index, row) in rows.iter().enumerate() {
        if row.choosable {
            actions.push((format!("Choose {}", row.title), MenuAction::Choose(index)));
        }
        if row.is_navigable() {
            actions.push((format!("Open {} ›", row.title), MenuAction::Open(index)));
        }
    }

    if let Some(controls) = pagination {
        if controls.has_previous {
            actions.push(("‹ Previous page".to_string(), MenuAction::Previous));
        }
        if controls.has_next {
            actions.push(("Next page ›".to_string(), MenuAction::Next));
        }
    }

    if let PresentationView::Browse(browse) = view {
        let crumbs = browse.breadcrumb.len().saturating_sub(1);
        for crumb in &browse.breadcrumb[..crumbs] {
            actions.push((
                format!("Back to {}", crumb.label),
                MenuAction::Breadcrumb(crumb.target.clone()),
            ));
        }
    }

    actions.push(("Search...".to_string(), MenuAction::Search));
    if matches!(view, PresentationView::Search(_)) {
        actions.push(("Clear search".to_string(), MenuAction::ClearSearch));
    }
    actions.push(("Cancel".to_string(), MenuAction::Cancel));
    actions
}

/// Execute the interactive chooser
///
/// Returns `None` when the operator cancelled.
///
/// # Errors
/// Returns an error if a prompt fails or the session rejects an intent
pub async fn execute(
    session: &mut ChooserSession,
    input: &dyn UserInput,
    quiet: bool,
) -> Result<Option<ChosenItem>> {
    session.start().await?;

    loop {
        let state = session.state();
        let view = select_view(
            &state,
            &ViewContext {
                type_filter: session.type_filter(),
                root_page_id: session.root_page_id(),
            },
        );
        if !quiet {
            for line in output::render_view(&view) {
                eprintln!("{line}");
            }
        }

        let actions = actions_for(&view);
        let labels: Vec<String> = actions.iter().map(|(label, _)| label.clone()).collect();
        let Some(picked) = input.prompt_select(ACTION_PROMPT, &labels, Some(0))? else {
            session.cancel();
            return Ok(None);
        };
        let action = actions
            .get(picked)
            .map(|(_, action)| action.clone())
            .ok_or_else(|| ChooserError::InvalidInput(format!("No action at index {picked}")))?;

        match apply(session, input, action).await {
            Ok(Some(Step::Chosen(chosen))) => return Ok(Some(chosen)),
            Ok(Some(Step::Cancelled)) => return Ok(None),
            Ok(None) => {}
            Err(ChooserError::Session(error @ SessionError::Selection(_))) => {
                if !quiet {
                    eprintln!("{error}");
                }
            }
            Err(error) => return Err(error),
        }
    }
}

enum Step {
    Chosen(ChosenItem),
    Cancelled,
}

async fn apply(
    session: &mut ChooserSession,
    input: &dyn UserInput,
    action: MenuAction,
) -> Result<Option<Step>> {
    match action {
        MenuAction::Choose(index) => match session.choose_row(index).await? {
            Activation::Chosen(chosen) => return Ok(Some(Step::Chosen(chosen))),
            Activation::Navigated(_) => {}
        },
        MenuAction::Open(index) => {
            session.open_row(index).await?;
        }
        MenuAction::ChooseParent => return Ok(Some(Step::Chosen(session.choose_parent()?))),
        MenuAction::Breadcrumb(target) => {
            session.navigate(target).await?;
        }
        MenuAction::Previous => {
            session.previous_page().await?;
        }
        MenuAction::Next => {
            session.next_page().await?;
        }
        MenuAction::Search => {
            if let Some(query) = input.prompt_text(SEARCH_PROMPT, true)? {
                session.search(&query).await?;
            }
        }
        MenuAction::ClearSearch => {
            session.search("").await?;
        }
        MenuAction::Restart => {
            session.start().await?;
        }
        MenuAction::Cancel => {
            session.cancel();
            return Ok(Some(Step::Cancelled));
        }
    }
    Ok(None)
}
