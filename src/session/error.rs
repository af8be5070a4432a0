//! Session error types
//!
//! Failed fetches are not session errors: they are folded into the browse
//! state and rendered as the error view. These are the intents the session
//! refuses outright.
//!
//! # Error Types
//!
//! - **`Closed`**: the session has chosen an item or was cancelled
//! - **`TargetMismatch`**: a browse target of the other resource kind
//! - **`PaginationMismatch`**: a page request of the other protocol
//! - **`NoSuchPage`**: previous/next requested past either end
//! - **`NoSuchRow`**, **`NotNavigable`**: row actions that do not apply
//! - **`NoParent`**: choosing the parent at the root
//! - **`Selection`**: wrapped [`SelectionError`]

use crate::pagination::PaginationStyle;
use crate::resource::{BrowseTarget, ResourceKind};
use crate::selection::SelectionError;
use thiserror::Error;

/// Intents rejected by a chooser session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("The chooser session is closed")]
    Closed,

    #[error("Cannot browse {target} in a {kind} chooser")]
    TargetMismatch {
        kind: ResourceKind,
        target: BrowseTarget,
    },

    #[error("{got:?} page request in a session paginated by {expected:?}")]
    PaginationMismatch {
        expected: PaginationStyle,
        got: PaginationStyle,
    },

    #[error("There is no {0} page")]
    NoSuchPage(&'static str),

    #[error("Row {0} does not exist")]
    NoSuchRow(usize),

    #[error("Row {0} cannot be opened")]
    NotNavigable(usize),

    #[error("There is no parent page to choose")]
    NoParent,

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
