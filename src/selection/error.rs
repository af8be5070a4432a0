//! Selection error types
//!
//! # Error Types
//!
//! - **`AlreadyChosen`**: the session already emitted its one selection (or
//!   was cancelled)
//! - **`BucketNotChoosable`**: the item is a model type, which can only be
//!   navigated into
//! - **`NotChoosable`**: the page type is outside the session's type filter
//! - **`ReceiverDropped`**: nobody is listening for the selection any more

use crate::resource::{ModelLabel, PageId};
use thiserror::Error;

/// Errors raised when choosing an item
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("An item has already been chosen in this session")]
    AlreadyChosen,

    #[error("Model type '{0}' cannot be chosen, open it to pick an instance")]
    BucketNotChoosable(ModelLabel),

    #[error("Page {id} ({page_type}) is not one of the allowed page types")]
    NotChoosable { id: PageId, page_type: String },

    #[error("The selection receiver has been dropped")]
    ReceiverDropped,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
