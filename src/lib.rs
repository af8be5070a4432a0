//! Transfer chooser - pick one page or model record from a remote source
//!
//! This library drives a chooser session against a source site's admin
//! API: it browses hierarchical pages or flat model records, searches,
//! paginates with either offset or token pagination, and emits exactly one
//! chosen item for the import workflow.
//!
//! # Architecture
//!
//! ```text
//! intent ─▶ session ─▶ adapter ─▶ api (HttpTransport)
//!              │  ▲
//!              │  └── FetchPage, fenced by sequence number
//!              ▼
//!         BrowseState ─▶ view::select_view ─▶ output
//!              │
//!              └──▶ selection (one ChosenItem, then closed)
//! ```

use thiserror::Error;

pub mod adapter;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
pub mod pagination;
pub mod resource;
pub mod selection;
pub mod session;
pub mod ui;
pub mod view;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum ChooserError {
    /// Request against the source failed outside a session
    #[error("API error: {0}")]
    Api(#[from] api::ApiError),
    /// Session rejected an intent
    #[error("Session error: {0}")]
    Session(#[from] session::SessionError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Prompt failed
    #[error("Input error: {0}")]
    Input(#[from] ui::InputError),
    /// Result could not be serialized
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use selection::SelectionError;
    use session::SessionError;

    #[test]
    fn test_selection_errors_surface_through_session() {
        let error: ChooserError = SessionError::from(SelectionError::AlreadyChosen).into();
        assert!(matches!(
            error,
            ChooserError::Session(SessionError::Selection(SelectionError::AlreadyChosen))
        ));
    }
}
