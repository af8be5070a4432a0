//! Fetch lifecycle state machine
//!
//! One [`ChooserSession`] per chooser invocation. It owns the
//! [`BrowseState`], turns [`Intent`]s into adapter queries, fences stale
//! responses by sequence number and finally fires the selection emitter.
//!
//! # Architecture
//!
//! - `state`: the immutable [`BrowseState`] and its transitions
//! - `intent`: what the operator can ask for
//! - `controller`: the session itself
//!
//! # Error Types
//!
//! - [`SessionError`]: intents the session refuses before any I/O. Fetch
//!   failures are recorded in the state instead.

pub mod controller;
pub mod error;
pub mod intent;
pub mod state;

pub use controller::{
    Activation, ChooserSession, DEFAULT_ROOT_PAGE_ID, FetchCompletion, Outcome, PendingFetch,
    SessionConfig,
};
pub use error::SessionError;
pub use intent::Intent;
pub use state::{BrowseState, FetchFailure, ViewMode, ViewOptions};
