//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and carries out the operation.

pub mod choose;
pub mod completions;
pub mod sources;

// Re-export execute functions for convenience
pub use choose::execute as choose;
pub use completions::execute as completions;
pub use sources::execute as sources;
