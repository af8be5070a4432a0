//! Operator input abstraction
//!
//! The interactive chooser asks the operator what to do next through the
//! [`UserInput`] trait, so the command loop can be driven by a scripted
//! input in tests and by `dialoguer` prompts in the terminal.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  commands::choose (loop)     │
//! └──────────────┬───────────────┘
//!                │ UserInput
//!        ┌───────┴────────┐
//!        ▼                ▼
//! ┌──────────────┐ ┌──────────────┐
//! │DialoguerInput│ │ScriptedInput │
//! │  (terminal)  │ │   (tests)    │
//! └──────────────┘ └──────────────┘
//! ```

pub mod input;
pub mod mock;

pub use input::{DialoguerInput, InputError, UserInput};
pub use mock::{ScriptedAnswer, ScriptedInput};
