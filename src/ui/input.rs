//! User input abstraction layer
//!
//! Prompts return `Ok(None)` when the operator dismisses them (ESC or `q`),
//! which the chooser treats as cancelling the session.

use std::io;

/// Trait for operator prompts
///
/// # Examples
///
/// ```no_run
/// use transfer_chooser::ui::{DialoguerInput, UserInput};
///
/// let input = DialoguerInput::new();
/// let actions = vec!["Open Events".to_string(), "Cancel".to_string()];
/// if let Some(index) = input.prompt_select("Action", &actions, Some(0)).unwrap() {
///     println!("picked {}", actions[index]);
/// }
/// ```
pub trait UserInput: Send + Sync {
    /// Prompt for a line of text
    ///
    /// # Returns
    ///
    /// * `Ok(Some(String))` - Text entered (possibly empty when `allow_empty`)
    /// * `Ok(None)` - Prompt dismissed
    /// * `Err(_)` - Terminal failure
    fn prompt_text(&self, prompt: &str, allow_empty: bool) -> Result<Option<String>>;

    /// Prompt for one entry of `items`, returning its index
    fn prompt_select(
        &self,
        prompt: &str,
        items: &[String],
        default: Option<usize>,
    ) -> Result<Option<usize>>;
}

/// Result type for user input operations
pub type Result<T> = std::result::Result<T, InputError>;

/// Errors that can occur during user input
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Terminal I/O failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A scripted input ran out of answers or got the wrong kind of prompt
    #[error("Unexpected prompt: {0}")]
    Unexpected(String),
}

/// Terminal prompts using dialoguer
pub struct DialoguerInput {
    theme: dialoguer::theme::ColorfulTheme,
}

impl DialoguerInput {
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: dialoguer::theme::ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerInput {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInput for DialoguerInput {
    fn prompt_text(&self, prompt: &str, allow_empty: bool) -> Result<Option<String>> {
        use dialoguer::Input;

        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()
            .map(Some)
            .map_err(|e| InputError::Io(io::Error::other(e)))
    }

    fn prompt_select(
        &self,
        prompt: &str,
        items: &[String],
        default: Option<usize>,
    ) -> Result<Option<usize>> {
        use dialoguer::Select;

        let mut select = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items);

        if let Some(def) = default {
            select = select.default(def);
        }

        select
            .interact_opt()
            .map_err(|e| InputError::Io(io::Error::other(e)))
    }
}
