//! Scripted input for tests

use super::input::{InputError, Result, UserInput};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One prepared answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAnswer {
    Text(String),
    /// Pick the first item whose label contains this text
    Select(String),
    /// Dismiss whatever is asked
    Dismiss,
}

/// Replays prepared answers in order
///
/// Select answers are matched by label rather than index, so scripts keep
/// working when menus gain entries.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: Mutex<VecDeque<ScriptedAnswer>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts seen so far, in order
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    fn next(&self, prompt: &str) -> Result<ScriptedAnswer> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .ok_or_else(|| InputError::Unexpected(format!("no answer left for '{prompt}'")))
    }
}

impl UserInput for ScriptedInput {
    fn prompt_text(&self, prompt: &str, _allow_empty: bool) -> Result<Option<String>> {
        match self.next(prompt)? {
            ScriptedAnswer::Text(text) => Ok(Some(text)),
            ScriptedAnswer::Dismiss => Ok(None),
            other => Err(InputError::Unexpected(format!("{other:?} for text prompt '{prompt}'"))),
        }
    }

    fn prompt_select(
        &self,
        prompt: &str,
        items: &[String],
        _default: Option<usize>,
    ) -> Result<Option<usize>> {
        match self.next(prompt)? {
            ScriptedAnswer::Select(needle) => items
                .iter()
                .position(|item| item.contains(&needle))
                .map(Some)
                .ok_or_else(|| InputError::Unexpected(format!("no item matching '{needle}' in {items:?}"))),
            ScriptedAnswer::Dismiss => Ok(None),
            other => Err(InputError::Unexpected(format!("{other:?} for select prompt '{prompt}'"))),
        }
    }
}
