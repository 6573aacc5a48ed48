//! Interactive questions behind the [`Prompter`] seam.
use anyhow::Result;
use inquire::{Confirm, InquireError, Text};

use crate::error::SetupError;

/// Abstraction over asking the user a question at the terminal.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync + std::fmt::Debug {
    /// Ask a yes/no question. `default` is used when the user just presses Enter.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Interrupted`] on Ctrl-C or Esc, and
    /// [`SetupError::Prompt`] if the terminal cannot be read.
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Ask for a line of free text. The answer is trimmed; empty means "skip".
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Interrupted`] on Ctrl-C or Esc, and
    /// [`SetupError::Prompt`] if the terminal cannot be read.
    fn text(&self, message: &str) -> Result<String>;
}

/// Production [`Prompter`] backed by `inquire`.
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

fn map_inquire_error(prompt: &str, err: InquireError) -> anyhow::Error {
    match err {
        InquireError::OperationInterrupted | InquireError::OperationCanceled => {
            SetupError::Interrupted.into()
        }
        other => SetupError::Prompt {
            prompt: prompt.to_string(),
            reason: other.to_string(),
        }
        .into(),
    }
}

impl Prompter for InquirePrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(|e| map_inquire_error(message, e))
    }

    fn text(&self, message: &str) -> Result<String> {
        Text::new(message)
            .prompt()
            .map(|answer| answer.trim().to_string())
            .map_err(|e| map_inquire_error(message, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_maps_to_interrupted() {
        let err = map_inquire_error("Continue?", InquireError::OperationInterrupted);
        assert!(SetupError::is_interrupted(&err));
        let err = map_inquire_error("Continue?", InquireError::OperationCanceled);
        assert!(SetupError::is_interrupted(&err));
    }

    #[test]
    fn other_errors_map_to_prompt_failure() {
        let err = map_inquire_error("Git user name", InquireError::NotTTY);
        assert!(!SetupError::is_interrupted(&err));
        assert!(err.to_string().starts_with("prompt 'Git user name' failed"));
    }
}
