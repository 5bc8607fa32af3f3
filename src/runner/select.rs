//! Script selection
//!
//! Resolves which script to run: the name given on the command line, or the
//! user's pick from an interactive list.

use crate::error::{SelectError, SelectResult};
use crate::scripts::ScriptEntry;
use crate::ui;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

/// One labelled choice shown by a `Prompt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

/// Single-choice prompt
pub trait Prompt {
    /// Show `choices` and return the chosen index, or `None` if the user
    /// dismissed the prompt
    fn select(&self, message: &str, choices: &[Choice], page_size: usize) -> SelectResult<Option<usize>>;
}

/// Terminal prompt backed by dialoguer
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        TerminalPrompt {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn select(&self, message: &str, choices: &[Choice], page_size: usize) -> SelectResult<Option<usize>> {
        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(&labels)
            .default(0)
            .max_length(page_size)
            .interact_opt()
            .map_err(|e| SelectError::Prompt(e.to_string()))
    }
}

/// Picks the script to run
pub struct Selector<'p> {
    prompt: &'p dyn Prompt,
    page_size: usize,
}

impl<'p> Selector<'p> {
    pub fn new(prompt: &'p dyn Prompt, page_size: usize) -> Self {
        Selector { prompt, page_size }
    }

    /// Resolve the script name.
    ///
    /// A requested name is returned untouched; it is looked up later, when
    /// the script is executed.
    pub fn resolve(&self, requested: Option<&str>, registry: &[ScriptEntry]) -> SelectResult<String> {
        if let Some(name) = requested {
            return Ok(name.to_string());
        }

        if registry.is_empty() {
            return Err(SelectError::NoScriptsFound);
        }

        let choices: Vec<Choice> = registry
            .iter()
            .map(|s| Choice {
                label: ui::choice_label(s),
                value: s.name().to_string(),
            })
            .collect();

        let index = self
            .prompt
            .select("Choose a script to run:", &choices, self.page_size)?
            .ok_or(SelectError::SelectionCancelled)?;

        choices
            .into_iter()
            .nth(index)
            .map(|c| c.value)
            .ok_or_else(|| SelectError::Prompt(format!("Prompt returned invalid index {}", index)))
    }
}
