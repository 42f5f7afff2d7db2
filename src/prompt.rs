//! User-facing prompts the core needs from its host.
//!
//! Every call blocks until the user answers. Dismissing a prompt is never an
//! error: `input` and `pick` return None and `confirm` returns
//! [`Answer::Cancel`].

/// Parameters for a text-input prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRequest {
    pub title: String,
    pub placeholder: String,
    /// Pre-filled text
    pub initial: Option<String>,
}

impl InputRequest {
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            placeholder: placeholder.into(),
            initial: None,
        }
    }

    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = Some(initial.into());
        self
    }
}

/// Outcome of a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Cancel,
}

pub trait Prompt {
    /// Ask for a line of text; None when dismissed
    fn input(&mut self, request: &InputRequest) -> Option<String>;

    /// Ask a yes/no question. `accept_label` names the affirmative action
    /// ("Delete", "Overwrite").
    fn confirm(&mut self, message: &str, accept_label: &str) -> Answer;

    /// Let the user choose one of `items`; None when dismissed
    fn pick(&mut self, title: &str, items: &[String]) -> Option<usize>;

    /// Informational message
    fn notify(&mut self, message: &str);

    /// Report a failed command
    fn notify_error(&mut self, message: &str);
}

/// Prompt that answers from a pre-recorded script
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    pub inputs: std::collections::VecDeque<Option<String>>,
    pub answers: std::collections::VecDeque<Answer>,
    pub picks: std::collections::VecDeque<Option<usize>>,
    /// Every confirmation message shown, in order
    pub confirmations: Vec<String>,
    /// Every input request shown, in order
    pub requests: Vec<InputRequest>,
    pub notices: Vec<String>,
    pub errors: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, text: impl Into<String>) -> Self {
        self.inputs.push_back(Some(text.into()));
        self
    }

    pub fn with_dismissed_input(mut self) -> Self {
        self.inputs.push_back(None);
        self
    }

    pub fn with_answer(mut self, answer: Answer) -> Self {
        self.answers.push_back(answer);
        self
    }

    pub fn with_pick(mut self, index: Option<usize>) -> Self {
        self.picks.push_back(index);
        self
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn input(&mut self, request: &InputRequest) -> Option<String> {
        self.requests.push(request.clone());
        self.inputs.pop_front().flatten()
    }

    fn confirm(&mut self, message: &str, _accept_label: &str) -> Answer {
        self.confirmations.push(message.to_string());
        self.answers.pop_front().unwrap_or(Answer::Cancel)
    }

    fn pick(&mut self, _title: &str, _items: &[String]) -> Option<usize> {
        self.picks.pop_front().flatten()
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn notify_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
