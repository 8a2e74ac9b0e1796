use tracing::debug;

use super::completion::Completer;

pub const EMPTY_INPUT: &str = "Please enter some text to summarize.";
pub const PLACEHOLDER: &str = "(Summary will appear here)";
pub const LABEL_IDLE: &str = "Generate Summary";
pub const LABEL_LOADING: &str = "Generating…";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Completed,
    Failed,
}

/// State behind the summarization form.
///
/// The local error (input validation) is kept apart from the error reported
/// by the completer; when both are present the local one is shown.
#[derive(Debug, Default)]
pub struct SummaryForm {
    input: String,
    completion: String,
    local_error: Option<String>,
    request_error: Option<String>,
    phase: Phase,
}

/// Everything the page needs to render one frame of the form.
#[derive(Debug, PartialEq, Eq)]
pub struct FormView<'a> {
    pub input: &'a str,
    pub output: &'a str,
    pub error: Option<&'a str>,
    pub is_loading: bool,
    pub button_label: &'static str,
}

impl SummaryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl Into<String>) -> Self {
        Self { input: input.into(), ..Self::default() }
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_loading() { LABEL_LOADING } else { LABEL_IDLE }
    }

    pub fn output(&self) -> &str {
        if self.completion.is_empty() { PLACEHOLDER } else { &self.completion }
    }

    pub fn display_error(&self) -> Option<&str> {
        self.local_error.as_deref().or(self.request_error.as_deref())
    }

    /// Validates the input and, if it is usable, enters `Submitting` and
    /// returns the trimmed prompt to send.
    pub fn begin_submit(&mut self) -> Option<String> {
        self.local_error = None;

        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            debug!("Form submitted without text");
            self.local_error = Some(EMPTY_INPUT.to_string());
            return None;
        }

        let prompt = trimmed.to_string();
        self.completion.clear();
        self.request_error = None;
        self.phase = Phase::Submitting;
        Some(prompt)
    }

    pub fn finish_submit<E: ToString>(&mut self, result: Result<String, E>) {
        match result {
            Ok(text) => {
                self.completion = text;
                self.phase = Phase::Completed;
            }
            Err(err) => {
                self.request_error = Some(err.to_string());
                self.phase = Phase::Failed;
            }
        }
    }

    pub async fn submit<C: Completer>(&mut self, completer: &mut C) {
        if let Some(prompt) = self.begin_submit() {
            let result = completer.complete(&prompt).await;
            self.finish_submit(result);
        }
    }

    pub fn view(&self) -> FormView<'_> {
        FormView {
            input: &self.input,
            output: self.output(),
            error: self.display_error(),
            is_loading: self.is_loading(),
            button_label: self.button_label(),
        }
    }
}
