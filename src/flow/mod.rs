//! The prompt/validate/advance state machine shared by all operations.
//!
//! A flow is a [`Stage`] (what to ask and how to parse the answer) paired
//! with a [`TextInput`] (where the answer is typed). Events are applied
//! with [`InputFlow::update`], which takes the flow by value and hands back
//! its successor together with a [`Command`] for the outer loop.
//!
//! A rejected answer clears the buffer, puts the error in the placeholder
//! and leaves the stage where it was. Cancel aborts from any stage that is
//! not terminal. Once terminal, every event yields [`Command::Quit`].

pub mod input;

pub use input::{Command, KeyEvent, LineInput, TextInput};

use crate::error::Result;
use tracing::{debug, warn};

/// How a stage wants its answer collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    /// The question shown before the buffer.
    pub label: &'static str,
    /// Shown while the buffer is empty, until a retry hint replaces it.
    pub placeholder: &'static str,
    /// Echo typed characters as `*`.
    pub masked: bool,
}

impl Prompt {
    /// A plain, unmasked prompt with no placeholder.
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            placeholder: "",
            masked: false,
        }
    }

    /// Set the initial placeholder.
    pub const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Mask the answer, for secrets.
    pub const fn masked(mut self) -> Self {
        self.masked = true;
        self
    }
}

/// One operation's sequence of questions.
pub trait Stage {
    /// The question asked in the current state. Only called while the
    /// stage is not terminal.
    fn prompt(&self) -> Prompt;

    /// Parse `answer` and advance. On error the stage must be unchanged.
    fn submit(&mut self, answer: &str) -> Result<()>;

    /// Whether the final result is available.
    fn is_terminal(&self) -> bool;

    /// The final result text. Only meaningful once terminal.
    fn summary(&self) -> String;

    /// Placeholder shown after a rejected answer.
    fn retry_hint(&self, error: &crate::SignError) -> String {
        format!("{}, try again", error)
    }
}

/// Lifecycle of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStatus {
    Active,
    Completed,
    Cancelled,
}

/// A stage driven by text input events.
#[derive(Debug)]
pub struct InputFlow<S, I = LineInput> {
    stage: S,
    input: I,
    status: FlowStatus,
    rejections: usize,
}

impl<S: Stage> InputFlow<S, LineInput> {
    /// Drive `stage` through a fresh [`LineInput`].
    pub fn new(stage: S) -> Self {
        Self::with_input(stage, LineInput::new())
    }
}

impl<S: Stage, I: TextInput> InputFlow<S, I> {
    /// Drive `stage` through a custom text widget.
    pub fn with_input(stage: S, input: I) -> Self {
        let mut flow = Self {
            stage,
            input,
            status: FlowStatus::Active,
            rejections: 0,
        };
        flow.sync_status();
        flow
    }

    /// Apply one event and return the successor flow.
    pub fn update(mut self, event: KeyEvent) -> (Self, Command) {
        if self.status != FlowStatus::Active {
            return (self, Command::Quit);
        }

        match event {
            KeyEvent::Cancel => {
                debug!("flow cancelled");
                self.input.set_value("");
                self.status = FlowStatus::Cancelled;
                (self, Command::Quit)
            }
            KeyEvent::Submit => {
                let answer = zeroize::Zeroizing::new(self.input.value().to_string());
                self.input.set_value("");

                match self.stage.submit(&answer) {
                    Ok(()) => {
                        self.sync_status();
                        debug!(status = ?self.status, "answer accepted");
                    }
                    Err(e) => {
                        if e.is_input_error() {
                            debug!(error = %e, "answer rejected");
                        } else {
                            warn!(error = %e, "answer rejected");
                        }
                        self.rejections += 1;
                        let hint = self.stage.retry_hint(&e);
                        self.input.set_placeholder(&hint);
                    }
                }
                (self, Command::Render)
            }
            other => {
                let command = self.input.handle_event(other);
                (self, command)
            }
        }
    }

    /// Feed a whole line as typed characters followed by a submit.
    pub fn submit_line(self, line: &str) -> (Self, Command) {
        let mut flow = self;
        for c in line.chars() {
            let (next, _) = flow.update(KeyEvent::Char(c));
            flow = next;
        }
        flow.update(KeyEvent::Submit)
    }

    /// Where the flow is in its lifecycle.
    pub fn status(&self) -> FlowStatus {
        self.status
    }

    /// The operation being driven, for reading its results.
    pub fn stage(&self) -> &S {
        &self.stage
    }

    /// Consume the flow and keep the stage.
    pub fn into_stage(self) -> S {
        self.stage
    }

    /// The text widget, configured for the current question.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Number of answers rejected so far.
    pub fn rejections(&self) -> usize {
        self.rejections
    }

    /// The current question, or `None` once the flow has ended.
    pub fn prompt(&self) -> Option<Prompt> {
        match self.status {
            FlowStatus::Active => Some(self.stage.prompt()),
            _ => None,
        }
    }

    /// Render the flow: the question and buffer while active, the result
    /// once completed, nothing after a cancel.
    pub fn view(&self) -> String {
        match self.status {
            FlowStatus::Active => {
                let buffer = self.input.view();
                if buffer.is_empty() {
                    self.stage.prompt().label.to_string()
                } else {
                    format!("{} {}", self.stage.prompt().label, buffer)
                }
            }
            FlowStatus::Completed => self.stage.summary(),
            FlowStatus::Cancelled => String::new(),
        }
    }

    // Move to Completed, or configure the widget for the next question.
    fn sync_status(&mut self) {
        if self.stage.is_terminal() {
            self.status = FlowStatus::Completed;
            return;
        }
        let prompt = self.stage.prompt();
        self.input.set_placeholder(prompt.placeholder);
        self.input.set_masked(prompt.masked);
    }
}
