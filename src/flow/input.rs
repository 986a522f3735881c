//! Line-editing text input used by every flow prompt.

use zeroize::Zeroize;

/// A single input event delivered to a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// A printable character.
    Char(char),
    /// Delete the last character.
    Backspace,
    /// Confirm the current value.
    Submit,
    /// Abort the flow.
    Cancel,
}

/// What the outer loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Nothing visible changed.
    None,
    /// The view changed and should be redrawn.
    Render,
    /// The flow is finished; stop feeding it events.
    Quit,
}

/// The capability a flow needs from a text widget.
pub trait TextInput {
    /// Current contents of the buffer.
    fn value(&self) -> &str;

    /// Replace the buffer.
    fn set_value(&mut self, value: &str);

    /// Text shown while the buffer is empty.
    fn placeholder(&self) -> &str;

    /// Replace the placeholder. Flows use it to show retry hints.
    fn set_placeholder(&mut self, placeholder: &str);

    /// Whether typed characters are echoed as `*`.
    fn masked(&self) -> bool;

    /// Turn echo masking on or off for the next answer.
    fn set_masked(&mut self, masked: bool);

    /// Apply an editing event. `Submit` and `Cancel` are left to the flow.
    fn handle_event(&mut self, event: KeyEvent) -> Command;

    /// Render the buffer, or the placeholder when empty.
    fn view(&self) -> String;
}

/// Default [`TextInput`].
///
/// Every typed character is kept; length checks belong to the stage that
/// parses the answer. Cleared contents are zeroized, since the buffer may
/// hold a private key.
#[derive(Debug, Default)]
pub struct LineInput {
    value: String,
    placeholder: String,
    masked: bool,
}

impl LineInput {
    /// An empty, unmasked input with no placeholder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextInput for LineInput {
    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: &str) {
        self.value.zeroize();
        self.value.push_str(value);
    }

    fn placeholder(&self) -> &str {
        &self.placeholder
    }

    fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    fn masked(&self) -> bool {
        self.masked
    }

    fn set_masked(&mut self, masked: bool) {
        self.masked = masked;
    }

    fn handle_event(&mut self, event: KeyEvent) -> Command {
        match event {
            KeyEvent::Char(c) => {
                self.value.push(c);
                Command::Render
            }
            KeyEvent::Backspace => match self.value.pop() {
                Some(_) => Command::Render,
                None => Command::None,
            },
            KeyEvent::Submit | KeyEvent::Cancel => Command::None,
        }
    }

    fn view(&self) -> String {
        if self.value.is_empty() {
            if self.placeholder.is_empty() {
                String::new()
            } else {
                format!("({})", self.placeholder)
            }
        } else if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

impl Drop for LineInput {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}
