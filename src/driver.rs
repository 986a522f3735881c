//! Runs a flow against a line-oriented terminal.

use crate::error::Result;
use crate::flow::{FlowStatus, InputFlow, KeyEvent, Stage, TextInput};
use std::io;
use zeroize::Zeroizing;

/// The terminal collaborator: show a prompt, read one line, print text.
pub trait Terminal {
    /// Show `prompt` and read a line. `masked` asks for no echo.
    /// `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str, masked: bool) -> io::Result<Option<String>>;

    /// Print text as-is.
    fn print(&mut self, text: &str) -> io::Result<()>;
}

/// Drive `flow` until it completes or is cancelled.
///
/// Each line is fed as typed characters and a submit. End of input counts
/// as cancel. A completed flow prints its result before returning.
pub fn run<S, I, T>(mut flow: InputFlow<S, I>, terminal: &mut T) -> Result<InputFlow<S, I>>
where
    S: Stage,
    I: TextInput,
    T: Terminal + ?Sized,
{
    loop {
        match flow.status() {
            FlowStatus::Completed => {
                terminal.print(&flow.view())?;
                return Ok(flow);
            }
            FlowStatus::Cancelled => return Ok(flow),
            FlowStatus::Active => {}
        }

        let masked = flow.input().masked();
        let line = terminal.read_line(&flow.view(), masked)?;

        let (next, _) = match line {
            Some(line) => {
                let line = Zeroizing::new(line);
                flow.submit_line(line.trim())
            }
            None => flow.update(KeyEvent::Cancel),
        };
        flow = next;
    }
}
