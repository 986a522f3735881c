// Stdin/stdout terminal for the interactive flows

use colored::Colorize;
use signdocs::Terminal;
use std::io::{self, BufRead, Write};

pub struct StdioTerminal;

impl Terminal for StdioTerminal {
    fn read_line(&mut self, prompt: &str, masked: bool) -> io::Result<Option<String>> {
        let prompt = format!("{} ", prompt.magenta());

        if masked {
            return match rpassword::prompt_password(prompt) {
                Ok(line) => Ok(Some(line)),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
                Err(e) => Err(e),
            };
        }

        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", text)?;
        stdout.flush()
    }
}
