//! Yes/no confirmation

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::error::{Error, Result};

/// Asks the operator a yes/no question
pub trait Confirm {
    /// `Ok(true)` when the operator agreed
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self(question))
    }
}

/// Line based prompt on a terminal or any reader/writer pair
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<StdinLock<'static>, Stdout> {
    /// Prompt on the process stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    /// Create a new prompt
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for ConsolePrompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{} (y/N): ", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .map_err(|e| Error::Prompt(format!("Failed to read answer: {}", e)))?;

        // EOF declines
        if read == 0 {
            return Ok(false);
        }

        Ok(is_yes(&answer))
    }
}

/// `y` or `yes` in any case; everything else is a no
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
