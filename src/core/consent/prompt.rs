//! Operator prompts
//!
//! Both consent checkpoints talk to the operator through [`ConsentPrompt`].
//! The console implementation blocks on a line of input with no timeout.

use crate::domain::Result;
use std::io::{self, BufRead, Write};

/// Something that can show a preview and ask a yes/no question
pub trait ConsentPrompt: Send {
    /// Display text (a rendered preview) to the operator
    fn show(&mut self, text: &str) -> Result<()>;

    /// Ask `question` and return whether the answer was affirmative
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Only a spelled-out `yes` approves; case and surrounding whitespace are ignored
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Prompt over a line-oriented reader and writer, stdin/stdout by default
pub struct ConsolePrompt<R = io::BufReader<io::Stdin>, W = io::Stdout> {
    input: R,
    output: W,
}

impl ConsolePrompt {
    pub fn stdio() -> Self {
        Self {
            input: io::BufReader::new(io::stdin()),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead + Send, W: Write + Send> ConsentPrompt for ConsolePrompt<R, W> {
    fn show(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;

        let mut answer = String::new();
        // EOF reads as an empty answer, which declines
        self.input.read_line(&mut answer)?;

        let approved = is_affirmative(&answer);
        tracing::debug!(approved, "Operator answered consent prompt");
        Ok(approved)
    }
}

/// Approves every checkpoint without asking (`--yes`)
///
/// Previews are still logged so the run leaves a record of what was approved.
#[derive(Debug, Default)]
pub struct AutoApprove;

impl ConsentPrompt for AutoApprove {
    fn show(&mut self, text: &str) -> Result<()> {
        tracing::info!(preview = %text, "Preview");
        Ok(())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        tracing::info!(question = %question, "Auto-approved consent checkpoint");
        Ok(true)
    }
}
