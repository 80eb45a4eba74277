use std::io::{BufRead, Write};

use crate::error::Result;

/// Question/answer loop over any reader/writer pair (stdin/stdout in the CLI).
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `true` only for `y`/`yes`; end of input counts as "no".
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        writeln!(self.output, "{} y/n", question)?;
        self.output.flush()?;
        let answer = self.read_line()?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    pub fn ask(&mut self, question: &str) -> Result<String> {
        writeln!(self.output, "{}", question)?;
        self.output.flush()?;
        self.read_line()
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}
