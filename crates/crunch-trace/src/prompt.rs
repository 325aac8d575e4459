use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crunch_core::{CrunchError, ErrorInfo};

/// Picks one of several commits that share a content hash.
pub trait Chooser {
    /// Returns the selected candidate. Only called with two or more candidates.
    fn choose(&mut self, prompt: &str, candidates: &[String]) -> Result<String, CrunchError>;
}

/// Yes/no confirmation before a destructive step.
pub trait Confirm {
    /// Returns `true` when the operator agrees to proceed.
    fn confirm(&mut self, question: &str) -> Result<bool, CrunchError>;
}

/// Line oriented operator prompt over any reader/writer pair.
#[derive(Debug)]
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<StdinLock<'static>, Stdout> {
    /// Prompt bound to the process stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    /// Wraps an input source and an output sink.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the prompt returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, text: &str) -> Result<Option<String>, CrunchError> {
        write!(self.output, "{text} ")
            .and_then(|_| self.output.flush())
            .map_err(prompt_error)?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(prompt_error)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn prompt_error(err: io::Error) -> CrunchError {
    CrunchError::Input(ErrorInfo::new("prompt-io", err.to_string()))
}

impl<R: BufRead, W: Write> Chooser for Prompt<R, W> {
    fn choose(&mut self, prompt: &str, candidates: &[String]) -> Result<String, CrunchError> {
        for (idx, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, " [{}] {}", idx + 1, candidate).map_err(prompt_error)?;
        }
        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Err(CrunchError::Input(
                    ErrorInfo::new("prompt-eof", "input closed before a candidate was chosen")
                        .with_context("prompt", prompt),
                ));
            };
            if let Ok(choice) = answer.parse::<usize>() {
                if (1..=candidates.len()).contains(&choice) {
                    return Ok(candidates[choice - 1].clone());
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool, CrunchError> {
        Ok(self.ask(question)?.as_deref() == Some("yes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn candidates() -> Vec<String> {
        vec!["aaaa".to_string(), "bbbb".to_string(), "cccc".to_string()]
    }

    #[test]
    fn choose_retries_until_valid_selection() {
        let mut prompt = Prompt::new(Cursor::new("x\n0\n4\n 2 \n"), Vec::new());
        let picked = prompt.choose("abc depends on?", &candidates()).unwrap();
        assert_eq!(picked, "bbbb");

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert!(output.starts_with(" [1] aaaa\n [2] bbbb\n [3] cccc\n"));
        assert_eq!(output.matches("abc depends on? ").count(), 4);
    }

    #[test]
    fn choose_fails_on_closed_input() {
        let mut prompt = Prompt::new(Cursor::new("9\n"), Vec::new());
        let err = prompt.choose("p", &candidates()).unwrap_err();
        assert_eq!(err.info().code, "prompt-eof");
    }

    #[test]
    fn confirm_requires_literal_yes() {
        for (input, expected) in [("yes\n", true), (" yes \n", true), ("y\n", false), ("\n", false), ("", false)] {
            let mut prompt = Prompt::new(Cursor::new(input), Vec::new());
            assert_eq!(prompt.confirm("continue?").unwrap(), expected, "input {input:?}");
        }
    }
}
