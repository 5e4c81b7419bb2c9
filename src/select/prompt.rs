use super::SelectionError;
use anyhow::Result;
use colored::Colorize;
use std::io::Write;

/// Source of operator answers
pub trait Prompter {
    fn ask(&mut self, message: &str) -> Result<String>;
}

/// Reads answers from the terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, message: &str) -> Result<String> {
        Ok(inquire::Text::new(message).prompt()?)
    }
}

/// Ask until `validate` accepts the answer, printing each rejection to `out`.
///
/// There is no attempt limit; the loop only ends early if the prompter errors.
pub fn prompt_until<T, F, W>(
    prompter: &mut dyn Prompter,
    out: &mut W,
    message: &str,
    validate: F,
) -> Result<T>
where
    F: Fn(&str) -> Result<T, SelectionError>,
    W: Write + ?Sized,
{
    loop {
        let answer = prompter.ask(message)?;
        match validate(&answer) {
            Ok(value) => return Ok(value),
            Err(e) => {
                log::debug!("Rejected selection {:?}: {}", answer, e);
                writeln!(out, "{}", e.to_string().red())?;
            }
        }
    }
}
