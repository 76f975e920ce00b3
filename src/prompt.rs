//! Interactive checkpoints.
//!
//! Logging in and choosing search filters happen by hand in the browser
//! window; the run pauses at a [`Checkpoint`] until the user confirms.

use log::info;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

pub trait Prompter {
    /// Print `question` and return the answer without its line ending
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Line-based prompts over any reader/writer pair
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompter<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// A point where the run waits for the user to finish something in the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Login,
    Filters,
}

impl Checkpoint {
    pub fn question(&self) -> &'static str {
        match self {
            Checkpoint::Login => "Log in to your account in the browser window, then press Enter: ",
            Checkpoint::Filters => "Set your search filters, if any, then press Enter: ",
        }
    }
}

/// Block until the user confirms the checkpoint. Any answer continues.
pub fn confirm(prompter: &mut dyn Prompter, checkpoint: Checkpoint) -> io::Result<()> {
    prompter.ask(checkpoint.question())?;
    info!("Checkpoint {:?} confirmed", checkpoint);
    Ok(())
}

/// Optional sub-directory of the output directory, `None` when left blank
pub fn ask_custom_dir(prompter: &mut dyn Prompter) -> io::Result<Option<String>> {
    let answer =
        prompter.ask("Directory name to store the results in (e.g. vegetarian), blank for none: ")?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

/// The locale part of the site domain, e.g. `de` or `co.uk`
pub fn ask_locale(prompter: &mut dyn Prompter, base_domain: &str) -> io::Result<String> {
    loop {
        let answer = prompter.ask(&format!(
            "Complete the website domain: https://{}.",
            base_domain
        ))?;
        let locale = answer.trim().trim_matches(|c| c == '.' || c == '/');
        if !locale.is_empty() {
            return Ok(locale.to_string());
        }
    }
}
