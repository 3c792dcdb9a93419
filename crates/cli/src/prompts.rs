use anyhow::{Result, bail};
use std::io::{self, IsTerminal, Write};

use drupal_runner_lib::safety::Confirm;

use crate::output::print_warning;

pub fn confirm(message: &str) -> Result<bool> {
  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!("Cannot prompt for confirmation in non-interactive mode. Use --yes to proceed.");
  }

  write!(io::stderr(), "{} [y/N] ", message)?;
  io::stderr().flush()?;

  let mut input = String::new();
  io::stdin().read_line(&mut input)?;

  Ok(is_affirmative(&input))
}

fn is_affirmative(input: &str) -> bool {
  matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Asks safety questions on the terminal. Anything but an explicit yes, including
/// not being able to ask at all, counts as no.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
  fn confirm(&self, question: &str) -> bool {
    match confirm(question) {
      Ok(answer) => answer,
      Err(err) => {
        print_warning(question);
        print_warning(&err.to_string());
        false
      }
    }
  }
}
