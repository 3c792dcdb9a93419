//! Version-control command lines.

use std::path::Path;

use super::{ShellCommand, shell_quote};

/// Builds git command lines.
///
/// Inspection commands force the C locale so their output can be matched
/// against known messages.
#[derive(Debug, Clone, Copy)]
pub struct Git<'a> {
  binary: &'a str,
}

impl<'a> Git<'a> {
  pub fn new(binary: &'a str) -> Self {
    Self { binary }
  }

  pub fn clone_repo(&self, url: &str, destination: &Path) -> ShellCommand {
    ShellCommand::new(format!(
      "{} clone {} {}",
      self.binary,
      shell_quote(url),
      shell_quote(&destination.to_string_lossy())
    ))
  }

  pub fn status(&self, repository: &Path) -> ShellCommand {
    ShellCommand::new(format!("{} status", self.binary))
      .in_dir(repository)
      .with_env("LC_ALL", "C")
  }

  /// Lists commits present locally but not on `remote`.
  pub fn cherry(&self, repository: &Path, remote: &str) -> ShellCommand {
    ShellCommand::new(format!("{} cherry {}", self.binary, shell_quote(remote)))
      .in_dir(repository)
      .with_env("LC_ALL", "C")
  }
}
