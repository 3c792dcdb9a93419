//! Administration CLI command lines.

use super::{ShellCommand, shell_quote};

/// Builds command lines for the administration CLI against one remote alias.
///
/// State-changing commands go through [`Drush::forced`], which adds `-y` so the
/// CLI never stops to ask; read-only commands use [`Drush::plain`].
#[derive(Debug, Clone, Copy)]
pub struct Drush<'a> {
  binary: &'a str,
  alias: &'a str,
}

impl<'a> Drush<'a> {
  pub fn new(binary: &'a str, alias: &'a str) -> Self {
    Self { binary, alias }
  }

  /// Non-interactive invocation of `command`.
  pub fn forced(&self, command: &str) -> ShellCommand {
    ShellCommand::new(format!("{} -y {} {}", self.binary, self.alias, command))
  }

  pub fn plain(&self, command: &str) -> ShellCommand {
    ShellCommand::new(format!("{} {} {}", self.binary, self.alias, command))
  }

  /// Enable one or more space-separated modules, themes or features.
  pub fn enable(&self, names: &str) -> ShellCommand {
    self.forced(&format!("en {names}"))
  }

  pub fn disable(&self, names: &str) -> ShellCommand {
    self.forced(&format!("dis {names}"))
  }

  /// Set a system variable.
  pub fn variable_set(&self, name: &str, value: &str) -> ShellCommand {
    self.forced(&format!("vset {} {}", name, shell_quote(value)))
  }

  /// Dependency build against `manifest`, run from `target` without an alias.
  ///
  /// Options are rendered as `--key=value` in declaration order.
  pub fn make(&self, target: &std::path::Path, manifest: &str, options: &[(String, String)]) -> ShellCommand {
    let mut line = format!("{} -y make", self.binary);
    for (key, value) in options {
      line.push(' ');
      line.push_str(&shell_quote(&format!("--{key}={value}")));
    }
    line.push(' ');
    line.push_str(&shell_quote(manifest));
    line.push_str(" .");
    ShellCommand::new(line).in_dir(target)
  }
}
