//! External command execution.
//!
//! Every side effect the pipeline has outside the filesystem goes through a
//! [`CommandRunner`]: the administration CLI, version control and the
//! dependency build tool are all invoked as shell command lines. Command lines
//! are assembled by [`Drush`] and [`Git`], and run by [`ShellRunner`] in
//! production or by a recording runner in tests.

mod drush;
mod git;
mod shell;

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{DEFAULT_DRUSH_COMMAND, DEFAULT_GIT_COMMAND, DRUSH_ENV_VAR, GIT_ENV_VAR, MAX_REPORTED_COMMAND_LEN};

pub use drush::Drush;
pub use git::Git;
pub use shell::ShellRunner;

/// Errors raised while running an external command.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// The command ran but reported failure. `cmd` is already shortened for display.
  #[error("the command {cmd} was not successful ({})", describe_exit(.code))]
  CmdFailed { cmd: String, code: Option<i32> },

  /// The command could not be started at all.
  #[error("failed to start {cmd}: {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },
}

impl ExecuteError {
  /// Failure for `line`, with the command text shortened for display.
  pub fn failed(line: &str, code: Option<i32>) -> Self {
    ExecuteError::CmdFailed {
      cmd: truncate_command(line),
      code,
    }
  }
}

fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {code}"),
    None => "terminated by signal".to_string(),
  }
}

/// A single shell command line plus the directory and extra environment it runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
  pub line: String,
  pub cwd: Option<PathBuf>,
  pub env: Vec<(String, String)>,
}

impl ShellCommand {
  pub fn new(line: impl Into<String>) -> Self {
    Self {
      line: line.into(),
      cwd: None,
      env: Vec::new(),
    }
  }

  /// Run from `dir` instead of the process working directory.
  pub fn in_dir(mut self, dir: &Path) -> Self {
    self.cwd = Some(dir.to_path_buf());
    self
  }

  pub fn with_env(mut self, key: &str, value: &str) -> Self {
    self.env.push((key.to_string(), value.to_string()));
    self
  }
}

impl fmt::Display for ShellCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.line)
  }
}

/// Capability to run shell commands, one at a time.
///
/// Implementations return the trimmed standard output on success and
/// [`ExecuteError::CmdFailed`] for a non-zero exit. Failures are never retried.
pub trait CommandRunner {
  fn run(&self, command: &ShellCommand) -> impl Future<Output = Result<String, ExecuteError>>;
}

/// Binaries used for the administration CLI and version control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
  pub drush: String,
  pub git: String,
}

impl Default for Tools {
  fn default() -> Self {
    Self {
      drush: DEFAULT_DRUSH_COMMAND.to_string(),
      git: DEFAULT_GIT_COMMAND.to_string(),
    }
  }
}

impl Tools {
  /// Defaults, overridden by `DRUN_DRUSH` / `DRUN_GIT` when set and non-empty.
  pub fn from_env() -> Self {
    let read = |key: &str, default: &str| {
      std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
    };
    Self {
      drush: read(DRUSH_ENV_VAR, DEFAULT_DRUSH_COMMAND),
      git: read(GIT_ENV_VAR, DEFAULT_GIT_COMMAND),
    }
  }
}

/// Collapse whitespace and cut the command to a printable length.
pub fn truncate_command(line: &str) -> String {
  let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
  if collapsed.chars().count() > MAX_REPORTED_COMMAND_LEN {
    let cut: String = collapsed.chars().take(MAX_REPORTED_COMMAND_LEN).collect();
    format!("{cut}...")
  } else {
    collapsed
  }
}

/// Quote a value as a single shell word.
pub fn shell_quote(value: &str) -> String {
  format!("'{}'", value.replace('\'', r#"'\''"#))
}
