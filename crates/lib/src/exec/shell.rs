//! Shell-backed [`CommandRunner`].

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{CommandRunner, ExecuteError, ShellCommand, truncate_command};

/// Runs command lines through the system shell, inheriting the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
  pub fn new() -> Self {
    Self
  }
}

impl CommandRunner for ShellRunner {
  async fn run(&self, command: &ShellCommand) -> Result<String, ExecuteError> {
    info!(cmd = %truncate_command(&command.line), "executing command");

    let (shell_cmd, shell_args) = get_shell();

    let mut process = Command::new(&shell_cmd);
    process.args(&shell_args).arg(&command.line);
    if let Some(dir) = &command.cwd {
      process.current_dir(dir);
    }
    for (key, value) in &command.env {
      process.env(key, value);
    }

    debug!(shell = %shell_cmd, working_dir = ?command.cwd, "spawning process");

    let output = process.output().await.map_err(|source| ExecuteError::Spawn {
      cmd: truncate_command(&command.line),
      source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
      if !stderr.is_empty() {
        warn!(stderr = %stderr.trim(), "command stderr");
      }
      if !stdout.is_empty() {
        debug!(stdout = %stdout, "command stdout");
      }
      return Err(ExecuteError::failed(&command.line, output.status.code()));
    }

    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command output");
    }
    if !stderr.is_empty() {
      debug!(stderr = %stderr.trim(), "command stderr");
    }

    Ok(stdout)
  }
}

/// Shell binary and the argument that introduces a command string.
///
/// Always the plain system shell, so no user profile is sourced.
fn get_shell() -> (String, Vec<String>) {
  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    ("cmd.exe".to_string(), vec!["/C".to_string()])
  }
}
