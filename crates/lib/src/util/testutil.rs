//! Test utilities for drupal-runner-lib.
//!
//! A [`RecordingRunner`] stands in for the shell so tests can assert the exact
//! command lines a stage issues, and a [`ScriptedConfirm`] answers safety
//! questions from a fixed script.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;

use crate::config::BuildConfiguration;
use crate::context::BuildContext;
use crate::exec::{CommandRunner, ExecuteError, ShellCommand};
use crate::safety::Confirm;

/// Records every command and answers from canned responses.
///
/// Responses and failures are matched by substring against the command line;
/// the first matching entry wins. Unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
  commands: RefCell<Vec<ShellCommand>>,
  responses: Vec<(String, String)>,
  failures: Vec<String>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn respond(mut self, needle: &str, stdout: &str) -> Self {
    self.responses.push((needle.to_string(), stdout.to_string()));
    self
  }

  pub fn fail_on(mut self, needle: &str) -> Self {
    self.failures.push(needle.to_string());
    self
  }

  pub fn commands(&self) -> Vec<ShellCommand> {
    self.commands.borrow().clone()
  }

  pub fn lines(&self) -> Vec<String> {
    self.commands.borrow().iter().map(|c| c.line.clone()).collect()
  }
}

impl CommandRunner for RecordingRunner {
  async fn run(&self, command: &ShellCommand) -> Result<String, ExecuteError> {
    self.commands.borrow_mut().push(command.clone());

    if self.failures.iter().any(|needle| command.line.contains(needle.as_str())) {
      return Err(ExecuteError::failed(&command.line, Some(1)));
    }

    Ok(
      self
        .responses
        .iter()
        .find(|(needle, _)| command.line.contains(needle.as_str()))
        .map(|(_, stdout)| stdout.clone())
        .unwrap_or_default(),
    )
  }
}

/// Answers questions in order; once the script runs out every answer is "no".
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
  answers: RefCell<VecDeque<bool>>,
  questions: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
  pub fn new(answers: Vec<bool>) -> Self {
    Self {
      answers: RefCell::new(answers.into()),
      questions: RefCell::new(Vec::new()),
    }
  }

  pub fn questions(&self) -> Vec<String> {
    self.questions.borrow().clone()
  }
}

impl Confirm for ScriptedConfirm {
  fn confirm(&self, question: &str) -> bool {
    self.questions.borrow_mut().push(question.to_string());
    self.answers.borrow_mut().pop_front().unwrap_or(false)
  }
}

/// A configuration exercising every section.
pub const FULL_CONFIG: &str = r#"
build:
  git: git@example.com:dr7.git
  drush_alias: "@dr7.local"
  profile: standard
  sites_subdir: dr7
  make:
    file: dr7.make
    options:
      working-copy: true
  sites:
    - a.example.com
    - b.example.com
site:
  site_name: Drupal 7
  root_username: admin
  root_password: admin
  theme: dr7_theme
database:
  db_name: dr7
  db_username: root
  db_password: root
pre:
  enabled: true
  modules:
    - token
    - [views, views_ui]
  commands:
    - vset site_mail noreply@example.com
post:
  enabled: true
  commands:
    - block-configure --module=user --delta=online --region=sidebar_first
features:
  - dr7_news
  - dr7_events
migrate:
  enabled: true
  dependencies: [migrate_d2d, migrate_extras]
  source:
    files:
      variable: dr7_file_migration
      dir: /var/www/old/files
  groups: [g1, g2]
  migrations: [m1]
"#;

pub fn full_config() -> BuildConfiguration {
  BuildConfiguration::from_yaml(FULL_CONFIG).unwrap()
}

/// Context targeting `dir`, with a working directory outside of it.
pub fn context_in(dir: &Path, config: BuildConfiguration) -> BuildContext {
  BuildContext::new(dir, dir.join("build.yml"), config)
    .unwrap()
    .with_working_dir(Path::new("/"))
}
