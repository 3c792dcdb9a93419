//! Checks run before a working copy is thrown away.
//!
//! Before the build stage wipes the target, the existing working copy of the
//! site is inspected. A dirty working tree, or local commits missing from the
//! remote, means work would be lost; the operator then has to confirm
//! explicitly. Anything other than a "yes" aborts.

use std::path::Path;

use tracing::{info, warn};

use crate::consts::GIT_CLEAN_MESSAGES;
use crate::exec::{CommandRunner, ExecuteError, Git};

/// Asks the operator a yes/no question. `false` means abort.
pub trait Confirm {
  fn confirm(&self, question: &str) -> bool;
}

/// Answers every question with "yes", for scripted runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
  fn confirm(&self, question: &str) -> bool {
    info!(question, "assuming yes");
    true
  }
}

impl<C: Confirm + ?Sized> Confirm for &C {
  fn confirm(&self, question: &str) -> bool {
    (**self).confirm(question)
  }
}

/// Outcome of the local state check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyDecision {
  Confirmed,
  Aborted { reason: &'static str },
}

const DIRTY_QUESTION: &str =
  "Working directory not clean. Continuing will result in these changes being lost. Do you want to continue?";
const UNPUBLISHED_QUESTION: &str = "You have local changes that haven't yet been published to a remote repository. \
   Continuing will result in these changes being lost. Do you want to continue?";

/// Whether `git status` output reports a clean working copy.
pub fn is_clean_status(output: &str) -> bool {
  GIT_CLEAN_MESSAGES.iter().any(|msg| output.contains(msg))
}

/// Inspect the working copy at `repository` and ask before anything can be lost.
///
/// Runs a status inspection and a divergence check against `remote`; each one
/// that reports something at risk asks `confirm`. The first declined question
/// aborts without running further checks. A status inspection that fails
/// counts as not clean, and the divergence check is then skipped.
pub async fn check_local_state<R, C>(
  runner: &R,
  confirm: &C,
  git: Git<'_>,
  repository: &Path,
  remote: &str,
) -> Result<SafetyDecision, ExecuteError>
where
  R: CommandRunner,
  C: Confirm + ?Sized,
{
  let status = match runner.run(&git.status(repository)).await {
    Ok(output) => output,
    Err(err) => {
      // No readable repository; treat as not clean.
      warn!(path = %repository.display(), error = %err, "could not inspect working copy");
      if !confirm.confirm(DIRTY_QUESTION) {
        return Ok(SafetyDecision::Aborted {
          reason: "working directory not clean",
        });
      }
      return Ok(SafetyDecision::Confirmed);
    }
  };
  if !is_clean_status(&status) {
    warn!(path = %repository.display(), "working directory not clean");
    if !confirm.confirm(DIRTY_QUESTION) {
      return Ok(SafetyDecision::Aborted {
        reason: "working directory not clean",
      });
    }
  }

  let unpublished = runner.run(&git.cherry(repository, remote)).await?;
  if !unpublished.trim().is_empty() {
    warn!(path = %repository.display(), remote, "unpublished local commits");
    if !confirm.confirm(UNPUBLISHED_QUESTION) {
      return Ok(SafetyDecision::Aborted {
        reason: "unpublished local changes",
      });
    }
  }

  Ok(SafetyDecision::Confirmed)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::{RecordingRunner, ScriptedConfirm};

  const CLEAN: &str = "On branch main\nnothing to commit, working tree clean";
  const DIRTY: &str = "On branch main\nChanges not staged for commit:\n\tmodified:   dr7.make";

  #[test]
  fn both_clean_messages_are_recognized() {
    assert!(is_clean_status("nothing to commit, working directory clean"));
    assert!(is_clean_status(CLEAN));
    assert!(!is_clean_status(DIRTY));
  }

  #[tokio::test]
  async fn clean_and_published_needs_no_confirmation() {
    let runner = RecordingRunner::new().respond("status", CLEAN);
    let confirm = ScriptedConfirm::new(vec![]);

    let decision = check_local_state(&runner, &confirm, Git::new("git"), Path::new("/srv/site"), "origin")
      .await
      .unwrap();

    assert_eq!(decision, SafetyDecision::Confirmed);
    assert!(confirm.questions().is_empty());
    assert_eq!(runner.lines(), vec!["git status", "git cherry 'origin'"]);
  }

  #[tokio::test]
  async fn dirty_tree_declined_aborts_before_divergence_check() {
    let runner = RecordingRunner::new().respond("status", DIRTY);
    let confirm = ScriptedConfirm::new(vec![false]);

    let decision = check_local_state(&runner, &confirm, Git::new("git"), Path::new("/srv/site"), "origin")
      .await
      .unwrap();

    assert_eq!(
      decision,
      SafetyDecision::Aborted {
        reason: "working directory not clean"
      }
    );
    assert_eq!(runner.lines(), vec!["git status"]);
    assert!(confirm.questions()[0].contains("changes being lost"));
  }

  #[tokio::test]
  async fn unpublished_commits_ask_again() {
    let runner = RecordingRunner::new()
      .respond("status", DIRTY)
      .respond("cherry", "+ 3f2c1a9 local fix");
    let confirm = ScriptedConfirm::new(vec![true, false]);

    let decision = check_local_state(&runner, &confirm, Git::new("git"), Path::new("/srv/site"), "origin")
      .await
      .unwrap();

    assert_eq!(
      decision,
      SafetyDecision::Aborted {
        reason: "unpublished local changes"
      }
    );
    assert_eq!(confirm.questions().len(), 2);
  }

  #[tokio::test]
  async fn confirming_everything_proceeds() {
    let runner = RecordingRunner::new()
      .respond("status", DIRTY)
      .respond("cherry", "+ 3f2c1a9 local fix");

    let decision = check_local_state(&runner, &AssumeYes, Git::new("git"), Path::new("/srv/site"), "origin")
      .await
      .unwrap();

    assert_eq!(decision, SafetyDecision::Confirmed);
  }

  #[tokio::test]
  async fn failing_status_asks_instead_of_failing() {
    let runner = RecordingRunner::new().fail_on("status");
    let confirm = ScriptedConfirm::new(vec![false]);

    let decision = check_local_state(&runner, &confirm, Git::new("git"), Path::new("/srv/site"), "origin")
      .await
      .unwrap();

    assert_eq!(
      decision,
      SafetyDecision::Aborted {
        reason: "working directory not clean"
      }
    );
    assert_eq!(confirm.questions().len(), 1);
  }

  #[tokio::test]
  async fn failing_status_confirmed_skips_divergence_check() {
    let runner = RecordingRunner::new().fail_on("status");
    let confirm = ScriptedConfirm::new(vec![true]);

    let decision = check_local_state(&runner, &confirm, Git::new("git"), Path::new("/srv/site"), "origin")
      .await
      .unwrap();

    assert_eq!(decision, SafetyDecision::Confirmed);
    assert_eq!(runner.lines(), vec!["git status"]);
  }
}
