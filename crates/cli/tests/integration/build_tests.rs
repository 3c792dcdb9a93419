//! Build stage integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

const DIRTY: &str = "Changes not staged for commit:\n\tmodified:   dr7.make";

#[test]
fn nuke_wipes_target_and_clones() {
  let env = TestEnv::full();
  env.write_file("site/index.php", "<?php");
  env.write_file("site/.htaccess", "deny");

  env.drun_cmd().args(["build", "site", "--nuke"]).assert().success();

  assert!(!env.path("site/index.php").exists());
  assert!(!env.path("site/.htaccess").exists());
  assert!(env.path("site/sites/dr7").is_dir());
  assert!(env.path("site/sites/sites.php").exists());

  let commands = env.commands();
  assert_eq!(commands.len(), 1, "unexpected commands: {commands:?}");
  assert!(commands[0].starts_with("git clone git@example.com:dr7.git "));
  assert!(commands[0].ends_with("/sites/dr7"));
}

#[test]
fn declined_safety_check_leaves_target_untouched() {
  let env = TestEnv::full();
  env.write_file("site/sites/dr7/.git/HEAD", "ref: refs/heads/main\n");
  env.write_file("site/sites/dr7/local.txt", "work in progress");

  env
    .drun_cmd()
    .args(["build", "site", "--nuke"])
    .env("DRUN_TEST_GIT_STATUS", DIRTY)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Cancelled by user: working directory not clean"));

  assert!(env.path("site/sites/dr7/local.txt").exists());
  assert_eq!(env.commands(), vec!["git status"]);
}

#[test]
fn site_dir_without_repository_is_not_wiped_unasked() {
  let env = TestEnv::full();
  env.write_file("site/sites/dr7/uncommitted_work.php", "<?php");
  env.write_file(
    "bin/git",
    "#!/bin/sh\necho \"git $*\" >> \"$DRUN_TEST_LOG\"\necho 'fatal: not a git repository' >&2\nexit 128\n",
  );

  env
    .drun_cmd()
    .args(["build", "site", "--nuke"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Cancelled by user: working directory not clean"));

  assert!(env.path("site/sites/dr7/uncommitted_work.php").exists());
  assert_eq!(env.commands(), vec!["git status"]);
}

#[test]
fn unpublished_commits_are_checked_after_status() {
  let env = TestEnv::full();
  env.write_file("site/sites/dr7/.git/HEAD", "ref: refs/heads/main\n");

  env
    .drun_cmd()
    .args(["build", "site", "--nuke"])
    .env("DRUN_TEST_GIT_CHERRY", "+ 3f2c1a9 local fix\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unpublished local changes"));

  assert_eq!(env.commands(), vec!["git status", "git cherry origin"]);
}

#[test]
fn yes_confirms_safety_questions() {
  let env = TestEnv::full();
  env.write_file("site/sites/dr7/.git/HEAD", "ref: refs/heads/main\n");
  env.write_file("site/sites/dr7/local.txt", "work in progress");

  env
    .drun_cmd()
    .args(["build", "site", "--nuke", "--yes"])
    .env("DRUN_TEST_GIT_STATUS", DIRTY)
    .env("DRUN_TEST_GIT_CHERRY", "+ 3f2c1a9 local fix\n")
    .assert()
    .success();

  assert!(!env.path("site/sites/dr7/local.txt").exists());
  let commands = env.commands();
  assert_eq!(commands[..2], ["git status", "git cherry origin"]);
  assert!(commands[2].starts_with("git clone "));
}

#[test]
fn nuke_from_inside_target_is_refused() {
  let env = TestEnv::full();
  env.write_file("site/index.php", "<?php");

  env
    .drun_cmd()
    .current_dir(env.target())
    .arg("--config")
    .arg(&env.config_path)
    .args(["build", ".", "--nuke"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("within the target directory"));

  assert!(env.path("site/index.php").exists());
  assert!(env.commands().is_empty());
}

#[test]
fn failing_clone_reports_the_command() {
  let env = TestEnv::full();
  env.write_file("bin/git", "#!/bin/sh\necho \"git $*\" >> \"$DRUN_TEST_LOG\"\nexit 128\n");

  env
    .drun_cmd()
    .args(["build", "site", "--nuke"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("was not successful (exit code 128)"));

  assert!(!env.path("site/sites/sites.php").exists());
}
