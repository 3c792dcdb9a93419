//! Review command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn enabled_features_pass_review() {
  let env = TestEnv::full();

  env
    .drun_cmd()
    .args(["review", "site"])
    .env("DRUN_TEST_PM_LIST", r#"{"dr7_news": {"status": "Enabled"}}"#)
    .assert()
    .success()
    .stdout(predicate::str::contains("All 1 features enabled"));

  assert_eq!(env.commands(), vec!["drush @dr7.local pm-list --format=json"]);
}

#[test]
fn disabled_feature_fails_review() {
  let env = TestEnv::full();

  env
    .drun_cmd()
    .args(["review", "site", "--json"])
    .env("DRUN_TEST_PM_LIST", r#"{"dr7_news": {"status": "Disabled"}}"#)
    .assert()
    .failure()
    .stdout(predicate::str::contains("\"missing_features\""))
    .stderr(predicate::str::contains("1 of 1 features not enabled"));
}
