//! Shared test helpers for CLI integration tests.
//!
//! Each test runs `drun` against stand-in `drush` and `git` scripts that log
//! their arguments, so the exact command sequence can be asserted without the
//! real tools installed.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Logs `drush <args>`; fails when the arguments contain `$DRUN_TEST_FAIL_ON`.
/// `pm-list` prints `$DRUN_TEST_PM_LIST`.
const FAKE_DRUSH: &str = r#"#!/bin/sh
echo "drush $*" >> "$DRUN_TEST_LOG"
if [ -n "$DRUN_TEST_FAIL_ON" ]; then
  case "$*" in
    *"$DRUN_TEST_FAIL_ON"*) echo "drush: $* failed" >&2; exit 1 ;;
  esac
fi
case "$*" in
  *pm-list*) printf '%s' "$DRUN_TEST_PM_LIST" ;;
esac
exit 0
"#;

/// Logs `git <args>`; `clone` creates the destination, `status` and `cherry`
/// print `$DRUN_TEST_GIT_STATUS` / `$DRUN_TEST_GIT_CHERRY`.
const FAKE_GIT: &str = r#"#!/bin/sh
echo "git $*" >> "$DRUN_TEST_LOG"
case "$1" in
  clone) mkdir -p "$3" ;;
  status) echo "${DRUN_TEST_GIT_STATUS:-nothing to commit, working tree clean}" ;;
  cherry) printf '%s' "$DRUN_TEST_GIT_CHERRY" ;;
esac
exit 0
"#;

/// Build definition exercising every stage.
pub const FULL_CONFIG: &str = r#"
build:
  git: git@example.com:dr7.git
  drush_alias: "@dr7.local"
  profile: standard
  sites_subdir: dr7
  make: dr7.make
  sites:
    - dr7.local
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
features:
  - dr7_news
migrate:
  enabled: true
  groups: [g1, g2]
  migrations: [m1]
post:
  enabled: true
  commands:
    - vset site_slogan hello
"#;

/// Isolated test environment.
///
/// Lays out `build.yml`, an empty `site/` target, and a `bin/` directory with
/// the fake tools.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  /// Create an environment with `config` as its build definition.
  pub fn with_config(config: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("build.yml");
    std::fs::write(&config_path, config).unwrap();
    std::fs::create_dir_all(temp.path().join("site")).unwrap();

    let env = Self { temp, config_path };
    env.write_script("bin/drush", FAKE_DRUSH);
    env.write_script("bin/git", FAKE_GIT);
    env
  }

  pub fn full() -> Self {
    Self::with_config(FULL_CONFIG)
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  fn write_script(&self, relative_path: &str, content: &str) {
    self.write_file(relative_path, content);
    let path = self.temp.path().join(relative_path);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Lay out an installed site: the cloned site directory and its settings file.
  pub fn installed_site(&self) {
    self.write_file("site/sites/dr7/settings.php", "<?php\n");
  }

  pub fn target(&self) -> PathBuf {
    self.temp.path().join("site")
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.temp.path().join(relative_path)
  }

  fn log_path(&self) -> PathBuf {
    self.temp.path().join("commands.log")
  }

  /// Every fake tool invocation so far, in order.
  pub fn commands(&self) -> Vec<String> {
    std::fs::read_to_string(self.log_path())
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  /// Get a pre-configured Command for the drun binary.
  ///
  /// Runs from the temp directory (outside the target) with the fake tools
  /// selected through `DRUN_DRUSH` / `DRUN_GIT`.
  pub fn drun_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("drun");
    cmd.current_dir(self.temp.path());
    cmd.env("DRUN_DRUSH", bin(self.temp.path(), "drush"));
    cmd.env("DRUN_GIT", bin(self.temp.path(), "git"));
    cmd.env("DRUN_TEST_LOG", self.log_path());
    cmd.env_remove("DRUN_TEST_FAIL_ON");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

fn bin(root: &Path, name: &str) -> PathBuf {
  root.join("bin").join(name)
}
