//! Fixed names, paths and snippets shared across the build stages.

/// Build definition file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "build.yml";

/// Administration CLI binary used when `DRUN_DRUSH` is unset.
pub const DEFAULT_DRUSH_COMMAND: &str = "drush";

/// Version-control binary used when `DRUN_GIT` is unset.
pub const DEFAULT_GIT_COMMAND: &str = "git";

/// Environment variable overriding the administration CLI binary.
pub const DRUSH_ENV_VAR: &str = "DRUN_DRUSH";

/// Environment variable overriding the version-control binary.
pub const GIT_ENV_VAR: &str = "DRUN_GIT";

/// Remote compared against when looking for unpublished local commits.
pub const DEFAULT_GIT_REMOTE: &str = "origin";

/// Status messages git prints for a clean working copy (older and newer wording).
pub const GIT_CLEAN_MESSAGES: [&str; 2] = [
  "nothing to commit, working directory clean",
  "nothing to commit, working tree clean",
];

/// Leading character that marks a remote alias.
pub const ALIAS_SIGIL: char = '@';

/// Install profile forced when building from a database dump.
pub const MINIMAL_PROFILE: &str = "minimal";

/// Theme shipped as the platform default, disabled once a custom theme is set.
pub const PLATFORM_DEFAULT_THEME: &str = "bartik";

/// Modules enabled before any migration runs.
pub const MIGRATION_SUPPORT_MODULES: [&str; 2] = ["migrate", "migrate_ui"];

/// Patterns removed from the target root during cleanup.
pub const UNWANTED_FILE_PATTERNS: [&str; 4] = ["*txt", "install.php", "scripts", "web.config"];

/// Directory holding the per-site subdirectories and the routing file.
pub const SITES_DIR: &str = "sites";

/// Routing file name inside [`SITES_DIR`].
pub const SITES_FILE: &str = "sites.php";

/// Settings file name inside the site subdirectory.
pub const SETTINGS_FILE: &str = "settings.php";

/// Snippet appended to the settings file so environment overrides get loaded.
pub const ENVIRONMENT_SETTINGS_SNIPPET: &str = "// Include environment specific settings.
if (file_exists(conf_path() . '/settings.local.php')) {
  include_once 'settings.local.php';
}
";

/// Longest command text kept in failure messages.
pub const MAX_REPORTED_COMMAND_LEN: usize = 50;
