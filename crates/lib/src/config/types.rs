//! Validated, typed build configuration.
//!
//! Every value here has already passed schema validation; stages read these
//! fields directly and never look at the raw document.

use std::path::PathBuf;

use serde::Deserialize;

/// The complete, validated build definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
  /// Repository cloned into the site subdirectory (`build.git`).
  pub repository_url: Option<String>,
  /// Target environment for administration commands, e.g. `@mysite.local` (`build.drush_alias`).
  pub remote_alias: String,
  /// Base install profile (`build.profile`).
  pub installation_profile: Option<String>,
  /// Existing dump imported after a minimal install (`build.install_db`).
  pub database_dump_path: Option<PathBuf>,
  /// Directory name of this instance under `sites/` (`build.sites_subdir`).
  pub site_subdirectory: String,
  /// Manifest handed to the dependency build tool (`build.make`).
  pub dependency_manifest: Option<DependencyManifest>,
  /// Hostname patterns routed to the site subdirectory (`build.sites`).
  pub site_aliases: Vec<String>,
  pub site: SiteSettings,
  pub database: DatabaseSettings,
  pub pre_steps: StepSection,
  pub post_steps: StepSection,
  /// Feature modules enabled by the features stage.
  pub features: Vec<String>,
  pub migration: MigrationSection,
}

impl BuildConfiguration {
  /// Install profile actually used: a dump always installs on top of the minimal profile.
  pub fn effective_profile(&self) -> Option<&str> {
    if self.database_dump_path.is_some() {
      Some(crate::consts::MINIMAL_PROFILE)
    } else {
      self.installation_profile.as_deref()
    }
  }
}

/// Dependency manifest declaration, normalized from either a bare file name or a full record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyManifest {
  pub file: String,
  /// Directory holding `file`, relative to the target; defaults to the site subdirectory.
  pub path: Option<String>,
  /// Flags passed to the build tool, in declaration order, keys kept verbatim.
  pub options: Vec<(String, String)>,
}

/// Site name and root account used by the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
  pub site_name: String,
  pub root_username: String,
  pub root_password: String,
  pub theme: Option<String>,
}

/// Database credentials for the install step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
  pub db_name: String,
  pub db_username: String,
  pub db_password: String,
  pub driver: String,
  pub host: String,
  pub port: u16,
}

impl DatabaseSettings {
  pub const DEFAULT_DRIVER: &'static str = "mysql";
  pub const DEFAULT_HOST: &'static str = "localhost";
  pub const DEFAULT_PORT: u16 = 3306;

  /// Connection URL in the form the installer expects.
  pub fn url(&self) -> String {
    format!(
      "{}://{}:{}@{}:{}/{}",
      self.driver, self.db_username, self.db_password, self.host, self.port, self.db_name
    )
  }
}

/// One entry of a step's module list: enabled on its own or together with others.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ModuleSet {
  Single(String),
  Group(Vec<String>),
}

impl ModuleSet {
  /// Space-separated module names for a single enable command.
  pub fn joined(&self) -> String {
    match self {
      ModuleSet::Single(name) => name.clone(),
      ModuleSet::Group(names) => names.join(" "),
    }
  }
}

/// Pre- or post-step section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepSection {
  pub enabled: bool,
  pub modules: Vec<ModuleSet>,
  /// Raw administration commands, passed through untouched.
  pub commands: Vec<String>,
}

/// System variable pointing migrations at a directory of source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesSource {
  pub variable: String,
  pub dir: String,
}

/// Data migration section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSection {
  pub enabled: bool,
  pub dependencies: Vec<String>,
  pub files_source: Option<FilesSource>,
  pub groups: Vec<String>,
  pub migrations: Vec<String>,
}
