//! Raw document shape and its validation into [`BuildConfiguration`].
//!
//! The raw structs mirror the YAML keys exactly and keep everything optional so
//! that missing values surface as validation errors naming the key, rather than
//! as opaque deserialization failures.

use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use super::ConfigError;
use super::types::{
  BuildConfiguration, DatabaseSettings, DependencyManifest, FilesSource, MigrationSection, ModuleSet, SiteSettings,
  StepSection,
};
use crate::consts::ALIAS_SIGIL;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawDocument {
  build: Option<RawBuild>,
  site: Option<RawSite>,
  database: Option<RawDatabase>,
  pre: Option<RawSteps>,
  post: Option<RawSteps>,
  features: Option<Vec<String>>,
  migrate: Option<RawMigrate>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBuild {
  git: Option<String>,
  drush_alias: Option<String>,
  profile: Option<String>,
  install_db: Option<String>,
  sites_subdir: Option<String>,
  make: Option<Value>,
  sites: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMakeDetail {
  file: Option<String>,
  path: Option<String>,
  options: Option<Mapping>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
  site_name: Option<String>,
  root_username: Option<String>,
  root_password: Option<String>,
  theme: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDatabase {
  db_name: Option<String>,
  db_username: Option<String>,
  db_password: Option<String>,
  driver: Option<String>,
  host: Option<String>,
  port: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSteps {
  enabled: Option<bool>,
  modules: Option<Vec<ModuleSet>>,
  commands: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMigrate {
  enabled: Option<bool>,
  dependencies: Option<Vec<String>>,
  source: Option<RawMigrateSource>,
  groups: Option<Vec<String>>,
  migrations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMigrateSource {
  files: Option<RawFilesSource>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFilesSource {
  variable: Option<String>,
  dir: Option<String>,
}

fn invalid(field: impl Into<String>, rule: impl Into<String>) -> ConfigError {
  ConfigError::Validation {
    field: field.into(),
    rule: rule.into(),
  }
}

fn required(field: &str, value: Option<String>) -> Result<String, ConfigError> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v),
    Some(_) => Err(invalid(field, "must not be empty")),
    None => Err(invalid(field, "is required")),
  }
}

fn optional(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

fn non_empty_entries(field: &str, entries: Option<Vec<String>>) -> Result<Vec<String>, ConfigError> {
  let entries = entries.unwrap_or_default();
  if let Some(index) = entries.iter().position(|e| e.trim().is_empty()) {
    return Err(invalid(format!("{field}[{index}]"), "entries must not be empty"));
  }
  Ok(entries)
}

impl RawDocument {
  /// Validate the raw document, producing a fully typed configuration.
  ///
  /// The first violation found is returned; nothing partial is ever produced.
  pub(super) fn validate(self) -> Result<BuildConfiguration, ConfigError> {
    let build = self.build.ok_or_else(|| invalid("build", "section is required"))?;

    let remote_alias = required("build.drush_alias", build.drush_alias)?;
    if !remote_alias.starts_with(ALIAS_SIGIL) || remote_alias.len() == ALIAS_SIGIL.len_utf8() {
      return Err(invalid(
        "build.drush_alias",
        format!("remote aliases must be specified with a leading '{ALIAS_SIGIL}'"),
      ));
    }
    if remote_alias.chars().any(char::is_whitespace) {
      return Err(invalid("build.drush_alias", "remote aliases must not contain whitespace"));
    }

    let site_subdirectory = required("build.sites_subdir", build.sites_subdir)?;
    if site_subdirectory.contains(['/', '\\']) || site_subdirectory == "." || site_subdirectory == ".." {
      return Err(invalid(
        "build.sites_subdir",
        "site subdirectories must be a single directory name",
      ));
    }

    let dependency_manifest = build.make.map(normalize_make).transpose()?;
    let site_aliases = non_empty_entries("build.sites", build.sites)?;

    let site = self.site.ok_or_else(|| invalid("site", "section is required"))?;
    let site = SiteSettings {
      site_name: required("site.site_name", site.site_name)?,
      root_username: required("site.root_username", site.root_username)?,
      root_password: required("site.root_password", site.root_password)?,
      theme: optional(site.theme),
    };

    let database = self.database.ok_or_else(|| invalid("database", "section is required"))?;
    let database = DatabaseSettings {
      db_name: required("database.db_name", database.db_name)?,
      db_username: required("database.db_username", database.db_username)?,
      db_password: required("database.db_password", database.db_password)?,
      driver: optional(database.driver).unwrap_or_else(|| DatabaseSettings::DEFAULT_DRIVER.to_string()),
      host: optional(database.host).unwrap_or_else(|| DatabaseSettings::DEFAULT_HOST.to_string()),
      port: database.port.unwrap_or(DatabaseSettings::DEFAULT_PORT),
    };

    Ok(BuildConfiguration {
      repository_url: optional(build.git),
      remote_alias,
      installation_profile: optional(build.profile),
      database_dump_path: optional(build.install_db).map(PathBuf::from),
      site_subdirectory,
      dependency_manifest,
      site_aliases,
      site,
      database,
      pre_steps: validate_steps("pre", self.pre)?,
      post_steps: validate_steps("post", self.post)?,
      features: non_empty_entries("features", self.features)?,
      migration: validate_migrate(self.migrate)?,
    })
  }
}

/// `make` accepts a bare file name as shorthand for `{ file: <name> }`.
///
/// The mapping form is decoded separately so an unknown key inside it is
/// reported by name.
fn normalize_make(make: Value) -> Result<DependencyManifest, ConfigError> {
  let detail = match make {
    Value::String(file) => RawMakeDetail {
      file: Some(file),
      path: None,
      options: None,
    },
    Value::Mapping(_) => serde_yaml::from_value::<RawMakeDetail>(make)
      .map_err(|err| invalid("build.make", err.to_string()))?,
    _ => return Err(invalid("build.make", "must be a file name or a mapping")),
  };

  let file = match detail.file {
    Some(f) if !f.trim().is_empty() => f,
    _ => return Err(invalid("build.make.file", "a make file is required when make is declared")),
  };

  let mut options = Vec::new();
  for (key, value) in detail.options.unwrap_or_default() {
    let key = scalar_to_string(&key)
      .filter(|k| !k.is_empty())
      .ok_or_else(|| invalid("build.make.options", "option names must be non-empty scalars"))?;
    let value = scalar_to_string(&value)
      .ok_or_else(|| invalid(format!("build.make.options.{key}"), "option values must be scalars"))?;
    options.push((key, value));
  }

  Ok(DependencyManifest {
    file,
    path: optional(detail.path),
    options,
  })
}

fn scalar_to_string(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

fn validate_steps(section: &str, raw: Option<RawSteps>) -> Result<StepSection, ConfigError> {
  let Some(raw) = raw else {
    return Ok(StepSection::default());
  };
  let enabled = raw.enabled.unwrap_or(false);
  let modules = raw.modules.unwrap_or_default();
  let commands = raw.commands.unwrap_or_default();

  if enabled {
    for (index, set) in modules.iter().enumerate() {
      let empty = match set {
        ModuleSet::Single(name) => name.trim().is_empty(),
        ModuleSet::Group(names) => names.is_empty() || names.iter().any(|n| n.trim().is_empty()),
      };
      if empty {
        return Err(invalid(
          format!("{section}.modules[{index}]"),
          "module names must not be empty",
        ));
      }
    }
    if let Some(index) = commands.iter().position(|c| c.trim().is_empty()) {
      return Err(invalid(format!("{section}.commands[{index}]"), "commands must not be empty"));
    }
  }

  Ok(StepSection {
    enabled,
    modules,
    commands,
  })
}

fn validate_migrate(raw: Option<RawMigrate>) -> Result<MigrationSection, ConfigError> {
  let Some(raw) = raw else {
    return Ok(MigrationSection::default());
  };
  let enabled = raw.enabled.unwrap_or(false);

  let files_source = match raw.source.and_then(|s| s.files) {
    Some(files) if enabled => Some(FilesSource {
      variable: required("migrate.source.files.variable", files.variable)?,
      dir: required("migrate.source.files.dir", files.dir)?,
    }),
    Some(files) => match (optional(files.variable), optional(files.dir)) {
      (Some(variable), Some(dir)) => Some(FilesSource { variable, dir }),
      _ => None,
    },
    None => None,
  };

  let (dependencies, groups, migrations) = if enabled {
    (
      non_empty_entries("migrate.dependencies", raw.dependencies)?,
      non_empty_entries("migrate.groups", raw.groups)?,
      non_empty_entries("migrate.migrations", raw.migrations)?,
    )
  } else {
    (
      raw.dependencies.unwrap_or_default(),
      raw.groups.unwrap_or_default(),
      raw.migrations.unwrap_or_default(),
    )
  };

  Ok(MigrationSection {
    enabled,
    dependencies,
    files_source,
    groups,
    migrations,
  })
}
