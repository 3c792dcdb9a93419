//! Build configuration schema and loader.
//!
//! The build definition is a YAML document (`build.yml` by default). Loading
//! reads the file, normalizes shorthand forms, validates every field and
//! returns an immutable [`BuildConfiguration`]. Any violation fails the whole
//! load; a partially valid configuration is never returned.

mod raw;
mod types;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

pub use types::{
  BuildConfiguration, DatabaseSettings, DependencyManifest, FilesSource, MigrationSection, ModuleSet, SiteSettings,
  StepSection,
};

use raw::RawDocument;

/// Errors raised while loading a build definition.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// No file at the configured location.
  #[error("build configuration could not be found at {}", .0.display())]
  NotFound(PathBuf),

  #[error("failed to read build configuration {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The document is not well-formed YAML or has values of the wrong type.
  #[error("failed to parse build configuration {origin}: {source}")]
  Parse {
    origin: String,
    #[source]
    source: serde_yaml::Error,
  },

  /// A field is missing or violates a schema rule.
  #[error("invalid build configuration: `{field}` {rule}")]
  Validation { field: String, rule: String },
}

impl ConfigError {
  /// Dotted key path of the offending field, for validation failures.
  pub fn field(&self) -> Option<&str> {
    match self {
      ConfigError::Validation { field, .. } => Some(field),
      _ => None,
    }
  }
}

impl BuildConfiguration {
  /// Load and validate the build definition at `path`.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    if !path.is_file() {
      return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let config = Self::parse(&contents, &path.display().to_string())?;
    info!(path = %path.display(), alias = %config.remote_alias, "loaded build configuration");
    Ok(config)
  }

  /// Parse and validate a build definition held in memory.
  pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
    Self::parse(contents, "<inline>")
  }

  fn parse(contents: &str, origin: &str) -> Result<Self, ConfigError> {
    let document: RawDocument = if contents.trim().is_empty() {
      RawDocument::default()
    } else {
      serde_yaml::from_str::<Option<RawDocument>>(contents)
        .map_err(|source| ConfigError::Parse {
          origin: origin.to_string(),
          source,
        })?
        .unwrap_or_default()
    };

    debug!(origin, "validating build configuration");
    document.validate()
  }
}
