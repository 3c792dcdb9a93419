//! The in-progress build: where it goes, what it was configured with, and
//! what the stages have established so far.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{BuildConfiguration, ConfigError, DependencyManifest};
use crate::consts::{SETTINGS_FILE, SITES_DIR, SITES_FILE};
use crate::pipeline::{PipelineError, Stage};
use crate::site::SiteError;

/// Shared record of one build run.
///
/// Owns the configuration for the duration of the run. Stages read it and the
/// derived paths, and record facts (such as the routing file being present)
/// as they go. Nothing here is persisted.
#[derive(Debug)]
pub struct BuildContext {
  target: PathBuf,
  config_path: PathBuf,
  config: BuildConfiguration,
  working_dir: Option<PathBuf>,
  routing_file_present: bool,
  settings_include_present: bool,
  completed: Vec<Stage>,
}

impl BuildContext {
  /// Start a build into `target`, which must be an existing directory.
  pub fn new(target: &Path, config_path: PathBuf, config: BuildConfiguration) -> Result<Self, PipelineError> {
    if !target.is_dir() {
      return Err(PipelineError::Precondition(format!(
        "Target directory {} does not exist.",
        target.display()
      )));
    }

    let target = dunce::canonicalize(target).map_err(|source| SiteError::Io {
      path: target.to_path_buf(),
      source,
    })?;
    let working_dir = std::env::current_dir()
      .ok()
      .map(|dir| dunce::canonicalize(&dir).unwrap_or(dir));

    Ok(Self {
      target,
      config_path,
      config,
      working_dir,
      routing_file_present: false,
      settings_include_present: false,
      completed: Vec::new(),
    })
  }

  /// Override the directory the process is considered to run from.
  pub fn with_working_dir(mut self, dir: &Path) -> Self {
    self.working_dir = Some(dir.to_path_buf());
    self
  }

  #[cfg(test)]
  pub(crate) fn without_working_dir(mut self) -> Self {
    self.working_dir = None;
    self
  }

  pub fn config(&self) -> &BuildConfiguration {
    &self.config
  }

  pub fn config_path(&self) -> &Path {
    &self.config_path
  }

  /// Re-read the configuration file, replacing the current one only if it validates.
  pub fn reload_config(&mut self) -> Result<(), ConfigError> {
    let fresh = BuildConfiguration::load(&self.config_path)?;
    info!(path = %self.config_path.display(), "reloaded build configuration");
    self.config = fresh;
    Ok(())
  }

  pub fn target(&self) -> &Path {
    &self.target
  }

  pub fn working_dir(&self) -> Option<&Path> {
    self.working_dir.as_deref()
  }

  /// Whether the process runs from inside the target directory.
  ///
  /// `false` when the working directory is unknown; see [`Self::working_dir`].
  pub fn runs_inside_target(&self) -> bool {
    self
      .working_dir
      .as_deref()
      .is_some_and(|dir| dir.starts_with(&self.target))
  }

  pub fn sites_dir(&self) -> PathBuf {
    self.target.join(SITES_DIR)
  }

  /// Routing file mapping hostnames to site subdirectories.
  pub fn sites_file(&self) -> PathBuf {
    self.sites_dir().join(SITES_FILE)
  }

  /// Directory of this build's site, where the repository is cloned.
  pub fn site_dir(&self) -> PathBuf {
    self.sites_dir().join(&self.config.site_subdirectory)
  }

  pub fn settings_file(&self) -> PathBuf {
    self.site_dir().join(SETTINGS_FILE)
  }

  /// Manifest location relative to the target, as handed to the build tool.
  pub fn manifest_path(&self, manifest: &DependencyManifest) -> String {
    let dir = match &manifest.path {
      Some(path) => path.trim_end_matches('/').to_string(),
      None => format!("{}/{}", SITES_DIR, self.config.site_subdirectory),
    };
    format!("{}/{}", dir, manifest.file)
  }

  pub fn routing_file_present(&self) -> bool {
    self.routing_file_present
  }

  pub(crate) fn mark_routing_file_present(&mut self) {
    self.routing_file_present = true;
  }

  pub fn settings_include_present(&self) -> bool {
    self.settings_include_present
  }

  pub(crate) fn mark_settings_include_present(&mut self) {
    self.settings_include_present = true;
  }

  /// Stages completed (or skipped) in this run, in order.
  pub fn completed(&self) -> &[Stage] {
    &self.completed
  }

  pub(crate) fn mark_completed(&mut self, stage: Stage) {
    self.completed.push(stage);
  }
}
