//! Scaffold a new build definition.
//!
//! Backs the `drun init` command: writes a commented `build.yml` into the
//! chosen directory, creating the directory if needed. An existing file is
//! never overwritten.

mod templates;

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::consts::DEFAULT_CONFIG_FILE;

pub use templates::BUILD_YML_TEMPLATE;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },
}

/// Options for initializing a build definition.
pub struct InitOptions {
  /// Directory the definition is written into
  pub dir: PathBuf,
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  /// Path to the created build definition
  pub config_file: PathBuf,
}

/// Write a template build definition into `options.dir`.
///
/// # Errors
///
/// Returns an error if the definition already exists or cannot be written.
pub fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  let dir = &options.dir;
  let config_file = dir.join(DEFAULT_CONFIG_FILE);

  if config_file.exists() {
    return Err(InitError::PathExists { path: config_file });
  }

  fs::create_dir_all(dir).map_err(|e| InitError::CreateDir {
    path: dir.clone(),
    source: e,
  })?;

  fs::write(&config_file, BUILD_YML_TEMPLATE).map_err(|e| InitError::WriteFile {
    path: config_file.clone(),
    source: e,
  })?;

  info!(path = %config_file.display(), "wrote build definition template");
  Ok(InitResult { config_file })
}
