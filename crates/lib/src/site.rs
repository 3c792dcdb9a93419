//! Filesystem side of a build: the routing file, the settings include, wiping
//! the target and removing unwanted files.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors raised while touching files in the build target.
#[derive(Debug, Error)]
pub enum SiteError {
  #[error("i/o error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid cleanup pattern {pattern}: {source}")]
  Pattern {
    pattern: String,
    #[source]
    source: glob::PatternError,
  },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SiteError + '_ {
  move |source| SiteError::Io {
    path: path.to_path_buf(),
    source,
  }
}

fn php_string(value: &str) -> String {
  value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Routing file body: one assignment per alias, in declaration order.
pub fn routing_file_contents(aliases: &[String], site_subdirectory: &str) -> String {
  let mut contents = String::from("<?php\n");
  for alias in aliases {
    contents.push_str(&format!(
      "  $sites['{}'] = '{}';\n",
      php_string(alias),
      php_string(site_subdirectory)
    ));
  }
  contents
}

/// Write the routing file, creating its parent directory if needed.
pub fn write_routing_file(path: &Path, aliases: &[String], site_subdirectory: &str) -> Result<(), SiteError> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(io_err(parent))?;
  }
  fs::write(path, routing_file_contents(aliases, site_subdirectory)).map_err(io_err(path))
}

/// Append `snippet` to the settings file unless it is already there.
///
/// The file and its parent directory are made owner-writable for the write
/// and their previous modes are restored afterwards, whether or not the write
/// succeeded. Returns `true` when the snippet was appended.
pub fn append_settings_include(settings: &Path, snippet: &str) -> Result<bool, SiteError> {
  let existing = fs::read_to_string(settings).map_err(io_err(settings))?;
  if existing.contains(snippet) {
    debug!(path = %settings.display(), "settings include already present");
    return Ok(false);
  }

  let parent = settings.parent().filter(|dir| !dir.as_os_str().is_empty());
  let parent_original = match parent {
    Some(dir) => relax_permissions(dir).map_err(io_err(dir))?,
    None => None,
  };

  let written = relax_permissions(settings)
    .map_err(io_err(settings))
    .and_then(|original| {
      let appended = append_snippet(settings, &existing, snippet).map_err(io_err(settings));
      let restored = restore_permissions(settings, original);
      appended.and(restored)
    });

  let parent_restored = match parent {
    Some(dir) => restore_permissions(dir, parent_original),
    None => Ok(()),
  };

  written.and(parent_restored).map(|()| true)
}

fn append_snippet(settings: &Path, existing: &str, snippet: &str) -> std::io::Result<()> {
  let mut file = OpenOptions::new().append(true).open(settings)?;
  let mut addition = String::new();
  if !existing.is_empty() && !existing.ends_with('\n') {
    addition.push('\n');
  }
  addition.push('\n');
  addition.push_str(snippet);
  file.write_all(addition.as_bytes())?;
  file.flush()
}

fn restore_permissions(path: &Path, original: Option<fs::Permissions>) -> Result<(), SiteError> {
  match original {
    Some(permissions) => fs::set_permissions(path, permissions).map_err(io_err(path)),
    None => Ok(()),
  }
}

/// Make `path` writable by its owner, returning the permissions to restore if they changed.
#[cfg(unix)]
fn relax_permissions(path: &Path) -> std::io::Result<Option<fs::Permissions>> {
  use std::os::unix::fs::PermissionsExt;

  let original = fs::metadata(path)?.permissions();
  let mode = original.mode();
  if mode & 0o200 != 0 {
    return Ok(None);
  }
  fs::set_permissions(path, fs::Permissions::from_mode(mode | 0o200))?;
  Ok(Some(original))
}

#[cfg(not(unix))]
fn relax_permissions(path: &Path) -> std::io::Result<Option<fs::Permissions>> {
  let original = fs::metadata(path)?.permissions();
  if !original.readonly() {
    return Ok(None);
  }
  let mut relaxed = original.clone();
  #[allow(clippy::permissions_set_readonly_false)]
  relaxed.set_readonly(false);
  fs::set_permissions(path, relaxed)?;
  Ok(Some(original))
}

fn remove_path(path: &Path) -> Result<(), SiteError> {
  let metadata = fs::symlink_metadata(path).map_err(io_err(path))?;
  if metadata.is_dir() {
    fs::remove_dir_all(path).map_err(io_err(path))
  } else {
    fs::remove_file(path).map_err(io_err(path))
  }
}

/// Remove everything inside `dir`, hidden entries included, keeping `dir` itself.
pub fn wipe_directory(dir: &Path) -> Result<usize, SiteError> {
  let mut removed = 0;
  for entry in fs::read_dir(dir).map_err(io_err(dir))? {
    let entry = entry.map_err(io_err(dir))?;
    remove_path(&entry.path())?;
    removed += 1;
  }
  Ok(removed)
}

/// Remove entries of `root` matching any of `patterns`. Patterns that match nothing are ignored.
pub fn remove_matching(root: &Path, patterns: &[&str]) -> Result<Vec<PathBuf>, SiteError> {
  let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
  let mut removed = Vec::new();

  for pattern in patterns {
    let full = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern);
    let matches = glob::glob(&full).map_err(|source| SiteError::Pattern {
      pattern: pattern.to_string(),
      source,
    })?;
    // Unreadable entries cannot have been matched, so they are skipped.
    for path in matches.flatten() {
      remove_path(&path)?;
      removed.push(path);
    }
  }

  Ok(removed)
}
