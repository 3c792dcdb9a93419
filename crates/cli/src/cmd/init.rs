//! Implementation of the `drun init` command.
//!
//! Writes a commented template build definition to get a new site started.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use drupal_runner_lib::init::{InitOptions, init};

use crate::output::symbols;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if `build.yml` already exists or cannot be written.
pub fn cmd_init(dir: &Path) -> Result<()> {
  let options = InitOptions { dir: dir.to_path_buf() };

  let result = init(&options).context("Failed to initialize build definition")?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Created build definition!".green().bold()
  );
  println!();
  println!(
    "  {} Definition: {}",
    symbols::INFO.cyan(),
    result.config_file.display()
  );
  println!();
  println!("{}", "Next steps:".bold());
  println!(
    "  1. Edit {} to describe your site",
    result.config_file.display().to_string().cyan()
  );
  println!(
    "  2. Run: {}",
    format!("drun --config {} magic <target>", result.config_file.display()).cyan()
  );

  Ok(())
}
