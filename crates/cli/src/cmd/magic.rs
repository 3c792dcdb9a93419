//! Implementation of the `drun magic` command.
//!
//! Runs every stage in order against the target directory, printing each
//! stage as it finishes. The first failure ends the run.

use std::path::Path;

use anyhow::{Context, Result};

use drupal_runner_lib::pipeline::BuildOptions;

use super::stage::{open_pipeline, runtime};
use crate::output::{format_duration, print_stage_report, print_success};

/// Execute the full build.
pub fn cmd_magic(target: &Path, config: &Path, options: BuildOptions, yes: bool) -> Result<()> {
  let mut pipeline = open_pipeline(target, config, yes)?;
  let rt = runtime()?;

  let report = rt
    .block_on(pipeline.run_all(&options, print_stage_report))
    .context("Build failed")?;

  println!();
  print_success(&format!(
    "Build complete: {} of {} stages ran in {}",
    report.completed_count(),
    report.stages.len(),
    format_duration(report.total_elapsed())
  ));

  Ok(())
}
