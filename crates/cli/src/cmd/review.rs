//! Implementation of the `drun review` command.

use std::path::Path;

use anyhow::{Context, Result, bail};

use drupal_runner_lib::exec::{ShellRunner, Tools};
use drupal_runner_lib::review::review_features;

use super::stage::{open_context, runtime};
use crate::output::{print_info, print_json, print_success, print_warning};

/// Check the features of a built site.
///
/// Fails when any configured feature is missing or disabled.
pub fn cmd_review(target: &Path, config: &Path, json: bool) -> Result<()> {
  let ctx = open_context(target, config)?;
  let rt = runtime()?;

  let report = rt
    .block_on(review_features(&ShellRunner::new(), &Tools::from_env(), ctx.config()))
    .context("Review failed")?;

  if json {
    print_json(&report)?;
  } else if report.checked == 0 {
    print_info("No features configured");
  } else {
    for feature in &report.missing_features {
      print_warning(&format!("Feature {feature} is not enabled"));
    }
    if report.is_ok() {
      print_success(&format!("All {} features enabled", report.checked));
    }
  }

  if !report.is_ok() {
    bail!(
      "{} of {} features not enabled",
      report.missing_features.len(),
      report.checked
    );
  }
  Ok(())
}
