//! Implementation of the single-stage commands (`drun build`, `drun install`, ...).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use drupal_runner_lib::config::BuildConfiguration;
use drupal_runner_lib::context::BuildContext;
use drupal_runner_lib::exec::{ShellRunner, Tools};
use drupal_runner_lib::pipeline::{BuildOptions, Pipeline, Stage};
use drupal_runner_lib::safety::{AssumeYes, Confirm};

use crate::output::print_stage_report;
use crate::prompts::TerminalConfirm;

/// Arguments shared by every single-stage command.
pub struct StageArgs {
  pub stage: Stage,
  pub target: PathBuf,
  pub config: PathBuf,
  pub options: BuildOptions,
  /// Answer yes to safety questions.
  pub yes: bool,
}

pub(crate) type CliPipeline = Pipeline<ShellRunner, &'static dyn Confirm>;

/// Load the build definition and open a context on `target`.
pub(crate) fn open_context(target: &Path, config: &Path) -> Result<BuildContext> {
  let configuration = BuildConfiguration::load(config)?;
  Ok(BuildContext::new(target, config.to_path_buf(), configuration)?)
}

pub(crate) fn open_pipeline(target: &Path, config: &Path, yes: bool) -> Result<CliPipeline> {
  let ctx = open_context(target, config)?;
  debug!(target_dir = %ctx.target().display(), assume_yes = yes, "opened build context");
  let confirm: &'static dyn Confirm = if yes { &AssumeYes } else { &TerminalConfirm };
  Ok(Pipeline::new(ctx, ShellRunner::new(), confirm, Tools::from_env()))
}

/// Stages run strictly one command at a time, so a single-threaded runtime is enough.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")
}

/// Execute a single stage against the target directory.
pub fn cmd_stage(args: StageArgs) -> Result<()> {
  let mut pipeline = open_pipeline(&args.target, &args.config, args.yes)?;
  let rt = runtime()?;

  let report = rt
    .block_on(pipeline.run_timed(args.stage, &args.options))
    .with_context(|| format!("Stage {} failed", args.stage))?;

  print_stage_report(&report);
  Ok(())
}
