//! Stage names, outcomes and errors for the build pipeline.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::exec::ExecuteError;
use crate::site::SiteError;

/// One named step of the build, in full-run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
  Build,
  DependencyAssembly,
  Install,
  PreSteps,
  Features,
  Theme,
  Migrate,
  PostSteps,
  Cleanup,
}

impl Stage {
  /// Every stage in the order a full run executes them.
  pub const ALL: [Stage; 9] = [
    Stage::Build,
    Stage::DependencyAssembly,
    Stage::Install,
    Stage::PreSteps,
    Stage::Features,
    Stage::Theme,
    Stage::Migrate,
    Stage::PostSteps,
    Stage::Cleanup,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Stage::Build => "build",
      Stage::DependencyAssembly => "dependency-assembly",
      Stage::Install => "install",
      Stage::PreSteps => "pre-steps",
      Stage::Features => "features",
      Stage::Theme => "theme",
      Stage::Migrate => "migrate",
      Stage::PostSteps => "post-steps",
      Stage::Cleanup => "cleanup",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Stage {
  type Err = PipelineError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "make" => Ok(Stage::DependencyAssembly),
      "pre" => Ok(Stage::PreSteps),
      "post" => Ok(Stage::PostSteps),
      _ => Stage::ALL
        .into_iter()
        .find(|stage| stage.as_str() == s)
        .ok_or_else(|| PipelineError::UnknownStage(s.to_string())),
    }
  }
}

/// Errors that stop the pipeline. None of them are retried.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// Required state for a stage is missing.
  #[error("{0}")]
  Precondition(String),

  /// An external command reported failure.
  #[error(transparent)]
  Execute(#[from] ExecuteError),

  /// The operator declined a safety confirmation.
  #[error("Cancelled by user: {reason}")]
  Declined { reason: String },

  #[error(transparent)]
  Site(#[from] SiteError),

  #[error("unknown stage: {0}")]
  UnknownStage(String),
}

impl PipelineError {
  pub fn is_declined(&self) -> bool {
    matches!(self, PipelineError::Declined { .. })
  }
}

/// Options for the build stage (and a full run).
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
  /// Wipe the target and clone the repository afresh.
  pub nuke: bool,
}

/// What a stage did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
  Completed,
  /// Nothing to do; the reason says why.
  Skipped(&'static str),
}

/// Outcome and timing of one stage in a run.
#[derive(Debug, Clone)]
pub struct StageReport {
  pub stage: Stage,
  pub outcome: StageOutcome,
  pub elapsed: Duration,
}

/// Reports for every stage of a completed run, in order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
  pub stages: Vec<StageReport>,
}

impl RunReport {
  pub fn completed_count(&self) -> usize {
    self
      .stages
      .iter()
      .filter(|r| r.outcome == StageOutcome::Completed)
      .count()
  }

  pub fn total_elapsed(&self) -> Duration {
    self.stages.iter().map(|r| r.elapsed).sum()
  }
}
