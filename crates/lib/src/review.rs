//! Post-build review of an installed site.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::BuildConfiguration;
use crate::exec::{CommandRunner, Drush, ExecuteError, Tools};

#[derive(Debug, Error)]
pub enum ReviewError {
  #[error(transparent)]
  Execute(#[from] ExecuteError),

  #[error("could not read the project list: {0}")]
  Parse(#[from] serde_json::Error),
}

/// Status line of one project as listed by the administration CLI.
#[derive(Debug, Deserialize)]
struct ProjectStatus {
  #[serde(default)]
  status: Option<String>,
}

const ENABLED: &str = "Enabled";

/// Result of a review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewReport {
  /// Number of configured features that were checked.
  pub checked: usize,
  /// Configured features that are missing or not enabled, in declaration order.
  pub missing_features: Vec<String>,
}

impl ReviewReport {
  pub fn is_ok(&self) -> bool {
    self.missing_features.is_empty()
  }
}

/// Check that every configured feature is enabled on the site behind the remote alias.
pub async fn review_features<R: CommandRunner>(
  runner: &R,
  tools: &Tools,
  config: &BuildConfiguration,
) -> Result<ReviewReport, ReviewError> {
  let drush = Drush::new(&tools.drush, &config.remote_alias);
  let listing = runner.run(&drush.plain("pm-list --format=json")).await?;
  let projects: HashMap<String, ProjectStatus> = serde_json::from_str(&listing)?;

  let missing_features: Vec<String> = config
    .features
    .iter()
    .filter(|feature| {
      projects
        .get(feature.as_str())
        .and_then(|project| project.status.as_deref())
        != Some(ENABLED)
    })
    .cloned()
    .collect();

  for feature in &missing_features {
    warn!(feature = %feature, "feature is not enabled");
  }
  info!(
    checked = config.features.len(),
    missing = missing_features.len(),
    "reviewed features"
  );

  Ok(ReviewReport {
    checked: config.features.len(),
    missing_features,
  })
}
