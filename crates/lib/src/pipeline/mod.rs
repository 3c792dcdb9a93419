//! Staged build pipeline.
//!
//! A full run executes every [`Stage`] in order:
//!
//! 1. `build` - optionally wipe the target and clone the repository, write the routing file
//! 2. `dependency-assembly` - run the dependency build tool against the manifest
//! 3. `install` - install the site, import a dump if configured, add the settings include
//! 4. `pre-steps` - enable modules and run commands declared under `pre`
//! 5. `features` - enable feature modules
//! 6. `theme` - enable the configured theme and make it the default
//! 7. `migrate` - enable migration support and run migrations
//! 8. `post-steps` - enable modules and run commands declared under `post`
//! 9. `cleanup` - remove unwanted files, revert features, clear caches
//!
//! Each stage can also run on its own once its on-disk prerequisites exist.
//! The first failure ends the run; nothing is rolled back.

mod types;

use std::time::Instant;

use tracing::{debug, info};

use crate::config::StepSection;
use crate::consts::{
  DEFAULT_GIT_REMOTE, ENVIRONMENT_SETTINGS_SNIPPET, MIGRATION_SUPPORT_MODULES, PLATFORM_DEFAULT_THEME,
  UNWANTED_FILE_PATTERNS,
};
use crate::context::BuildContext;
use crate::exec::{CommandRunner, Drush, Git, ShellCommand, Tools, shell_quote};
use crate::safety::{Confirm, SafetyDecision, check_local_state};
use crate::site;

pub use types::{BuildOptions, PipelineError, RunReport, Stage, StageOutcome, StageReport};

/// Runs build stages against one [`BuildContext`].
pub struct Pipeline<R, C> {
  ctx: BuildContext,
  runner: R,
  confirm: C,
  tools: Tools,
}

impl<R: CommandRunner, C: Confirm> Pipeline<R, C> {
  pub fn new(ctx: BuildContext, runner: R, confirm: C, tools: Tools) -> Self {
    Self {
      ctx,
      runner,
      confirm,
      tools,
    }
  }

  pub fn context(&self) -> &BuildContext {
    &self.ctx
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  fn drush(&self) -> Drush<'_> {
    Drush::new(&self.tools.drush, &self.ctx.config().remote_alias)
  }

  async fn exec(&self, command: &ShellCommand) -> Result<String, PipelineError> {
    Ok(self.runner.run(command).await?)
  }

  async fn exec_all(&self, commands: &[ShellCommand]) -> Result<(), PipelineError> {
    for command in commands {
      self.exec(command).await?;
    }
    Ok(())
  }

  /// Run every stage in order, stopping at the first failure.
  ///
  /// `on_report` is called after each stage finishes, so callers can show
  /// progress even when a later stage fails.
  pub async fn run_all<F>(&mut self, options: &BuildOptions, mut on_report: F) -> Result<RunReport, PipelineError>
  where
    F: FnMut(&StageReport),
  {
    info!(target_dir = %self.ctx.target().display(), nuke = options.nuke, "starting full build");
    let mut report = RunReport::default();

    for stage in Stage::ALL {
      let stage_report = self.run_timed(stage, options).await?;
      on_report(&stage_report);
      report.stages.push(stage_report);
    }

    info!(stages = report.stages.len(), "full build complete");
    Ok(report)
  }

  /// Run a single stage, timing it.
  pub async fn run_timed(&mut self, stage: Stage, options: &BuildOptions) -> Result<StageReport, PipelineError> {
    let started = Instant::now();
    let outcome = self.run_stage(stage, options).await?;
    Ok(StageReport {
      stage,
      outcome,
      elapsed: started.elapsed(),
    })
  }

  /// Run a single stage by name.
  pub async fn run_stage(&mut self, stage: Stage, options: &BuildOptions) -> Result<StageOutcome, PipelineError> {
    info!(%stage, "running stage");
    let outcome = match stage {
      Stage::Build => self.build(options).await?,
      Stage::DependencyAssembly => self.assemble_dependencies().await?,
      Stage::Install => self.install().await?,
      Stage::PreSteps => self.pre_steps().await?,
      Stage::Features => self.features().await?,
      Stage::Theme => self.theme().await?,
      Stage::Migrate => self.migrate().await?,
      Stage::PostSteps => self.post_steps().await?,
      Stage::Cleanup => self.cleanup().await?,
    };
    if let StageOutcome::Skipped(reason) = &outcome {
      info!(%stage, reason, "stage skipped");
    }
    self.ctx.mark_completed(stage);
    Ok(outcome)
  }

  /// Prepare the target: optionally wipe and re-clone, then ensure the routing file exists.
  pub async fn build(&mut self, options: &BuildOptions) -> Result<StageOutcome, PipelineError> {
    let target = self.ctx.target().to_path_buf();
    if !target.is_dir() {
      return Err(PipelineError::Precondition(format!(
        "Target directory {} does not exist.",
        target.display()
      )));
    }

    if options.nuke {
      if self.ctx.working_dir().is_none() {
        return Err(PipelineError::Precondition(
          "Cannot determine the working directory; refusing to use --nuke.".to_string(),
        ));
      }
      if self.ctx.runs_inside_target() {
        return Err(PipelineError::Precondition(
          "You cannot use --nuke from a build within the target directory.".to_string(),
        ));
      }
      let url = self.ctx.config().repository_url.clone().ok_or_else(|| {
        PipelineError::Precondition("--nuke needs a repository to clone; set `build.git`.".to_string())
      })?;

      let site_dir = self.ctx.site_dir();
      if site_dir.exists() {
        let git = Git::new(&self.tools.git);
        let decision = check_local_state(&self.runner, &self.confirm, git, &site_dir, DEFAULT_GIT_REMOTE).await?;
        if let SafetyDecision::Aborted { reason } = decision {
          return Err(PipelineError::Declined {
            reason: reason.to_string(),
          });
        }
      } else {
        debug!(path = %site_dir.display(), "no existing site directory, skipping local state check");
      }

      let removed = site::wipe_directory(&target)?;
      info!(path = %target.display(), removed, "emptied target directory");

      let clone = Git::new(&self.tools.git).clone_repo(&url, &site_dir);
      self.exec(&clone).await?;
    }

    let sites_file = self.ctx.sites_file();
    if !sites_file.exists() {
      info!(path = %sites_file.display(), "writing new sites.php file");
      let config = self.ctx.config();
      site::write_routing_file(&sites_file, &config.site_aliases, &config.site_subdirectory)?;
    }
    self.ctx.mark_routing_file_present();

    Ok(StageOutcome::Completed)
  }

  /// Run the dependency build tool against the declared manifest.
  pub async fn assemble_dependencies(&mut self) -> Result<StageOutcome, PipelineError> {
    let Some(manifest) = &self.ctx.config().dependency_manifest else {
      return Ok(StageOutcome::Skipped("no make file declared"));
    };

    let site_dir = self.ctx.site_dir();
    if !site_dir.is_dir() {
      return Err(PipelineError::Precondition(format!(
        "Site directory {} not found; run the build stage first.",
        site_dir.display()
      )));
    }

    let manifest_path = self.ctx.manifest_path(manifest);
    let command = self.drush().make(self.ctx.target(), &manifest_path, &manifest.options);
    self.exec(&command).await?;
    Ok(StageOutcome::Completed)
  }

  /// Install the site, import the dump if one is configured, then add the settings include.
  pub async fn install(&mut self) -> Result<StageOutcome, PipelineError> {
    let config = self.ctx.config();

    if let Some(dump) = config.database_dump_path.as_deref().filter(|dump| !dump.is_file()) {
      return Err(PipelineError::Precondition(format!(
        "Source database dump {} was not found.",
        dump.display()
      )));
    }

    let mut install = String::from("site-install");
    if let Some(profile) = config.effective_profile() {
      install.push(' ');
      install.push_str(&shell_quote(profile));
    }
    for (flag, value) in [
      ("db-url", config.database.url()),
      ("sites-subdir", config.site_subdirectory.clone()),
      ("site-name", config.site.site_name.clone()),
      ("account-name", config.site.root_username.clone()),
      ("account-pass", config.site.root_password.clone()),
    ] {
      install.push_str(&format!(" --{}={}", flag, shell_quote(&value)));
    }

    let drush = self.drush();
    let mut commands = vec![drush.forced(&install)];
    if let Some(dump) = &config.database_dump_path {
      // Tables from the minimal install may be absent from the dump, so drop everything first.
      commands.push(drush.forced("sql-drop"));
      commands.push(drush.forced(&format!("sql-cli < {}", shell_quote(&dump.to_string_lossy()))));
    }
    self.exec_all(&commands).await?;

    let settings = self.ctx.settings_file();
    if !settings.is_file() {
      return Err(PipelineError::Precondition(format!(
        "Settings file {} not found after install.",
        settings.display()
      )));
    }
    if site::append_settings_include(&settings, ENVIRONMENT_SETTINGS_SNIPPET)? {
      info!(path = %settings.display(), "added environment settings include");
    }
    self.ctx.mark_settings_include_present();

    Ok(StageOutcome::Completed)
  }

  pub async fn pre_steps(&mut self) -> Result<StageOutcome, PipelineError> {
    let steps = self.ctx.config().pre_steps.clone();
    self.run_steps(&steps, "pre-steps disabled").await
  }

  pub async fn post_steps(&mut self) -> Result<StageOutcome, PipelineError> {
    let steps = self.ctx.config().post_steps.clone();
    self.run_steps(&steps, "post-steps disabled").await
  }

  /// Enable the section's modules, then run its raw commands, all in declaration order.
  async fn run_steps(&self, steps: &StepSection, disabled: &'static str) -> Result<StageOutcome, PipelineError> {
    if !steps.enabled {
      return Ok(StageOutcome::Skipped(disabled));
    }

    let drush = self.drush();
    let commands: Vec<ShellCommand> = steps
      .modules
      .iter()
      .map(|set| drush.enable(&set.joined()))
      .chain(steps.commands.iter().map(|cmd| drush.forced(cmd)))
      .collect();
    self.exec_all(&commands).await?;
    Ok(StageOutcome::Completed)
  }

  pub async fn features(&mut self) -> Result<StageOutcome, PipelineError> {
    let features = &self.ctx.config().features;
    if features.is_empty() {
      return Ok(StageOutcome::Skipped("no features declared"));
    }

    let drush = self.drush();
    let commands: Vec<ShellCommand> = features.iter().map(|f| drush.enable(f)).collect();
    self.exec_all(&commands).await?;
    Ok(StageOutcome::Completed)
  }

  /// Enable the configured theme, make it the default and disable the platform default.
  pub async fn theme(&mut self) -> Result<StageOutcome, PipelineError> {
    let Some(theme) = &self.ctx.config().site.theme else {
      return Ok(StageOutcome::Skipped("no theme configured"));
    };

    let drush = self.drush();
    self
      .exec_all(&[
        drush.enable(theme),
        drush.variable_set("theme_default", theme),
        drush.disable(PLATFORM_DEFAULT_THEME),
      ])
      .await?;
    Ok(StageOutcome::Completed)
  }

  /// Enable migration support, point it at source files, then run groups followed by single migrations.
  pub async fn migrate(&mut self) -> Result<StageOutcome, PipelineError> {
    let migration = &self.ctx.config().migration;
    if !migration.enabled {
      return Ok(StageOutcome::Skipped("migration disabled"));
    }

    let drush = self.drush();
    let mut commands = vec![drush.enable(&MIGRATION_SUPPORT_MODULES.join(" "))];
    if let Some(files) = &migration.files_source {
      commands.push(drush.variable_set(&files.variable, &files.dir));
    }
    commands.extend(migration.dependencies.iter().map(|dep| drush.enable(dep)));
    commands.extend(
      migration
        .groups
        .iter()
        .map(|group| drush.forced(&format!("mi --group={group}"))),
    );
    commands.extend(
      migration
        .migrations
        .iter()
        .map(|name| drush.forced(&format!("mi {name}"))),
    );

    self.exec_all(&commands).await?;
    Ok(StageOutcome::Completed)
  }

  /// Remove unwanted files, revert features if any are declared, and clear caches.
  pub async fn cleanup(&mut self) -> Result<StageOutcome, PipelineError> {
    let removed = site::remove_matching(self.ctx.target(), &UNWANTED_FILE_PATTERNS)?;
    for path in &removed {
      debug!(path = %path.display(), "removed unwanted file");
    }
    info!(removed = removed.len(), "removed unwanted files");

    let drush = self.drush();
    let mut commands = Vec::new();
    if !self.ctx.config().features.is_empty() {
      commands.push(drush.forced("features-revert-all"));
    }
    commands.push(drush.plain("cc all"));
    self.exec_all(&commands).await?;
    Ok(StageOutcome::Completed)
  }
}
