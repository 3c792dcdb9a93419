mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use drupal_runner_lib::consts::DEFAULT_CONFIG_FILE;
use drupal_runner_lib::pipeline::{BuildOptions, Stage};

use crate::cmd::StageArgs;

/// drun - build CMS sites from a YAML build definition
#[derive(Parser)]
#[command(name = "drun")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Build definition file
  #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
  config: PathBuf,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run every stage in order
  Magic {
    /// Target directory of the site
    path: PathBuf,

    /// Wipe the target and clone the repository afresh
    #[arg(long)]
    nuke: bool,

    /// Answer yes to safety questions
    #[arg(short, long)]
    yes: bool,
  },

  /// Prepare the target directory and write the routing file
  Build {
    /// Target directory of the site
    path: PathBuf,

    /// Wipe the target and clone the repository afresh
    #[arg(long)]
    nuke: bool,

    /// Answer yes to safety questions
    #[arg(short, long)]
    yes: bool,
  },

  /// Assemble dependencies from the make file
  #[command(visible_alias = "make")]
  DependencyAssembly { path: PathBuf },

  /// Install the site
  Install { path: PathBuf },

  /// Enable modules and run commands from the `pre` section
  #[command(visible_alias = "pre")]
  PreSteps { path: PathBuf },

  /// Enable feature modules
  Features { path: PathBuf },

  /// Enable and set the default theme
  Theme { path: PathBuf },

  /// Run migrations
  Migrate { path: PathBuf },

  /// Enable modules and run commands from the `post` section
  #[command(visible_alias = "post")]
  PostSteps { path: PathBuf },

  /// Remove unwanted files and clear caches
  Cleanup { path: PathBuf },

  /// Check that every configured feature is enabled on the site
  Review {
    path: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Write a template build definition
  Init {
    /// Directory to write build.yml into
    #[arg(default_value = ".")]
    dir: PathBuf,
  },
}

fn init_logging(verbose: bool) {
  let default = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .with_target(false)
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let stage = |stage: Stage, path: PathBuf| StageArgs {
    stage,
    target: path,
    config: cli.config.clone(),
    options: BuildOptions::default(),
    yes: false,
  };

  match cli.command {
    Commands::Magic { path, nuke, yes } => cmd::cmd_magic(&path, &cli.config, BuildOptions { nuke }, yes),
    Commands::Build { path, nuke, yes } => cmd::cmd_stage(StageArgs {
      options: BuildOptions { nuke },
      yes,
      ..stage(Stage::Build, path)
    }),
    Commands::DependencyAssembly { path } => cmd::cmd_stage(stage(Stage::DependencyAssembly, path)),
    Commands::Install { path } => cmd::cmd_stage(stage(Stage::Install, path)),
    Commands::PreSteps { path } => cmd::cmd_stage(stage(Stage::PreSteps, path)),
    Commands::Features { path } => cmd::cmd_stage(stage(Stage::Features, path)),
    Commands::Theme { path } => cmd::cmd_stage(stage(Stage::Theme, path)),
    Commands::Migrate { path } => cmd::cmd_stage(stage(Stage::Migrate, path)),
    Commands::PostSteps { path } => cmd::cmd_stage(stage(Stage::PostSteps, path)),
    Commands::Cleanup { path } => cmd::cmd_stage(stage(Stage::Cleanup, path)),
    Commands::Review { path, json } => cmd::cmd_review(&path, &cli.config, json),
    Commands::Init { dir } => cmd::cmd_init(&dir),
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      output::print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}
