//! Terminal output for drun.
//!
//! Stage progress goes to stdout, one line per stage. Warnings, safety
//! questions and errors go to stderr so they stay visible when stdout is
//! piped. Colors are applied only when the stream supports them.

use std::time::Duration;

use anyhow::Context;
use owo_colors::{OwoColorize, Stream};

use drupal_runner_lib::pipeline::{StageOutcome, StageReport};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const SKIP: &str = "-";
}

/// Elapsed stage time: milliseconds under a second, tenths under a minute.
pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  if secs >= 60 {
    format!("{}m{:02}s", secs / 60, secs % 60)
  } else if secs > 0 {
    format!("{:.1}s", duration.as_secs_f64())
  } else {
    format!("{}ms", duration.subsec_millis())
  }
}

/// Trailing detail of a stage line, without colors.
fn stage_detail(report: &StageReport) -> String {
  match &report.outcome {
    StageOutcome::Completed => format!("({})", format_duration(report.elapsed)),
    StageOutcome::Skipped(reason) => format!("(skipped: {reason})"),
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

/// One line per finished stage.
pub fn print_stage_report(report: &StageReport) {
  let symbol = match report.outcome {
    StageOutcome::Completed => symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
    StageOutcome::Skipped(_) => symbols::SKIP.if_supports_color(Stream::Stdout, |s| s.dimmed()).to_string(),
  };
  println!(
    "{} {} {}",
    symbol,
    report.stage,
    stage_detail(report).if_supports_color(Stream::Stdout, |s| s.dimmed())
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
