//! drupal-runner-lib: build automation for CMS sites
//!
//! This crate provides everything behind the `drun` command:
//! - `config`: the YAML build definition and its validation
//! - `context`: the in-progress build and its derived paths
//! - `exec`: command lines for the administration CLI and git, and the shell runner
//! - `safety`: checks that stop a rebuild from destroying unpublished work
//! - `pipeline`: the ordered build stages
//! - `review`: post-build checks against the running site

pub mod config;
pub mod consts;
pub mod context;
pub mod exec;
pub mod init;
pub mod pipeline;
pub mod review;
pub mod safety;
pub mod site;
#[cfg(test)]
mod util;
