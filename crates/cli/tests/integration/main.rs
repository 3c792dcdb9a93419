//! CLI integration tests for drun, driven through stand-in external tools.

#![cfg(unix)]

mod build_tests;
mod common;
mod magic_tests;
mod review_tests;
