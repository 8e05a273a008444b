//! `loan-default-risk` library crate.
//!
//! The binary (`ldr`) is a thin wrapper around this library so that:
//!
//! - loading and scoring are testable without spawning processes
//! - the scoring context can be shared by the CLI and the TUI
//! - mock classifiers can be plugged in through the `Classifier` trait

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod tui;
