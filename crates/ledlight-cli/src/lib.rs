//! Command-line front end for the LED indicator.
//!
//! This crate provides the `ledlight` binary: rendering, one-shot
//! instruction execution and a stdin/stdout remote-control session.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod stdin;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use stdin::StdinClient;
