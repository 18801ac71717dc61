//! CLI module for noticeq - command-line interface and subcommands.
//!
//! Provides scenario simulation and configuration checks.

pub mod commands;

pub use commands::Cli;
