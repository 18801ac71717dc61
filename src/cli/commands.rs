//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - simulate: replay a scenario and print what would be shown, and when
//! - check-config: load and validate configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// noticeq - priority-preemptive notice scheduling
#[derive(Parser, Debug)]
#[command(name = "noticeq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Timeline output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a scenario file and print the display timeline
    Simulate {
        /// Scenario YAML file
        scenario: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write notices still pending at the end as JSON
        #[arg(long)]
        save_pending: Option<PathBuf>,
    },

    /// Load and validate configuration, then print the effective policy
    CheckConfig,
}
