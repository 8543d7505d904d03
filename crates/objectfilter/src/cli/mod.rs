//! Command-line interface for objectfilter.
//!
//! This module provides the CLI structure for the `objfilter` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ApplyCommand, ConfigCommand, FilterTypeArg};

/// objfilter - Filter the keys of JSON documents
///
/// Keeps or drops keys by exact name or regex pattern, at the top level or
/// throughout nested objects.
#[derive(Debug, Parser)]
#[command(name = "objfilter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter a JSON document
    Apply(ApplyCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// List configured presets
    Presets,
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
