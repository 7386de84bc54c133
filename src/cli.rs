use crate::export::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// evcalc - event duration calculator for pasted calendar text
#[derive(Debug, Parser)]
#[command(name = "evcalc")]
#[command(about = "Compute durations of events pasted from calendars", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (if not specified, enters the interactive sheet)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the duration between two times
    Duration {
        /// Start time, e.g. "9:30 AM" or "noon"
        start: String,
        /// End time; earlier than start means the next day
        end: String,
    },

    /// Parse one "<name> on <date> at <start> - <end>" string
    Parse {
        text: String,
    },

    /// Extract every event from pasted text and total the durations
    Extract {
        /// Read the paste from this file instead of stdin
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Output format (defaults to the configured one)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Normalize a typed time range such as "9-530p"
    #[command(alias = "fmt")]
    FormatInput {
        raw: String,
    },
}
