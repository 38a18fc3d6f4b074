use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Coderoom: a shared code buffer with remote execution.
#[derive(Parser, Debug)]
#[command(name = "coderoom", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Join a room and edit its code interactively.
    Join {
        /// Room to join (defaults to `[channel] room`).
        #[arg(short, long)]
        room: Option<String>,

        /// Display name shown in the prompt.
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Run a single file on the execution service and print its output.
    Run {
        file: PathBuf,

        /// Language key; guessed from the file extension when omitted.
        #[arg(short, long)]
        language: Option<String>,
    },

    /// List runtimes the execution service offers.
    Runtimes,

    /// List the practice problems.
    Problems,
}

pub fn parse() -> Args {
    Args::parse()
}
