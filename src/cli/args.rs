//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Data-aware helper for redo do-scripts: batched dependency declaration and
/// format-dispatched file I/O
#[derive(Parser, Debug)]
#[command(name = "redoscript")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Target path (redo $1)
    #[arg(short = 't', long, global = true)]
    pub target: Option<PathBuf>,

    /// Base name (redo $2)
    #[arg(short = 'b', long, global = true)]
    pub base: Option<String>,

    /// Temporary output path (redo $3)
    #[arg(short = 'T', long, global = true)]
    pub temp: Option<PathBuf>,

    /// Skip dependency declaration (NO_REDO set to anything non-empty
    /// does the same)
    #[arg(long, global = true)]
    pub no_redo: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective declaration toggle: the flag, or a non-empty `NO_REDO`.
    pub fn no_redo_active(&self) -> bool {
        self.no_redo || crate::context::no_redo_from_env()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Declare and load files from a request description
    Read {
        /// Request: a filename, or a JSON array/object of filenames nested
        /// to arbitrary depth
        request: String,

        /// Declare dependencies but load nothing
        #[arg(long)]
        ignore: bool,
    },

    /// Declare dependencies only (one batched redo-ifchange call)
    Ensure {
        /// Files to declare
        #[arg(num_args = 1..)]
        files: Vec<String>,
    },

    /// Write a JSON value from stdin to a file, format chosen by extension
    Write {
        /// Destination file
        file: PathBuf,
    },

    /// Write a JSON value from stdin to the redo temp slot, format chosen
    /// by the target's extension
    Output,

    /// Show the derived script context
    Info,

    /// Encode names into one packed target segment
    Pack {
        /// Separator level
        #[arg(short, long, default_value_t = 0)]
        level: usize,

        /// Names to pack
        #[arg(num_args = 1..)]
        parts: Vec<String>,
    },

    /// Decode a packed target segment
    Unpack {
        /// Separator level
        #[arg(short, long, default_value_t = 0)]
        level: usize,

        /// Rejoin the parts with '.' instead of printing one per line
        #[arg(short, long)]
        join: bool,

        /// Packed segment
        name: String,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
